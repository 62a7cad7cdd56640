//! Error types for the docshift library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`RegistryError`] — **Fatal at startup**: the conversion policy itself
//!   is malformed (duplicate edge, empty strategy list, an edge referencing
//!   a strategy nobody bound). Surfaces while the graph and registry are
//!   being built, before any request is served, so a bad matrix can never
//!   silently shadow a production conversion path.
//!
//! * [`ConvertError`] — **Per request, recoverable**: one conversion request
//!   could not be completed. The caller decides what to do: reject the
//!   upload ([`ConvertError::UnsupportedConversion`],
//!   [`ConvertError::IdentityConversion`] signal a caller mistake), retry
//!   later, or report ([`ConvertError::AllStrategiesFailed`] carries every
//!   attempt's diagnostic, never just the last one).
//!
//! A third, deliberately thin type, [`StrategyError`], is what a single
//! strategy returns from one attempt. The orchestrator treats any strategy
//! failure uniformly: it records the message and moves on to the next
//! strategy. Strategy errors are never surfaced alone; they reach the caller
//! only aggregated inside [`ConvertError::AllStrategiesFailed`] or as
//! warnings on a successful result.
//!
//! None of the messages here are meant for end-user display. Raw strategy
//! error text stays in [`AttemptFailure::message`]; filtering it for a user
//! audience is the boundary layer's job.

use crate::format::{Format, StrategyId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal errors raised while building the conversion policy.
///
/// Raised by [`crate::graph::FormatGraph`] registration,
/// [`crate::strategy::StrategyRegistry`] binding,
/// [`crate::table::ConversionTable`] loading, and the cross-validation in
/// [`crate::convert::Converter::new`].
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The (source, target) pair is already registered. Re-registration
    /// requires [`crate::graph::FormatGraph::replace_edge`]; there is no
    /// silent overwrite.
    #[error(
        "conversion edge '{source}' -> '{target}' is already registered\n\
         Use replace_edge() to change an existing edge."
    )]
    DuplicateEdge { source: Format, target: Format },

    /// An edge was registered with no strategies to try.
    #[error("conversion edge '{source}' -> '{target}' has an empty strategy list")]
    EmptyStrategyList { source: Format, target: Format },

    /// Source and target of an edge are the same format.
    #[error("conversion edge from '{format}' to itself is not allowed")]
    IdentityEdge { format: Format },

    /// The same strategy id appears twice on one edge. Each strategy is
    /// attempted at most once per request, so a repeated id is a policy bug.
    #[error("strategy '{strategy}' listed twice on edge '{source}' -> '{target}'")]
    DuplicateStrategy {
        source: Format,
        target: Format,
        strategy: StrategyId,
    },

    /// `replace_edge` was called for a pair that was never registered.
    #[error(
        "cannot replace edge '{source}' -> '{target}': not registered\n\
         Use register_edge() for new edges."
    )]
    UnknownEdge { source: Format, target: Format },

    /// The same strategy id was bound twice in the registry.
    #[error("strategy '{strategy}' is already bound")]
    DuplicateBinding { strategy: StrategyId },

    /// An edge references a strategy id with no implementation bound.
    #[error(
        "edge '{source}' -> '{target}' references strategy '{strategy}' but no \
         implementation is bound for it"
    )]
    UnboundStrategy {
        source: Format,
        target: Format,
        strategy: StrategyId,
    },

    /// A declarative conversion table could not be parsed.
    #[error("invalid conversion table: {detail}")]
    InvalidTable { detail: String },
}

/// Recoverable errors returned for a single conversion request.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// No edge exists for the requested (source, target) pair. No strategy
    /// was invoked.
    #[error("conversion from '{source}' to '{target}' is not supported")]
    UnsupportedConversion { source: Format, target: Format },

    /// Source and target format are identical. Pass-through is not a
    /// conversion; callers that want a copy must special-case it explicitly.
    #[error("source and target format are both '{format}'; refusing identity conversion")]
    IdentityConversion { format: Format },

    /// Every strategy on the edge failed. Carries one entry per attempt, in
    /// attempt order, so no diagnostic is lost to a later failure.
    #[error(
        "all {} strategies failed converting '{}' to '{}' (first: {})",
        .attempts.len(),
        .source,
        .target,
        .attempts.first().map(|a| a.message.as_str()).unwrap_or("none attempted")
    )]
    AllStrategiesFailed {
        source: Format,
        target: Format,
        attempts: Vec<AttemptFailure>,
    },

    /// The request was cancelled. The strategy that was running (or about to
    /// run) when cancellation was observed is named; no further fallback was
    /// attempted.
    #[error("conversion cancelled during strategy '{strategy}'")]
    Cancelled { strategy: StrategyId },

    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// The failure of one strategy attempt.
///
/// Collected by the orchestrator in attempt order and carried inside
/// [`ConvertError::AllStrategiesFailed`]. On a successful request the
/// messages of prior failed attempts become
/// [`crate::output::ConversionResult::warnings`].
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{strategy}: {message}")]
pub struct AttemptFailure {
    /// Strategy that was attempted.
    pub strategy: StrategyId,
    /// The strategy's failure message, verbatim.
    pub message: String,
}

/// The error a [`crate::strategy::ConversionStrategy`] returns from one
/// attempt.
///
/// Deliberately a plain message wrapper: the orchestrator never inspects
/// library-specific failure detail, it only records the message and falls
/// back. Adapters map whatever their underlying decoder throws into this.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct StrategyError {
    pub message: String,
}

impl StrategyError {
    pub fn new(message: impl Into<String>) -> Self {
        StrategyError {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for StrategyError {
    fn from(e: std::io::Error) -> Self {
        StrategyError::new(e.to_string())
    }
}

impl From<String> for StrategyError {
    fn from(message: String) -> Self {
        StrategyError { message }
    }
}

impl From<&str> for StrategyError {
    fn from(message: &str) -> Self {
        StrategyError::new(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_display_names_both_formats() {
        let e = ConvertError::UnsupportedConversion {
            source: Format::new("docx"),
            target: Format::new("chart"),
        };
        let msg = e.to_string();
        assert!(msg.contains("docx"), "got: {msg}");
        assert!(msg.contains("chart"), "got: {msg}");
    }

    #[test]
    fn all_failed_display_counts_attempts() {
        let e = ConvertError::AllStrategiesFailed {
            source: Format::new("pdf"),
            target: Format::new("txt"),
            attempts: vec![
                AttemptFailure {
                    strategy: "pdf-lib".into(),
                    message: "encrypted document".into(),
                },
                AttemptFailure {
                    strategy: "poppler".into(),
                    message: "exit status 1".into(),
                },
            ],
        };
        let msg = e.to_string();
        assert!(msg.contains("all 2 strategies"), "got: {msg}");
        assert!(msg.contains("encrypted document"), "got: {msg}");
    }

    #[test]
    fn attempt_failure_display_prefixes_strategy() {
        let f = AttemptFailure {
            strategy: "mammoth".into(),
            message: "not a zip archive".into(),
        };
        assert_eq!(f.to_string(), "mammoth: not a zip archive");
    }

    #[test]
    fn duplicate_edge_display_mentions_replace() {
        let e = RegistryError::DuplicateEdge {
            source: Format::new("csv"),
            target: Format::new("json"),
        };
        assert!(e.to_string().contains("replace_edge"));
    }

    #[test]
    fn strategy_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing binary");
        let e = StrategyError::from(io);
        assert!(e.to_string().contains("missing binary"));
    }
}
