//! # docshift
//!
//! A format-conversion policy engine: decide, for any (source, target)
//! format pair, whether a conversion is supported, which strategy to try
//! first, and how to recover when it fails.
//!
//! ## Why this crate?
//!
//! Document-conversion services tend to grow their routing logic as
//! scattered `if source == "docx" && target == "html"` branches, and the
//! branches drift: the README promises a conversion the code silently
//! rejects, a fallback swallows the error that actually explained the
//! failure, and "All conversion methods failed" reaches users with no
//! detail. This crate keeps the policy as data instead: a declarative edge
//! table answers support questions, and an explicit attempt loop preserves
//! every failure on the way to a fallback.
//!
//! ## Pipeline Overview
//!
//! ```text
//! ConversionRequest
//!  │
//!  ├─ 1. Policy    identity / support checks against the FormatGraph
//!  ├─ 2. Rank      ordered strategy list for the (source, target) edge
//!  ├─ 3. Attempt   invoke strategies one at a time, timeout per attempt
//!  ├─ 4. Fallback  record each failure, move to the next strategy
//!  └─ 5. Outcome   ConversionResult with warnings, or every failure aggregated
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use docshift::{Converter, ConversionRequest, FormatGraph, StrategyRegistry};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut graph = FormatGraph::new();
//!     graph.register_edge("pdf", "txt", vec!["pdf-lib-text".into(), "poppler-text".into()])?;
//!
//!     let mut registry = StrategyRegistry::new();
//!     registry.bind_fn("pdf-lib-text", |_input, _options| {
//!         Err("encrypted document".into())
//!     })?;
//!     registry.bind_fn("poppler-text", |input, _options| {
//!         Ok(input.to_vec())
//!     })?;
//!
//!     let converter = Converter::new(graph, registry)?;
//!     let result = converter
//!         .convert(&ConversionRequest::new(b"%PDF-1.7".to_vec(), "pdf", "txt"))
//!         .await?;
//!
//!     assert_eq!(result.strategy.as_str(), "poppler-text");
//!     assert_eq!(result.warnings, vec!["encrypted document".to_string()]);
//!     Ok(())
//! }
//! ```
//!
//! ## Policy as configuration
//!
//! The edge table can live in deployment config instead of code; see
//! [`ConversionTable`] and [`ConversionTable::builtin`] for the standard
//! document matrix. Strategy implementations are bound separately in a
//! [`StrategyRegistry`], and [`Converter::new`] cross-checks the two at
//! startup.
//!
//! ## Concurrency
//!
//! A [`Converter`] is immutable after construction. Strategies within one
//! request run strictly one at a time; independent requests run freely in
//! parallel (see [`convert_stream`]). Per-attempt timeouts and cooperative
//! cancellation ([`CancelToken`]) bound runaway strategies.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod cancel;
pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod graph;
pub mod output;
pub mod progress;
pub mod strategy;
pub mod stream;
pub mod table;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use cancel::CancelToken;
pub use config::ConvertOptions;
pub use convert::{ConversionRequest, Converter};
pub use error::{AttemptFailure, ConvertError, RegistryError, StrategyError};
pub use format::{Format, StrategyId};
pub use graph::FormatGraph;
pub use output::ConversionResult;
pub use progress::ConversionObserver;
pub use strategy::{ConversionStrategy, FnStrategy, StrategyRegistry};
pub use stream::{convert_stream, ResultStream};
pub use table::ConversionTable;
