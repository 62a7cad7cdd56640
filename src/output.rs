//! Result types for a completed conversion.

use crate::format::StrategyId;
use serde::{Deserialize, Serialize};

/// The outcome of a successful conversion request.
///
/// A result with a non-empty `warnings` list still succeeded; the warnings
/// record, in attempt order, the failure message of every strategy that was
/// tried and failed before `strategy` produced the output. Callers that
/// care about degraded conversions (e.g. a slow OCR pass covering for a
/// broken parser) can log or surface them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    /// The converted document.
    pub output: Vec<u8>,

    /// The strategy that produced `output`.
    pub strategy: StrategyId,

    /// One message per failed attempt before success. Empty when the first
    /// strategy succeeded.
    pub warnings: Vec<String>,

    /// Total strategies attempted, including the successful one.
    pub attempts: usize,

    /// Wall-clock time for the whole request, including failed attempts.
    pub duration_ms: u64,
}

impl ConversionResult {
    /// Whether the preferred (first-ranked) strategy produced the output.
    pub fn used_primary(&self) -> bool {
        self.warnings.is_empty()
    }
}
