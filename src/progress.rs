//! Observer trait for per-attempt conversion events.
//!
//! Install an [`Arc<dyn ConversionObserver>`] via
//! [`crate::convert::Converter::with_observer`] to receive events as the
//! orchestrator works through a request's strategy list. Callers can
//! forward events to metrics counters, a progress UI, or a job record
//! without the library knowing how the host communicates.
//!
//! All methods have no-op defaults, so implementations override only what
//! they care about. The trait is `Send + Sync`: independent requests run
//! concurrently, so methods may be called from several tasks at once and
//! implementations must guard shared mutable state themselves.

use crate::error::AttemptFailure;
use crate::format::{Format, StrategyId};

/// Called by the orchestrator while executing one conversion request.
pub trait ConversionObserver: Send + Sync {
    /// A request passed policy checks and is about to attempt strategies.
    fn on_convert_start(&self, source: &Format, target: &Format, strategies: usize) {
        let _ = (source, target, strategies);
    }

    /// A strategy attempt is starting. `rank` is the 0-based position in
    /// the edge's priority list.
    fn on_attempt_start(&self, strategy: &StrategyId, rank: usize) {
        let _ = (strategy, rank);
    }

    /// A strategy attempt failed (including timeout); the orchestrator will
    /// fall back if another strategy remains.
    fn on_attempt_failed(&self, failure: &AttemptFailure) {
        let _ = failure;
    }

    /// The request completed successfully.
    fn on_convert_complete(&self, strategy: &StrategyId, failed_attempts: usize) {
        let _ = (strategy, failed_attempts);
    }
}

/// Observer that ignores every event. Used when none is installed.
pub(crate) struct NoopObserver;

impl ConversionObserver for NoopObserver {}
