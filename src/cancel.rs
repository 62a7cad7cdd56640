//! Cooperative cancellation for in-flight conversion requests.
//!
//! A [`CancelToken`] is a clonable, level-triggered flag shared between the
//! caller (an upload handler noticing a dropped connection, a job worker
//! shutting down) and the orchestrator. Cancelling stops the wait on the
//! current strategy attempt and prevents any further fallback; the request
//! fails with [`crate::error::ConvertError::Cancelled`], which is distinct
//! from "all strategies failed".
//!
//! Built on a tokio `watch` channel: the flag only ever moves from `false`
//! to `true`, every clone observes the same state, and `cancelled()` can be
//! awaited from any number of tasks.

use std::sync::Arc;
use tokio::sync::watch;

/// A clonable cancellation flag.
///
/// # Example
/// ```rust,no_run
/// use docshift::CancelToken;
///
/// # async fn example() {
/// let token = CancelToken::new();
/// let for_request = token.clone();
///
/// tokio::spawn(async move {
///     // caller-side: cancel when the client goes away
///     token.cancel();
/// });
///
/// for_request.cancelled().await;
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    /// Create a token in the not-cancelled state.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        CancelToken { tx: Arc::new(tx) }
    }

    /// Flip the flag. Idempotent; wakes every task awaiting
    /// [`CancelToken::cancelled`].
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Whether the token has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolve once the token is cancelled. Resolves immediately if it
    /// already is.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives inside self, so wait_for can only fail if this
        // token is dropped mid-await, which cannot be observed by the caller.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
