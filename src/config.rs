//! Per-request conversion options.
//!
//! [`ConvertOptions`] travels with a [`crate::convert::ConversionRequest`]
//! and is handed verbatim to every strategy attempted for it. The
//! orchestrator itself reads exactly one field, `attempt_timeout`;
//! everything else is opaque strategy configuration (an OCR language, a
//! render DPI) keyed by convention between the host and its strategy
//! bindings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Options for one conversion request.
///
/// # Example
/// ```rust
/// use docshift::ConvertOptions;
/// use std::time::Duration;
///
/// let options = ConvertOptions::default()
///     .with_attempt_timeout(Duration::from_secs(30))
///     .with_param("language", "deu");
///
/// assert_eq!(options.param_str("language"), Some("deu"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Upper bound for a single strategy attempt. Expiry counts as an
    /// ordinary attempt failure and triggers fallback to the next strategy.
    /// `None` means attempts may run indefinitely (until cancellation).
    pub attempt_timeout: Option<Duration>,

    /// Free-form strategy parameters. The orchestrator never interprets
    /// these.
    pub params: BTreeMap<String, serde_json::Value>,
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-attempt timeout.
    #[must_use]
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    /// Set a strategy parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Look up a parameter.
    pub fn param(&self, key: &str) -> Option<&serde_json::Value> {
        self.params.get(key)
    }

    /// Look up a string parameter, `None` if absent or not a string.
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(|v| v.as_str())
    }
}
