//! The strategy plug-in interface and the id-to-implementation registry.
//!
//! A strategy is one concrete conversion implementation: a wrapped parser
//! library, a subprocess invocation, an OCR engine. The core never learns
//! what is behind the trait; everything is adapted to the one shape
//! `(bytes, options) -> bytes or fail`, and any failure is treated
//! uniformly as "this attempt did not work, fall back".
//!
//! Strategies are bound to ids in a [`StrategyRegistry`] by the host at
//! startup, independently of the edges that reference them. The same
//! binding may serve several edges (one OCR strategy for `pdf -> txt` and
//! `jpg -> txt`).

use crate::config::ConvertOptions;
use crate::error::{RegistryError, StrategyError};
use crate::format::StrategyId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// One conversion implementation.
///
/// Implementations must be `Send + Sync`; the orchestrator shares them
/// across concurrent requests. They should also be idempotent for identical
/// input bytes: the orchestrator attempts each strategy exactly once per
/// request today, and idempotence keeps re-invocation safe.
///
/// Strategies may perform I/O (read side files, spawn subprocesses); the
/// orchestrator bounds each attempt with the request's
/// [`ConvertOptions::attempt_timeout`].
#[async_trait]
pub trait ConversionStrategy: Send + Sync {
    /// Convert `input` into the edge's target representation.
    async fn convert(
        &self,
        input: &[u8],
        options: &ConvertOptions,
    ) -> Result<Vec<u8>, StrategyError>;
}

/// Adapter turning a plain closure into a [`ConversionStrategy`].
///
/// The closure runs inline on the async worker; wrap genuinely blocking
/// work in `tokio::task::spawn_blocking` inside a hand-written strategy
/// instead.
///
/// # Example
/// ```rust
/// use docshift::FnStrategy;
///
/// let upper = FnStrategy::new(|input, _options| {
///     Ok(input.to_ascii_uppercase())
/// });
/// ```
pub struct FnStrategy<F> {
    f: F,
}

impl<F> FnStrategy<F>
where
    F: Fn(&[u8], &ConvertOptions) -> Result<Vec<u8>, StrategyError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        FnStrategy { f }
    }
}

#[async_trait]
impl<F> ConversionStrategy for FnStrategy<F>
where
    F: Fn(&[u8], &ConvertOptions) -> Result<Vec<u8>, StrategyError> + Send + Sync,
{
    async fn convert(
        &self,
        input: &[u8],
        options: &ConvertOptions,
    ) -> Result<Vec<u8>, StrategyError> {
        (self.f)(input, options)
    }
}

/// Startup-time binding of strategy ids to implementations.
///
/// Like the [`crate::graph::FormatGraph`], the registry is built once and
/// read-only afterwards. [`crate::convert::Converter::new`] cross-checks
/// that every edge's ids are bound here, so a typo between table and
/// registry fails at startup instead of at request time.
#[derive(Default)]
pub struct StrategyRegistry {
    bindings: HashMap<StrategyId, Arc<dyn ConversionStrategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an implementation to an id.
    ///
    /// # Errors
    /// [`RegistryError::DuplicateBinding`] when the id is already bound;
    /// the original binding is unchanged.
    pub fn bind(
        &mut self,
        id: impl Into<StrategyId>,
        strategy: Arc<dyn ConversionStrategy>,
    ) -> Result<(), RegistryError> {
        let id = id.into();
        if self.bindings.contains_key(&id) {
            return Err(RegistryError::DuplicateBinding { strategy: id });
        }
        self.bindings.insert(id, strategy);
        Ok(())
    }

    /// Convenience for binding a closure via [`FnStrategy`].
    pub fn bind_fn<F>(&mut self, id: impl Into<StrategyId>, f: F) -> Result<(), RegistryError>
    where
        F: Fn(&[u8], &ConvertOptions) -> Result<Vec<u8>, StrategyError> + Send + Sync + 'static,
    {
        self.bind(id, Arc::new(FnStrategy::new(f)))
    }

    /// Look up a binding.
    pub fn get(&self, id: &StrategyId) -> Option<&Arc<dyn ConversionStrategy>> {
        self.bindings.get(id)
    }

    pub fn contains(&self, id: &StrategyId) -> bool {
        self.bindings.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&StrategyId> = self.bindings.keys().collect();
        ids.sort_unstable();
        f.debug_struct("StrategyRegistry").field("ids", &ids).finish()
    }
}
