//! The conversion orchestrator: execute one request against the policy.
//!
//! [`Converter`] owns the validated policy (a [`FormatGraph`] plus a
//! [`StrategyRegistry`]) and runs requests to completion or exhaustion: it
//! looks up the edge's ranked strategy list and attempts each strategy in
//! order, sequentially, until one succeeds or all have failed. Strategies
//! within one request are never run in parallel; an attempt may hold a
//! subprocess or a large buffer, and falling back only makes sense once the
//! previous attempt definitively failed.
//!
//! The orchestrator performs no I/O of its own. It moves request bytes into
//! strategies and collects what comes back, which keeps its control flow
//! deterministic and testable with closure strategies
//! ([`crate::strategy::FnStrategy`]) standing in for real decoders.
//!
//! Independent requests may run concurrently on one shared `Converter`;
//! the policy is immutable after construction, so no locking is involved.

use crate::cancel::CancelToken;
use crate::config::ConvertOptions;
use crate::error::{AttemptFailure, ConvertError, RegistryError, StrategyError};
use crate::format::Format;
use crate::graph::FormatGraph;
use crate::output::ConversionResult;
use crate::progress::{ConversionObserver, NoopObserver};
use crate::strategy::{ConversionStrategy, StrategyRegistry};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// One conversion request: input bytes plus the (source, target) pair and
/// per-request options. Created per call, not persisted.
///
/// # Example
/// ```rust
/// use docshift::{ConversionRequest, ConvertOptions};
/// use std::time::Duration;
///
/// let request = ConversionRequest::new(b"%PDF-1.7 ...".to_vec(), "pdf", "txt")
///     .with_options(ConvertOptions::default().with_attempt_timeout(Duration::from_secs(30)));
/// ```
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// The document to convert.
    pub input: Vec<u8>,
    /// Format of `input`.
    pub source: Format,
    /// Requested output format.
    pub target: Format,
    /// Per-request options, forwarded to every attempted strategy.
    pub options: ConvertOptions,
}

impl ConversionRequest {
    pub fn new(
        input: impl Into<Vec<u8>>,
        source: impl Into<Format>,
        target: impl Into<Format>,
    ) -> Self {
        ConversionRequest {
            input: input.into(),
            source: source.into(),
            target: target.into(),
            options: ConvertOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }
}

/// Executes conversion requests against an immutable policy.
///
/// Construction validates the policy end to end: every strategy id on every
/// edge must have an implementation bound in the registry, so an id typo
/// between the conversion table and the host's bindings fails at startup
/// rather than surfacing as a broken conversion path in production.
///
/// # Example
/// ```rust
/// use docshift::{Converter, ConversionRequest, FormatGraph, StrategyRegistry};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut graph = FormatGraph::new();
/// graph.register_edge("docx", "html", vec!["mammoth-html".into()])?;
///
/// let mut registry = StrategyRegistry::new();
/// registry.bind_fn("mammoth-html", |input, _options| {
///     Ok(format!("<p>{} bytes</p>", input.len()).into_bytes())
/// })?;
///
/// let converter = Converter::new(graph, registry)?;
/// let result = converter
///     .convert(&ConversionRequest::new(b"PK\x03\x04".to_vec(), "docx", "html"))
///     .await?;
/// assert_eq!(result.strategy.as_str(), "mammoth-html");
/// # Ok(())
/// # }
/// ```
pub struct Converter {
    graph: FormatGraph,
    registry: StrategyRegistry,
    observer: Arc<dyn ConversionObserver>,
}

impl Converter {
    /// Build a converter from a graph and a registry.
    ///
    /// # Errors
    /// [`RegistryError::UnboundStrategy`] naming the first edge whose
    /// strategy id has no binding.
    pub fn new(graph: FormatGraph, registry: StrategyRegistry) -> Result<Self, RegistryError> {
        for (source, target, strategies) in graph.edges() {
            for id in strategies {
                if !registry.contains(id) {
                    return Err(RegistryError::UnboundStrategy {
                        source: source.clone(),
                        target: target.clone(),
                        strategy: id.clone(),
                    });
                }
            }
        }
        Ok(Converter {
            graph,
            registry,
            observer: Arc::new(NoopObserver),
        })
    }

    /// Install an observer receiving per-attempt events.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ConversionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// The policy graph this converter executes.
    pub fn graph(&self) -> &FormatGraph {
        &self.graph
    }

    /// Execute a conversion request.
    ///
    /// # Errors
    /// * [`ConvertError::IdentityConversion`] when source equals target,
    ///   checked before anything else; pass-through is the caller's job
    /// * [`ConvertError::UnsupportedConversion`] when no edge exists; no
    ///   strategy is invoked
    /// * [`ConvertError::AllStrategiesFailed`] when every strategy on the
    ///   edge failed, carrying each attempt's (strategy, message) in order
    pub async fn convert(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionResult, ConvertError> {
        self.run(request, None).await
    }

    /// Execute a conversion request under a cancellation token.
    ///
    /// Cancellation is observed between attempts and while an attempt is in
    /// flight. Once observed, the request fails with
    /// [`ConvertError::Cancelled`] immediately: the current attempt is no
    /// longer awaited and no further strategy is tried.
    pub async fn convert_with_cancel(
        &self,
        request: &ConversionRequest,
        cancel: &CancelToken,
    ) -> Result<ConversionResult, ConvertError> {
        self.run(request, Some(cancel)).await
    }

    /// Blocking wrapper around [`Converter::convert`] for synchronous
    /// callers. Creates a temporary runtime.
    pub fn convert_sync(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionResult, ConvertError> {
        tokio::runtime::Runtime::new()
            .map_err(|e| ConvertError::Internal(format!("failed to create tokio runtime: {e}")))?
            .block_on(self.convert(request))
    }

    async fn run(
        &self,
        request: &ConversionRequest,
        cancel: Option<&CancelToken>,
    ) -> Result<ConversionResult, ConvertError> {
        let started = Instant::now();

        // Identity is rejected regardless of what the graph contains.
        if request.source == request.target {
            return Err(ConvertError::IdentityConversion {
                format: request.source.clone(),
            });
        }

        let strategies = self.graph.strategies_for(&request.source, &request.target)?;
        info!(
            source = %request.source,
            target = %request.target,
            strategies = strategies.len(),
            "starting conversion"
        );
        self.observer
            .on_convert_start(&request.source, &request.target, strategies.len());

        let mut failures: Vec<AttemptFailure> = Vec::new();

        for (rank, id) in strategies.iter().enumerate() {
            if let Some(token) = cancel {
                if token.is_cancelled() {
                    info!(strategy = %id, "cancelled before attempt");
                    return Err(ConvertError::Cancelled {
                        strategy: id.clone(),
                    });
                }
            }

            // Converter::new verified every edge id is bound; a miss here
            // is recorded like any other failed attempt rather than a panic.
            let Some(strategy) = self.registry.get(id) else {
                failures.push(AttemptFailure {
                    strategy: id.clone(),
                    message: "no implementation bound".into(),
                });
                continue;
            };

            debug!(strategy = %id, rank, "attempting strategy");
            self.observer.on_attempt_start(id, rank);

            let outcome = match cancel {
                Some(token) => {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => {
                            info!(strategy = %id, "cancelled mid-attempt");
                            return Err(ConvertError::Cancelled {
                                strategy: id.clone(),
                            });
                        }
                        outcome = run_attempt(strategy.as_ref(), &request.input, &request.options) => outcome,
                    }
                }
                None => run_attempt(strategy.as_ref(), &request.input, &request.options).await,
            };

            match outcome {
                Ok(output) => {
                    let warnings: Vec<String> =
                        failures.iter().map(|f| f.message.clone()).collect();
                    let duration_ms = started.elapsed().as_millis() as u64;
                    info!(
                        strategy = %id,
                        attempts = failures.len() + 1,
                        duration_ms,
                        "conversion complete"
                    );
                    self.observer.on_convert_complete(id, failures.len());
                    return Ok(ConversionResult {
                        output,
                        strategy: id.clone(),
                        warnings,
                        attempts: failures.len() + 1,
                        duration_ms,
                    });
                }
                Err(e) => {
                    warn!(strategy = %id, error = %e, "strategy failed");
                    let failure = AttemptFailure {
                        strategy: id.clone(),
                        message: e.to_string(),
                    };
                    self.observer.on_attempt_failed(&failure);
                    failures.push(failure);
                }
            }
        }

        warn!(
            source = %request.source,
            target = %request.target,
            attempts = failures.len(),
            "all strategies failed"
        );
        Err(ConvertError::AllStrategiesFailed {
            source: request.source.clone(),
            target: request.target.clone(),
            attempts: failures,
        })
    }
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("edges", &self.graph.len())
            .field("strategies", &self.registry.len())
            .finish()
    }
}

/// One attempt, bounded by the request's timeout when set. Expiry is an
/// ordinary strategy failure so the orchestrator falls back normally.
async fn run_attempt(
    strategy: &dyn ConversionStrategy,
    input: &[u8],
    options: &ConvertOptions,
) -> Result<Vec<u8>, StrategyError> {
    match options.attempt_timeout {
        Some(limit) => match timeout(limit, strategy.convert(input, options)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(StrategyError::new(format!(
                "timed out after {}ms",
                limit.as_millis()
            ))),
        },
        None => strategy.convert(input, options).await,
    }
}
