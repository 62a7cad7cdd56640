//! The conversion policy graph: which format pairs convert, and how.
//!
//! [`FormatGraph`] replaces the scattered `if source == X && target == Y`
//! conditionals a conversion service tends to grow with one declarative edge
//! table. Supported conversions become enumerable data: "is `docx -> html`
//! supported" is a single lookup, and adding a conversion is an additive,
//! reviewable change to the table rather than a new branch buried in a
//! handler.
//!
//! ## Invariants
//!
//! Enforced at registration time, so a built graph never violates them:
//!
//! * an edge's source and target differ
//! * every edge has at least one strategy
//! * each (source, target) pair is registered at most once; changing an
//!   existing edge requires the explicit [`FormatGraph::replace_edge`]
//! * no strategy id repeats within one edge
//!
//! The graph is plain data with no interior mutability. Build it at startup,
//! then share it freely across request tasks.

use crate::error::{ConvertError, RegistryError};
use crate::format::{Format, StrategyId};
use std::collections::HashMap;
use tracing::debug;

/// Registry of supported (source, target) conversions with their ranked
/// strategy lists.
///
/// Strategy order is priority order: the orchestrator attempts index 0
/// first and falls back down the list.
///
/// # Example
/// ```rust
/// use docshift::{Format, FormatGraph};
///
/// let mut graph = FormatGraph::new();
/// graph
///     .register_edge("pdf", "txt", vec!["pdf-lib".into(), "poppler".into()])
///     .unwrap();
///
/// assert!(graph.is_supported(&Format::new("pdf"), &Format::new("text")));
/// assert!(!graph.is_supported(&Format::new("txt"), &Format::new("pdf")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormatGraph {
    edges: HashMap<(Format, Format), Vec<StrategyId>>,
}

impl FormatGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new conversion edge.
    ///
    /// # Errors
    /// * [`RegistryError::IdentityEdge`] when source equals target
    /// * [`RegistryError::EmptyStrategyList`] when `strategies` is empty
    /// * [`RegistryError::DuplicateStrategy`] when an id repeats in the list
    /// * [`RegistryError::DuplicateEdge`] when the pair already exists; the
    ///   original edge is left unchanged
    pub fn register_edge(
        &mut self,
        source: impl Into<Format>,
        target: impl Into<Format>,
        strategies: Vec<StrategyId>,
    ) -> Result<(), RegistryError> {
        let source = source.into();
        let target = target.into();
        validate_edge(&source, &target, &strategies)?;

        let key = (source, target);
        if self.edges.contains_key(&key) {
            return Err(RegistryError::DuplicateEdge {
                source: key.0,
                target: key.1,
            });
        }

        debug!(
            source = %key.0,
            target = %key.1,
            strategies = strategies.len(),
            "registered conversion edge"
        );
        self.edges.insert(key, strategies);
        Ok(())
    }

    /// Replace the strategy list of an existing edge, returning the previous
    /// list.
    ///
    /// Replacement is a separate operation from registration: an edge that
    /// was never registered cannot be replaced
    /// ([`RegistryError::UnknownEdge`]). The new list is validated the same
    /// way as in [`FormatGraph::register_edge`].
    pub fn replace_edge(
        &mut self,
        source: impl Into<Format>,
        target: impl Into<Format>,
        strategies: Vec<StrategyId>,
    ) -> Result<Vec<StrategyId>, RegistryError> {
        let source = source.into();
        let target = target.into();
        validate_edge(&source, &target, &strategies)?;

        let key = (source, target);
        match self.edges.get_mut(&key) {
            Some(existing) => {
                debug!(source = %key.0, target = %key.1, "replaced conversion edge");
                Ok(std::mem::replace(existing, strategies))
            }
            None => Err(RegistryError::UnknownEdge {
                source: key.0,
                target: key.1,
            }),
        }
    }

    /// Whether a conversion from `source` to `target` is supported.
    ///
    /// Never fails: unknown formats simply yield `false`.
    pub fn is_supported(&self, source: &Format, target: &Format) -> bool {
        self.edges.contains_key(&(source.clone(), target.clone()))
    }

    /// The ranked strategy list for an edge, highest priority first.
    ///
    /// The returned slice is never empty (enforced at registration).
    ///
    /// # Errors
    /// [`ConvertError::UnsupportedConversion`] when no edge exists.
    pub fn strategies_for(
        &self,
        source: &Format,
        target: &Format,
    ) -> Result<&[StrategyId], ConvertError> {
        self.edges
            .get(&(source.clone(), target.clone()))
            .map(Vec::as_slice)
            .ok_or_else(|| ConvertError::UnsupportedConversion {
                source: source.clone(),
                target: target.clone(),
            })
    }

    /// Iterate all registered edges.
    pub fn edges(&self) -> impl Iterator<Item = (&Format, &Format, &[StrategyId])> {
        self.edges
            .iter()
            .map(|((s, t), ids)| (s, t, ids.as_slice()))
    }

    /// All targets reachable from `source`, sorted for stable output.
    pub fn supported_targets(&self, source: &Format) -> Vec<&Format> {
        let mut targets: Vec<&Format> = self
            .edges
            .keys()
            .filter(|(s, _)| s == source)
            .map(|(_, t)| t)
            .collect();
        targets.sort_unstable();
        targets
    }

    /// Number of registered edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Shape checks shared by register and replace.
fn validate_edge(
    source: &Format,
    target: &Format,
    strategies: &[StrategyId],
) -> Result<(), RegistryError> {
    if source == target {
        return Err(RegistryError::IdentityEdge {
            format: source.clone(),
        });
    }
    if strategies.is_empty() {
        return Err(RegistryError::EmptyStrategyList {
            source: source.clone(),
            target: target.clone(),
        });
    }
    for (i, id) in strategies.iter().enumerate() {
        if strategies[..i].contains(id) {
            return Err(RegistryError::DuplicateStrategy {
                source: source.clone(),
                target: target.clone(),
                strategy: id.clone(),
            });
        }
    }
    Ok(())
}
