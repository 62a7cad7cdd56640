//! Declarative conversion tables.
//!
//! A [`ConversionTable`] is the startup-time, data-only description of a
//! conversion policy: `source -> target -> [strategy ids]`. Hosts ship the
//! table next to their deployment config (JSON) or build it in code, then
//! turn it into a validated [`FormatGraph`] with [`ConversionTable::to_graph`].
//!
//! Keys are kept as the raw strings they were written with; normalisation
//! happens in `to_graph`, so a table that spells both `"text"` and `"txt"`
//! under one source is caught as a [`RegistryError::DuplicateEdge`] instead
//! of one spelling silently shadowing the other.
//!
//! [`ConversionTable::builtin`] carries the standard document matrix for a
//! conversion service (pdf/docx/html/md/csv/json/xlsx/txt plus OCR edges for
//! scanned images), with each edge's strategies in primary-then-fallback
//! order.
//!
//! [`RegistryError::DuplicateEdge`]: crate::error::RegistryError::DuplicateEdge

use crate::error::RegistryError;
use crate::graph::FormatGraph;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A `source -> target -> ordered strategy ids` table.
///
/// # Example
/// ```rust
/// use docshift::ConversionTable;
///
/// let table = ConversionTable::from_json_str(
///     r#"{ "docx": { "html": ["mammoth-html"] } }"#,
/// ).unwrap();
/// let graph = table.to_graph().unwrap();
/// assert_eq!(graph.len(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversionTable {
    entries: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl ConversionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or extend an entry. Raw spellings are preserved; validation
    /// happens in [`ConversionTable::to_graph`].
    pub fn insert(
        &mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        strategies: impl IntoIterator<Item = impl Into<String>>,
    ) -> &mut Self {
        self.entries
            .entry(source.into())
            .or_default()
            .insert(target.into(), strategies.into_iter().map(Into::into).collect());
        self
    }

    /// Parse a table from JSON.
    ///
    /// # Errors
    /// [`RegistryError::InvalidTable`] with the parser's message.
    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        serde_json::from_str(json).map_err(|e| RegistryError::InvalidTable {
            detail: e.to_string(),
        })
    }

    /// Build a validated [`FormatGraph`] from the table.
    ///
    /// Every edge goes through [`FormatGraph::register_edge`], so all
    /// registration errors apply: alias collisions between raw spellings
    /// surface as [`RegistryError::DuplicateEdge`] rather than being merged.
    pub fn to_graph(&self) -> Result<FormatGraph, RegistryError> {
        let mut graph = FormatGraph::new();
        for (source, targets) in &self.entries {
            for (target, strategies) in targets {
                graph.register_edge(
                    source.as_str(),
                    target.as_str(),
                    strategies.iter().map(|s| s.as_str().into()).collect(),
                )?;
            }
        }
        Ok(graph)
    }

    /// The standard document-conversion matrix.
    ///
    /// Sources and targets cover the common office/text formats; strategy
    /// ids name the conventional tool for each edge (`pdf-lib` parse with
    /// `poppler` and `tesseract-ocr` fallbacks for PDF text extraction,
    /// `mammoth` for DOCX, `sheetjs` for workbooks, and so on). Hosts bind
    /// implementations for the ids they deploy and prune the rest.
    pub fn builtin() -> &'static ConversionTable {
        static BUILTIN: Lazy<ConversionTable> = Lazy::new(|| {
            let mut table = ConversionTable::new();
            for (source, target, strategies) in BUILTIN_EDGES {
                table.insert(*source, *target, strategies.iter().copied());
            }
            table
        });
        &BUILTIN
    }
}

/// The builtin matrix as data. Strategy order is priority order.
const BUILTIN_EDGES: &[(&str, &str, &[&str])] = &[
    // PDF extraction: structured parse first, pdftotext when the file is
    // malformed or encrypted, OCR as the last resort for scanned documents.
    ("pdf", "txt", &["pdf-lib-text", "poppler-text", "tesseract-ocr"]),
    ("pdf", "html", &["poppler-html"]),
    ("pdf", "md", &["poppler-markdown"]),
    // DOCX
    ("docx", "pdf", &["mammoth-pdf"]),
    ("docx", "html", &["mammoth-html"]),
    ("docx", "txt", &["mammoth-text"]),
    ("docx", "md", &["mammoth-markdown"]),
    // HTML
    ("html", "pdf", &["jsdom-pdf"]),
    ("html", "md", &["jsdom-markdown"]),
    ("html", "txt", &["jsdom-text"]),
    // Markdown
    ("md", "html", &["marked-html"]),
    ("md", "pdf", &["marked-pdf"]),
    ("md", "txt", &["marked-text"]),
    // CSV
    ("csv", "json", &["papaparse-json"]),
    ("csv", "html", &["papaparse-html"]),
    ("csv", "pdf", &["papaparse-pdf"]),
    ("csv", "chart", &["papaparse-chart"]),
    // JSON
    ("json", "csv", &["json-csv"]),
    ("json", "html", &["json-html"]),
    ("json", "chart", &["json-chart"]),
    // Workbooks
    ("xlsx", "csv", &["sheetjs-csv"]),
    ("xlsx", "json", &["sheetjs-json"]),
    ("xlsx", "pdf", &["sheetjs-pdf"]),
    ("xlsx", "chart", &["sheetjs-chart"]),
    ("xls", "csv", &["sheetjs-csv"]),
    ("xls", "json", &["sheetjs-json"]),
    ("xls", "pdf", &["sheetjs-pdf"]),
    ("xls", "chart", &["sheetjs-chart"]),
    // Plain text
    ("txt", "pdf", &["text-pdf"]),
    ("txt", "html", &["text-html"]),
    // Scanned images share one OCR strategy; same binding, several edges.
    ("jpg", "txt", &["tesseract-ocr"]),
    ("png", "txt", &["tesseract-ocr"]),
    ("tiff", "txt", &["tesseract-ocr"]),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Format;

    #[test]
    fn builtin_builds_a_valid_graph() {
        let graph = ConversionTable::builtin().to_graph().unwrap();
        assert_eq!(graph.len(), BUILTIN_EDGES.len());

        // Every builtin edge honours the registration invariants.
        for (source, target, strategies) in graph.edges() {
            assert_ne!(source, target);
            assert!(!strategies.is_empty());
        }
    }

    #[test]
    fn builtin_pdf_text_fallback_order() {
        let graph = ConversionTable::builtin().to_graph().unwrap();
        let strategies = graph
            .strategies_for(&Format::new("pdf"), &Format::new("text"))
            .unwrap();
        let names: Vec<&str> = strategies.iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["pdf-lib-text", "poppler-text", "tesseract-ocr"]);
    }

    #[test]
    fn json_round_trip() {
        let json = r#"{
            "pdf": { "txt": ["pdf-lib-text", "poppler-text"] },
            "docx": { "html": ["mammoth-html"] }
        }"#;
        let table = ConversionTable::from_json_str(json).unwrap();
        let graph = table.to_graph().unwrap();

        assert_eq!(graph.len(), 2);
        assert!(graph.is_supported(&Format::new("docx"), &Format::new("html")));
    }

    #[test]
    fn malformed_json_is_invalid_table() {
        let err = ConversionTable::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidTable { .. }));
    }

    #[test]
    fn alias_collision_between_raw_keys_is_duplicate_edge() {
        let json = r#"{
            "pdf": {
                "text": ["poppler-text"],
                "txt": ["pdf-lib-text"]
            }
        }"#;
        let table = ConversionTable::from_json_str(json).unwrap();
        let err = table.to_graph().unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateEdge { .. }));
    }

    #[test]
    fn empty_strategy_list_in_table_rejected() {
        let table = ConversionTable::from_json_str(r#"{ "csv": { "json": [] } }"#).unwrap();
        let err = table.to_graph().unwrap_err();
        assert!(matches!(err, RegistryError::EmptyStrategyList { .. }));
    }
}
