//! Format and strategy identifiers.
//!
//! A [`Format`] names a document representation (`pdf`, `docx`, `html`, ...).
//! The set is open: any name the host application registers an edge for is a
//! valid format. Names are normalised on construction so that `"PDF"`,
//! `".pdf"` and `"pdf"` all key the same edge, and the spelling aliases the
//! conversion world never agrees on (`text`/`txt`, `markdown`/`md`) collapse
//! to one canonical form. Without this, a matrix can carry both a
//! `pdf -> txt` and a `pdf -> text` edge that silently shadow each other.
//!
//! A [`StrategyId`] names one concrete conversion implementation. Ids are
//! code-level identifiers chosen by the host (`"mammoth"`, `"poppler"`), so
//! they are kept case-sensitive and unnormalised.

use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A case-normalised document format name.
///
/// Construct with [`Format::new`]; equality, hashing and ordering operate on
/// the canonical form.
///
/// # Example
/// ```rust
/// use docshift::Format;
///
/// assert_eq!(Format::new("PDF"), Format::new("pdf"));
/// assert_eq!(Format::new(".docx"), Format::new("docx"));
/// assert_eq!(Format::new("markdown"), Format::new("md"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Format(String);

/// Alias spellings collapsed to one canonical name.
///
/// The list mirrors the aliases real upload handlers encounter: extension
/// vs. MIME-derived names for the same representation.
const FORMAT_ALIASES: &[(&str, &str)] = &[
    ("text", "txt"),
    ("plaintext", "txt"),
    ("markdown", "md"),
    ("excel", "xlsx"),
    ("jpeg", "jpg"),
];

impl Format {
    /// Create a format from any spelling of its name.
    ///
    /// Normalisation: trim whitespace, strip one leading `.` (so raw file
    /// extensions work), lowercase, then canonicalise known aliases.
    pub fn new(name: impl AsRef<str>) -> Self {
        let trimmed = name.as_ref().trim();
        let trimmed = trimmed.strip_prefix('.').unwrap_or(trimmed);
        let lower = trimmed.to_ascii_lowercase();
        let canonical = FORMAT_ALIASES
            .iter()
            .find(|(alias, _)| *alias == lower)
            .map(|(_, canon)| (*canon).to_string())
            .unwrap_or(lower);
        Format(canonical)
    }

    /// The canonical name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Format({})", self.0)
    }
}

// thiserror treats any error-variant field literally named `source` as the
// causal source and generates an `Error::source()` impl for it, which requires
// the field type to implement `std::error::Error`. The error enums in
// `crate::error` use `source: Format` to mean "source format"; satisfying the
// bound here (the default `source()` returns `None`) lets those derives compile
// without renaming the public fields or their `{source}` format strings.
impl std::error::Error for Format {}

impl From<&str> for Format {
    fn from(s: &str) -> Self {
        Format::new(s)
    }
}

impl From<String> for Format {
    fn from(s: String) -> Self {
        Format::new(s)
    }
}

impl Borrow<str> for Format {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Format {
    /// Deserialises through [`Format::new`] so a table loaded from JSON gets
    /// the same normalisation as one built in code.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Format::new(raw))
    }
}

/// The identifier of one registered conversion strategy.
///
/// Case-sensitive and otherwise opaque; the same id may appear on multiple
/// edges (e.g. an OCR strategy serving both `pdf -> txt` and `jpg -> txt`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyId(String);

impl StrategyId {
    pub fn new(id: impl Into<String>) -> Self {
        StrategyId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StrategyId({})", self.0)
    }
}

impl From<&str> for StrategyId {
    fn from(s: &str) -> Self {
        StrategyId::new(s)
    }
}

impl From<String> for StrategyId {
    fn from(s: String) -> Self {
        StrategyId::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalises_case_and_extension_dot() {
        assert_eq!(Format::new("PDF").as_str(), "pdf");
        assert_eq!(Format::new(".Docx").as_str(), "docx");
        assert_eq!(Format::new("  html  ").as_str(), "html");
    }

    #[test]
    fn canonicalises_aliases() {
        assert_eq!(Format::new("text"), Format::new("txt"));
        assert_eq!(Format::new("markdown"), Format::new("md"));
        assert_eq!(Format::new("MARKDOWN").as_str(), "md");
        assert_eq!(Format::new("excel").as_str(), "xlsx");
        assert_eq!(Format::new("jpeg"), Format::new("jpg"));
    }

    #[test]
    fn unknown_names_pass_through() {
        assert_eq!(Format::new("chart").as_str(), "chart");
        assert_eq!(Format::new("epub").as_str(), "epub");
    }

    #[test]
    fn serde_round_trip_normalises() {
        let f: Format = serde_json::from_str("\"Markdown\"").unwrap();
        assert_eq!(f.as_str(), "md");
        assert_eq!(serde_json::to_string(&f).unwrap(), "\"md\"");
    }

    #[test]
    fn strategy_ids_stay_case_sensitive() {
        assert_ne!(StrategyId::new("Mammoth"), StrategyId::new("mammoth"));
        assert_eq!(StrategyId::new("poppler").as_str(), "poppler");
    }
}
