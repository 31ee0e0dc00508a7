//! Core data types for documentation search indexes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record kind markers emitted by documentation generators.
///
/// The known set is fixed by the generator: `page` and `section` records
/// come from the page structure, the remaining kinds from docstrings.
/// Foreign indexes occasionally carry values outside this set; those
/// round-trip through [`Category::Other`] so parsing never fails on them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    /// Prose block belonging to a page body.
    Page,
    /// Heading anchor within a page.
    Section,
    /// Docstring for a function.
    Function,
    /// Docstring for a single method.
    Method,
    /// Docstring for a macro.
    Macro,
    /// Docstring for a type.
    Type,
    /// Docstring for a module.
    Module,
    /// Docstring for a constant.
    Constant,
    /// Docstring for a language keyword.
    Keyword,
    /// Docstring for a struct field.
    Field,
    /// Any category outside the known set, preserved verbatim.
    Other(String),
}

impl Category {
    /// All category values the generator is known to emit.
    pub const KNOWN: [&'static str; 10] = [
        "page", "section", "function", "method", "macro", "type", "module", "constant", "keyword",
        "field",
    ];

    /// String form as it appears in the JSON payload.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Page => "page",
            Self::Section => "section",
            Self::Function => "function",
            Self::Method => "method",
            Self::Macro => "macro",
            Self::Type => "type",
            Self::Module => "module",
            Self::Constant => "constant",
            Self::Keyword => "keyword",
            Self::Field => "field",
            Self::Other(s) => s,
        }
    }

    /// Whether this value belongs to the fixed known set.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        match s.as_str() {
            "page" => Self::Page,
            "section" => Self::Section,
            "function" => Self::Function,
            "method" => Self::Method,
            "macro" => Self::Macro,
            "type" => Self::Type,
            "module" => Self::Module,
            "constant" => Self::Constant,
            "keyword" => Self::Keyword,
            "field" => Self::Field,
            _ => Self::Other(s),
        }
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.as_str().to_string()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single documentation record in a search index.
///
/// Records are independent and immutable once generated; the collection
/// order mirrors source-document order. Field order here matches the
/// generator's JSON key order so serialization is byte-stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocRecord {
    /// Relative URL fragment identifying the page or anchor,
    /// e.g. `guide/intro/` or `guide/intro/#Setup`.
    pub location: String,
    /// Human-readable page title.
    pub page: String,
    /// Section or symbol title; empty for plain prose records.
    #[serde(default)]
    pub title: String,
    /// Extracted prose or docstring content used for full-text matching.
    #[serde(default)]
    pub text: String,
    /// Record kind marker.
    pub category: Category,
}

/// The top-level search index payload: `{"docs": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIndexFile {
    /// All documentation records, in source-document order.
    pub docs: Vec<DocRecord>,
}

impl SearchIndexFile {
    /// Number of records in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Whether the index holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

/// Metadata about where a cached search index came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    /// URL the index was fetched from.
    pub url: String,
    /// `ETag` returned by the server, if any.
    pub etag: Option<String>,
    /// `Last-Modified` returned by the server, if any.
    pub last_modified: Option<String>,
    /// When the index was last fetched.
    pub fetched_at: DateTime<Utc>,
    /// SHA-256 digest of the fetched payload.
    pub sha256: String,
    /// Number of records in the cached index.
    pub record_count: usize,
}

/// A scored search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Alias of the source the hit came from.
    pub source: String,
    /// Location fragment of the matching record.
    pub location: String,
    /// Page title of the matching record.
    pub page: String,
    /// Section or symbol title, possibly empty.
    pub title: String,
    /// Snippet of the record text around the first match.
    pub snippet: String,
    /// Relevance score assigned by the index.
    pub score: f32,
    /// Category of the matching record.
    pub category: Category,
}

/// Severity levels for validation diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    /// Structural invariant violated; the index is not valid.
    Error,
    /// Suspicious but usable.
    Warn,
    /// Informational census data.
    Info,
}

/// A single finding produced by index validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// How severe the finding is.
    pub severity: DiagnosticSeverity,
    /// Human-readable description.
    pub message: String,
    /// Zero-based index of the offending record, when applicable.
    pub record: Option<usize>,
}
