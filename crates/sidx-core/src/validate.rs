//! Structural validation of search index collections.
//!
//! Generated indexes are not trusted blindly: a broken documentation build
//! can ship records with missing page titles, stray categories, or
//! duplicated anchors. Validation walks the record collection once and reports
//! findings as [`Diagnostic`]s. Error-severity findings mean the index
//! violates a structural invariant; warnings mark content that still
//! indexes but deserves a look.

use crate::{Category, Diagnostic, DiagnosticSeverity, SearchIndexFile};
use std::collections::{BTreeMap, HashSet};

/// Validate a search index, returning all findings.
///
/// The checks, in order per record:
/// - `page` and `category` must be non-empty (error); `location` may be
///   empty, which denotes the site root page;
/// - `category` should belong to the generator's known set (warn);
/// - `location` must be a relative fragment, not an absolute URL (warn);
/// - `(location, title)` pairs should be unique among `section` records
///   (warn on repeats). Page records legitimately repeat the pair, one
///   per prose block.
///
/// A trailing info diagnostic carries a census of record counts per
/// category, in stable alphabetical order.
#[must_use]
pub fn validate(index: &SearchIndexFile) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut census: BTreeMap<&str, usize> = BTreeMap::new();

    for (i, record) in index.docs.iter().enumerate() {
        if record.page.is_empty() {
            diagnostics.push(error(i, "record has an empty page title"));
        }

        let category = record.category.as_str();
        if category.is_empty() {
            diagnostics.push(error(i, "record has an empty category"));
        } else if !record.category.is_known() {
            diagnostics.push(warn(
                i,
                format!("unknown category '{category}' (known: page, section, docstring kinds)"),
            ));
        }

        if record.location.contains("://") {
            diagnostics.push(warn(
                i,
                format!(
                    "location '{}' is an absolute URL; expected a relative fragment",
                    record.location
                ),
            ));
        }

        if record.category == Category::Section
            && !seen.insert((record.location.as_str(), record.title.as_str()))
        {
            diagnostics.push(warn(
                i,
                format!(
                    "duplicate section for location '{}' title '{}'",
                    record.location, record.title
                ),
            ));
        }

        *census.entry(category).or_insert(0) += 1;
    }

    let breakdown = census
        .iter()
        .map(|(category, count)| format!("{category}: {count}"))
        .collect::<Vec<_>>()
        .join(", ");
    diagnostics.push(Diagnostic {
        severity: DiagnosticSeverity::Info,
        message: if breakdown.is_empty() {
            format!("{} records", index.len())
        } else {
            format!("{} records ({breakdown})", index.len())
        },
        record: None,
    });

    diagnostics
}

/// Whether a diagnostic set contains no error-severity findings.
#[must_use]
pub fn is_valid(diagnostics: &[Diagnostic]) -> bool {
    !diagnostics
        .iter()
        .any(|d| d.severity == DiagnosticSeverity::Error)
}

fn error(record: usize, message: impl Into<String>) -> Diagnostic {
    Diagnostic {
        severity: DiagnosticSeverity::Error,
        message: message.into(),
        record: Some(record),
    }
}

fn warn(record: usize, message: impl Into<String>) -> Diagnostic {
    Diagnostic {
        severity: DiagnosticSeverity::Warn,
        message: message.into(),
        record: Some(record),
    }
}
