//! Reading and writing the on-disk search index format.
//!
//! Documentation generators ship the index as a JavaScript assignment so a
//! search widget can load it with a plain `<script>` tag:
//!
//! ```text
//! var documenterSearchIndex = {"docs": [ ... ]}
//! ```
//!
//! This module accepts both that wrapped form (`search_index.js`) and the
//! bare JSON object, and writes both back deterministically: struct field
//! order, record order as given, compact separators. Identical inputs
//! always serialize to identical bytes.

use crate::{Error, Result, SearchIndexFile};

/// Variable name used by the generator's JS wrapper.
pub const JS_VARIABLE: &str = "documenterSearchIndex";

/// Parse a search index from either the JS-wrapped or bare JSON form.
///
/// Trailing semicolons and surrounding whitespace are tolerated. The
/// payload must be a JSON object with a `docs` key holding an array;
/// anything else is a parse error, not a validation diagnostic, because
/// no record collection can be recovered from it.
pub fn parse_search_index(input: &str) -> Result<SearchIndexFile> {
    let payload = strip_js_wrapper(input)?;

    let value: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| Error::Parse(format!("invalid JSON payload: {e}")))?;

    let Some(object) = value.as_object() else {
        return Err(Error::Parse(
            "top-level value must be a JSON object".to_string(),
        ));
    };

    match object.get("docs") {
        None => {
            return Err(Error::Parse(
                "missing top-level `docs` key".to_string(),
            ));
        },
        Some(docs) if !docs.is_array() => {
            return Err(Error::Parse(
                "top-level `docs` key must hold an array".to_string(),
            ));
        },
        Some(_) => {},
    }

    serde_json::from_value(value).map_err(|e| Error::Parse(format!("malformed record: {e}")))
}

/// Serialize an index to the JS-wrapped form, trailing newline included.
pub fn write_search_index_js(index: &SearchIndexFile) -> Result<String> {
    let json = serde_json::to_string(index)?;
    Ok(format!("var {JS_VARIABLE} = {json}\n"))
}

/// Serialize an index to bare pretty-printed JSON.
pub fn write_search_index_json(index: &SearchIndexFile) -> Result<String> {
    let mut json = serde_json::to_string_pretty(index)?;
    json.push('\n');
    Ok(json)
}

/// Strip the `var <name> =` prefix and any trailing semicolon, returning
/// the JSON payload slice.
fn strip_js_wrapper(input: &str) -> Result<&str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::Parse("empty search index file".to_string()));
    }

    let payload = if trimmed.starts_with('{') {
        trimmed
    } else if let Some(rest) = trimmed.strip_prefix("var ") {
        let (name, assigned) = rest
            .split_once('=')
            .ok_or_else(|| Error::Parse("JS wrapper has no assignment".to_string()))?;
        let name = name.trim();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Error::Parse(format!(
                "unexpected JS variable name '{name}'"
            )));
        }
        assigned.trim()
    } else {
        return Err(Error::Parse(
            "expected a JSON object or a `var <name> = ...` wrapper".to_string(),
        ));
    };

    Ok(payload.trim_end_matches(';').trim())
}
