//! Validate command implementation.

use std::path::Path;

use anyhow::Result;
use sidx_core::{Storage, is_valid, parse_search_index, validate};

use crate::cli::OutputFormat;
use crate::output::print_diagnostics;

/// Validate a search index file on disk, or a cached source by alias.
pub fn validate_target(target: &str, format: OutputFormat) -> Result<()> {
    let index = if Path::new(target).exists() {
        let content = std::fs::read_to_string(target)
            .map_err(|e| anyhow::anyhow!("failed to read '{target}': {e}"))?;
        parse_search_index(&content)?
    } else {
        let storage = Storage::new()?;
        storage.load_index_file(target)?
    };

    let diagnostics = validate(&index);
    print_diagnostics(&diagnostics, format)?;

    if !is_valid(&diagnostics) {
        anyhow::bail!("validation failed for '{target}'");
    }
    Ok(())
}
