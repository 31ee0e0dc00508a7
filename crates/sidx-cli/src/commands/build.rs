//! Build command implementation.

use std::io::Write as _;
use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use sidx_core::{IndexBuilder, write_search_index_js};

use crate::cli::OutputFormat;
use crate::output::print_diagnostics;

/// Generate a `search_index.js` from a directory of Markdown pages.
pub fn build_index(docs_dir: &Path, output: Option<&Path>, quiet: bool) -> Result<()> {
    if !docs_dir.is_dir() {
        anyhow::bail!("'{}' is not a directory", docs_dir.display());
    }

    let mut builder = IndexBuilder::new()?;
    let result = builder.build_from_dir(docs_dir)?;

    if !result.diagnostics.is_empty() && !quiet {
        print_diagnostics(&result.diagnostics, OutputFormat::Text)?;
    }

    let js = write_search_index_js(&result.index)?;
    match output {
        Some(path) => {
            std::fs::write(path, &js)
                .map_err(|e| anyhow::anyhow!("failed to write '{}': {e}", path.display()))?;
            if !quiet {
                println!(
                    "{} {} records from {} pages -> {}",
                    "✓ Built".green(),
                    result.index.len(),
                    result.page_count,
                    path.display(),
                );
            }
        },
        None => {
            // Raw artifact on stdout so it can be piped; summary goes to
            // stderr to keep the stream clean.
            std::io::stdout().write_all(js.as_bytes())?;
            if !quiet {
                eprintln!(
                    "✓ Built {} records from {} pages",
                    result.index.len(),
                    result.page_count,
                );
            }
        },
    }
    Ok(())
}
