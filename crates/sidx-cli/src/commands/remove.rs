//! Remove command implementation.

use anyhow::Result;
use colored::Colorize;
use sidx_core::Storage;

/// Delete a cached source, its metadata, and its tantivy index.
pub fn remove_source(alias: &str, quiet: bool) -> Result<()> {
    let storage = Storage::new()?;
    storage.remove_source(alias)?;

    if !quiet {
        println!("{} {}", "✓ Removed".green(), alias);
    }
    Ok(())
}
