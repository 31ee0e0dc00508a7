//! List command implementation.

use anyhow::Result;
use sidx_core::Storage;
use tracing::warn;

use crate::cli::OutputFormat;
use crate::output::{SourceSummary, print_sources};

/// Print a summary of every cached source.
pub fn list_sources(format: OutputFormat) -> Result<()> {
    let storage = Storage::new()?;

    let mut summaries = Vec::new();
    for alias in storage.list_sources()? {
        match storage.load_metadata(&alias) {
            Ok(metadata) => summaries.push(SourceSummary {
                alias,
                url: metadata.url,
                fetched_at: metadata.fetched_at,
                records: metadata.record_count,
            }),
            Err(e) => warn!("skipping {}: {}", alias, e),
        }
    }

    print_sources(&summaries, format)
}
