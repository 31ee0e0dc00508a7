//! Search command implementation.

use anyhow::Result;
use sidx_core::{Category, Config, SearchIndex, Storage};
use tracing::debug;

use crate::cli::OutputFormat;
use crate::output::print_hits;

/// Search one cached source, or all of them, and print ranked hits.
pub fn search(
    query: &str,
    source: Option<&str>,
    category: Option<&str>,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let limit = match limit {
        Some(n) => n,
        None => Config::load()?.defaults.max_results,
    };
    let storage = Storage::new()?;

    let aliases = match source {
        Some(alias) => {
            if !storage.exists(alias) {
                anyhow::bail!("source '{alias}' is not cached; run 'sidx add {alias} <url>'");
            }
            vec![alias.to_string()]
        },
        None => {
            let all = storage.list_sources()?;
            if all.is_empty() {
                anyhow::bail!("no sources cached; run 'sidx add <alias> <url>' first");
            }
            all
        },
    };

    let category = category.map(|c| Category::from(c.to_string()));

    let mut hits = Vec::new();
    for alias in &aliases {
        let index_dir = storage.index_dir(alias)?;
        if !index_dir.exists() {
            debug!("no index directory for {}, skipping", alias);
            continue;
        }
        let index = SearchIndex::open(&index_dir)?;
        hits.extend(index.search(query, Some(alias), category.as_ref(), limit)?);
    }

    // Scores from different indexes are comparable enough for display
    // ordering; exact cross-source ranking is not a goal.
    hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    hits.truncate(limit);

    print_hits(&hits, format)
}
