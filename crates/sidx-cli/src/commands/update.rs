//! Update command implementation.

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use sidx_core::{
    Config, FetchResult, Fetcher, Source, Storage, is_valid, parse_search_index, validate,
};
use tracing::warn;

use crate::commands::add::{fetch_payload, is_http_url};

/// Re-fetch a single source, reindexing when the payload changed.
pub async fn update_source(alias: &str, quiet: bool) -> Result<()> {
    let storage = Storage::new()?;
    let metadata = storage.load_metadata(alias)?;

    let payload = if is_http_url(&metadata.url) {
        let config = Config::load()?;
        if !config.defaults.fetch_enabled {
            anyhow::bail!("remote fetching is disabled in config (defaults.fetch_enabled)");
        }
        let fetcher = Fetcher::new()?;
        match fetcher
            .fetch_with_cache(
                &metadata.url,
                metadata.etag.as_deref(),
                metadata.last_modified.as_deref(),
            )
            .await?
        {
            FetchResult::NotModified => {
                if !quiet {
                    println!("{} {} is up to date", "=".dimmed(), alias);
                }
                return Ok(());
            },
            FetchResult::Modified {
                content,
                etag,
                last_modified,
                sha256,
            } => (content, etag, last_modified, sha256),
        }
    } else {
        // File-backed source: re-read and compare digests ourselves.
        let refetched = fetch_payload(&metadata.url).await?;
        if refetched.sha256 == metadata.sha256 {
            if !quiet {
                println!("{} {} is up to date", "=".dimmed(), alias);
            }
            return Ok(());
        }
        (
            refetched.content,
            refetched.etag,
            refetched.last_modified,
            refetched.sha256,
        )
    };

    let (content, etag, last_modified, sha256) = payload;
    let index = parse_search_index(&content)?;

    let diagnostics = validate(&index);
    if !is_valid(&diagnostics) {
        anyhow::bail!("refusing to update '{alias}': new index has structural errors");
    }

    storage.save_index_file(alias, &index)?;
    storage.save_metadata(
        alias,
        &Source {
            url: metadata.url,
            etag,
            last_modified,
            fetched_at: Utc::now(),
            sha256,
            record_count: index.len(),
        },
    )?;

    let mut search_index = super::fresh_index(&storage, alias)?;
    search_index.index_records(alias, &index.docs)?;

    if !quiet {
        println!(
            "{} {} ({} records)",
            "✓ Updated".green(),
            alias.green(),
            index.len()
        );
    }
    Ok(())
}

/// Update every cached source, continuing past individual failures.
///
/// Sources fetched within the configured `refresh_hours` window are
/// skipped; `sidx update <alias>` always re-fetches.
pub async fn update_all(quiet: bool) -> Result<()> {
    let storage = Storage::new()?;
    let aliases = storage.list_sources()?;
    if aliases.is_empty() {
        if !quiet {
            println!("No sources cached.");
        }
        return Ok(());
    }

    let config = Config::load()?;
    let max_age = chrono::Duration::hours(i64::from(config.defaults.refresh_hours));

    let mut failures = 0usize;
    for alias in &aliases {
        if let Ok(metadata) = storage.load_metadata(alias) {
            if Utc::now() - metadata.fetched_at < max_age {
                if !quiet {
                    println!("{} {} is fresh, skipping", "=".dimmed(), alias);
                }
                continue;
            }
        }
        if let Err(e) = update_source(alias, quiet).await {
            warn!("failed to update {}: {}", alias, e);
            failures += 1;
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} sources failed to update", aliases.len());
    }
    Ok(())
}
