//! Add command implementation.

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use sidx_core::{
    Config, Fetcher, Source, Storage, is_valid, parse_search_index, validate, validate_alias,
};
use url::Url;

use crate::cli::OutputFormat;
use crate::output::print_diagnostics;
use crate::utils::{normalize_alias, sha256_digest};

/// Add a documentation source from a URL or a local `search_index.js`.
pub async fn add_source(alias: &str, source: &str, quiet: bool) -> Result<()> {
    let normalized = normalize_alias(alias);
    if normalized != alias && !quiet {
        println!("Normalizing alias: '{}' -> '{}'", alias, normalized.green());
    }
    validate_alias(&normalized)?;

    let storage = Storage::new()?;
    if storage.exists(&normalized) {
        anyhow::bail!(
            "source '{normalized}' already exists; use 'sidx update {normalized}' or choose a different alias"
        );
    }

    let fetched = fetch_payload(source).await?;
    let index = parse_search_index(&fetched.content)?;

    let diagnostics = validate(&index);
    if !quiet || !is_valid(&diagnostics) {
        print_diagnostics(&diagnostics, OutputFormat::Text)?;
    }
    if !is_valid(&diagnostics) {
        anyhow::bail!("refusing to cache '{source}': index has structural errors");
    }

    storage.save_index_file(&normalized, &index)?;
    storage.save_metadata(
        &normalized,
        &Source {
            url: source.to_string(),
            etag: fetched.etag,
            last_modified: fetched.last_modified,
            fetched_at: Utc::now(),
            sha256: fetched.sha256,
            record_count: index.len(),
        },
    )?;

    let mut search_index = super::fresh_index(&storage, &normalized)?;
    search_index.index_records(&normalized, &index.docs)?;

    if !quiet {
        println!(
            "{} {} ({} records)",
            "✓ Added".green(),
            normalized.green(),
            index.len()
        );
    }
    Ok(())
}

pub(crate) struct Payload {
    pub content: String,
    pub etag: Option<String>,
    pub last_modified: Option<String>,
    pub sha256: String,
}

/// Download a remote index, or read a local file for non-HTTP sources.
pub(crate) async fn fetch_payload(source: &str) -> Result<Payload> {
    if is_http_url(source) {
        let config = Config::load()?;
        if !config.defaults.fetch_enabled {
            anyhow::bail!("remote fetching is disabled in config (defaults.fetch_enabled)");
        }
        let fetcher = Fetcher::new()?;
        match fetcher.fetch_with_cache(source, None, None).await? {
            sidx_core::FetchResult::Modified {
                content,
                etag,
                last_modified,
                sha256,
            } => Ok(Payload {
                content,
                etag,
                last_modified,
                sha256,
            }),
            sidx_core::FetchResult::NotModified => {
                anyhow::bail!("server returned 304 for an unconditional fetch of '{source}'")
            },
        }
    } else {
        let content = std::fs::read_to_string(source)
            .map_err(|e| anyhow::anyhow!("failed to read '{source}': {e}"))?;
        let sha256 = sha256_digest(&content);
        Ok(Payload {
            content,
            etag: None,
            last_modified: None,
            sha256,
        })
    }
}

pub(crate) fn is_http_url(source: &str) -> bool {
    Url::parse(source)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}
