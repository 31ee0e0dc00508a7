//! Rendering command results as text or JSON.

use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use sidx_core::{Diagnostic, DiagnosticSeverity, SearchHit};

use crate::cli::OutputFormat;

/// One row of `sidx list` output.
#[derive(Debug, Serialize)]
pub struct SourceSummary {
    /// Source alias.
    pub alias: String,
    /// URL or file path the index came from.
    pub url: String,
    /// When the index was last fetched.
    pub fetched_at: DateTime<Utc>,
    /// Number of cached records.
    pub records: usize,
}

/// Print search hits in the requested format.
pub fn print_hits(hits: &[SearchHit], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(hits)?);
        },
        OutputFormat::Text => {
            if hits.is_empty() {
                println!("No results.");
                return Ok(());
            }
            for hit in hits {
                let heading = if hit.title.is_empty() || hit.title == hit.page {
                    hit.page.clone()
                } else {
                    format!("{} > {}", hit.page, hit.title)
                };
                println!(
                    "{} {} {}",
                    heading.bold(),
                    format!("[{}]", hit.category).yellow(),
                    format!("({:.2})", hit.score).dimmed(),
                );
                println!("  {}", hit.location.cyan());
                if !hit.snippet.is_empty() {
                    println!("  {}", hit.snippet.replace('\n', " "));
                }
                println!();
            }
        },
    }
    Ok(())
}

/// Print validation diagnostics in the requested format.
pub fn print_diagnostics(diagnostics: &[Diagnostic], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(diagnostics)?);
        },
        OutputFormat::Text => {
            for diagnostic in diagnostics {
                let severity = match diagnostic.severity {
                    DiagnosticSeverity::Error => "error".red().bold(),
                    DiagnosticSeverity::Warn => "warn".yellow(),
                    DiagnosticSeverity::Info => "info".dimmed(),
                };
                match diagnostic.record {
                    Some(record) => {
                        println!("{severity}: record {record}: {}", diagnostic.message);
                    },
                    None => println!("{severity}: {}", diagnostic.message),
                }
            }
        },
    }
    Ok(())
}

/// Print the cached source listing in the requested format.
pub fn print_sources(sources: &[SourceSummary], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(sources)?);
        },
        OutputFormat::Text => {
            if sources.is_empty() {
                println!("No sources cached. Use 'sidx add <alias> <url>' to add one.");
                return Ok(());
            }
            for source in sources {
                println!(
                    "{} {} records, fetched {}",
                    format!("{:<20}", source.alias).bold(),
                    source.records,
                    source.fetched_at.format("%Y-%m-%d %H:%M UTC"),
                );
                println!("  {}", source.url.dimmed());
            }
        },
    }
    Ok(())
}
