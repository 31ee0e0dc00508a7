//! Command-line interface definition for `sidx`.
//!
//! The CLI follows a standard command-subcommand pattern built with clap
//! derive macros. Global flags control logging verbosity; most commands
//! accept `--format text|json` so output can feed scripts as well as
//! humans.
//!
//! ```bash
//! # Cache a site's search index and query it
//! sidx add rbm https://docs.example.org/dev/search_index.js
//! sidx search "persistent contrastive divergence" --source rbm
//!
//! # Regenerate an index from a local docs tree
//! sidx build docs/src -o search_index.js
//!
//! # Check a generated artifact
//! sidx validate search_index.js
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output.
    #[default]
    Text,
    /// Machine-readable JSON.
    Json,
}

/// Top-level CLI for the `sidx` command.
#[derive(Parser, Debug)]
#[command(name = "sidx")]
#[command(version)]
#[command(about = "sidx - local search over documentation search indexes", long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors).
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a documentation source from a URL or a local index file.
    Add {
        /// Local alias for the source.
        alias: String,
        /// URL of a `search_index.js`, or a path to one on disk.
        source: String,
    },

    /// Re-fetch sources and reindex the ones that changed.
    Update {
        /// Source to update; all sources when omitted.
        alias: Option<String>,
        /// Update every cached source.
        #[arg(long)]
        all: bool,
    },

    /// Remove a cached source.
    Remove {
        /// Source to remove.
        alias: String,
    },

    /// List cached sources.
    List {
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Search cached sources.
    Search {
        /// Query string.
        query: String,
        /// Restrict to a single source.
        #[arg(short, long)]
        source: Option<String>,
        /// Restrict to a record category (page, section, method, ...).
        #[arg(short, long)]
        category: Option<String>,
        /// Maximum number of hits; config `defaults.max_results` when
        /// omitted.
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Validate a search index file or cached source.
    Validate {
        /// Path to an index file, or the alias of a cached source.
        target: String,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Regenerate a search index from a markdown documentation tree.
    Build {
        /// Directory containing the markdown pages.
        docs_dir: PathBuf,
        /// Output file; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn search_defaults() {
        let cli = Cli::try_parse_from(["sidx", "search", "whitening"]).unwrap();
        match cli.command {
            Commands::Search {
                query,
                source,
                category,
                limit,
                format,
            } => {
                assert_eq!(query, "whitening");
                assert!(source.is_none());
                assert!(category.is_none());
                assert!(limit.is_none());
                assert_eq!(format, OutputFormat::Text);
            },
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn global_flags_parse_anywhere() {
        let cli = Cli::try_parse_from(["sidx", "list", "--format", "json", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::List {
                format: OutputFormat::Json
            }
        ));
    }
}
