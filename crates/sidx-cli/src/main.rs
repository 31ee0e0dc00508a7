//! sidx CLI - local search over documentation search indexes.
//!
//! This is the entry point for the `sidx` command-line interface.
//! Command implementations live in separate modules under `commands`.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod cli;
mod commands;
mod output;
mod utils;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_logging(&cli)?;
    execute_command(cli).await
}

fn initialize_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn execute_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Add { alias, source } => {
            commands::add_source(&alias, &source, cli.quiet).await?;
        },

        Commands::Update { alias, all } => {
            if all || alias.is_none() {
                commands::update_all(cli.quiet).await?;
            } else if let Some(alias) = alias {
                commands::update_source(&alias, cli.quiet).await?;
            }
        },

        Commands::Remove { alias } => {
            commands::remove_source(&alias, cli.quiet)?;
        },

        Commands::List { format } => {
            commands::list_sources(format)?;
        },

        Commands::Search {
            query,
            source,
            category,
            limit,
            format,
        } => {
            commands::search(
                &query,
                source.as_deref(),
                category.as_deref(),
                limit,
                format,
            )?;
        },

        Commands::Validate { target, format } => {
            commands::validate_target(&target, format)?;
        },

        Commands::Build { docs_dir, output } => {
            commands::build_index(&docs_dir, output.as_deref(), cli.quiet)?;
        },
    }

    Ok(())
}
