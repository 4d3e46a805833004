//! MindfulTrack CLI - Mood journal server and tools
//!
//! Usage:
//!   mindful init                    Initialize database
//!   mindful serve --port 8000       Start the API server
//!   mindful serve-ai --port 8001    Start the note analysis service
//!   mindful export --format csv     Export moods and CBT logs
//!   mindful import --file FILE      Import a JSON export
//!   mindful backfill                Analyze notes stored without analysis

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Exactly one of these is Some
    let (json_layer, pretty_layer) = match cli.log_format {
        LogFormat::Json => (
            Some(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            ),
            None,
        ),
        LogFormat::Pretty => (None, Some(fmt::layer().with_target(false).compact())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(pretty_layer)
        .init();

    run(cli).await
}

/// Dispatch a parsed command line
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Serve { port, host } => commands::cmd_serve(&cli.db, &host, port).await,
        Commands::ServeAi { port, host } => commands::cmd_serve_ai(&host, port).await,
        Commands::Export { format, output } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_export(&db, &format, output.as_deref())?;
            Ok(())
        }
        Commands::Import { file } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_import(&db, &file)?;
            Ok(())
        }
        Commands::Backfill => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_backfill(&db).await
        }
    }
}
