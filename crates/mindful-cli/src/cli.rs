//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// MindfulTrack - Mood journal with CBT logs and note analysis
#[derive(Parser)]
#[command(name = "mindful")]
#[command(about = "Self-hosted mood journal and CBT thought record", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(
        long,
        env = "DATABASE_PATH",
        default_value = "data/mood-tracker.db",
        global = true
    )]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(
        long,
        env = "MINDFUL_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Json,
        global = true
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// How log lines are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One JSON object per line, including the request span
    Json,
    /// Compact human-readable lines
    Pretty,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the REST API server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "MINDFUL_PORT", default_value = "8000")]
        port: u16,

        /// Host to bind to
        #[arg(long, env = "MINDFUL_HOST", default_value = "127.0.0.1")]
        host: String,
    },

    /// Start the standalone note analysis service
    ServeAi {
        /// Port to listen on
        #[arg(short, long, env = "MINDFUL_AI_PORT", default_value = "8001")]
        port: u16,

        /// Host to bind to
        #[arg(long, env = "MINDFUL_HOST", default_value = "127.0.0.1")]
        host: String,
    },

    /// Export all moods and CBT logs
    Export {
        /// Output format: json, csv or md
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Output file (defaults to mindfultrack_export.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import a JSON export
    Import {
        /// JSON file produced by `mindful export`
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Analyze stored notes that have no analysis yet
    Backfill,
}
