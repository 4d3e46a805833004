//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use mindful_core::{Database, DEFAULT_USER_ID};

/// Open (creating if needed) the database at `db_path`
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .with_context(|| format!("Database path is not valid UTF-8: {}", db_path.display()))?;
    Database::new(path_str).context("Failed to open database")
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;

    let user = db
        .get_user(DEFAULT_USER_ID)?
        .context("Demo user missing after initialization")?;
    println!("   Seeded user: {} <{}>", user.name, user.email);
    println!(
        "   Mood entries: {}, CBT logs: {}",
        db.count_rows("mood_entries")?,
        db.count_rows("cbt_logs")?
    );

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Start the API: mindful serve");
    println!("  2. Optional analysis service: mindful serve-ai");

    Ok(())
}
