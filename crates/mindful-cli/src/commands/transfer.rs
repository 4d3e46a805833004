//! Export and import commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mindful_core::{Database, ExportFormat, ImportRequest, ImportStats, DEFAULT_USER_ID};

/// Export to a file, returning the path written
pub fn cmd_export(db: &Database, format: &str, output: Option<&Path>) -> Result<PathBuf> {
    let format: ExportFormat = format
        .parse()
        .map_err(|_| anyhow::anyhow!("Unsupported format: {} (use json, csv or md)", format))?;

    let rendered = db
        .export(DEFAULT_USER_ID, format)
        .context("Failed to export data")?;

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&rendered.filename));

    std::fs::write(&path, &rendered.body)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("📤 Exported {} to {}", format.as_str(), path.display());
    Ok(path)
}

/// Import a JSON export file
pub fn cmd_import(db: &Database, file: &Path) -> Result<ImportStats> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    println!("📥 Importing {}...", file.display());

    let stats = db
        .import_json(
            DEFAULT_USER_ID,
            &ImportRequest {
                format: "json".to_string(),
                content,
            },
        )
        .context("Import failed, nothing was written")?;

    println!(
        "   Moods: {} imported, {} already present",
        stats.moods_imported, stats.moods_skipped
    );
    println!(
        "   CBT logs: {} imported, {} already present",
        stats.cbt_logs_imported, stats.cbt_logs_skipped
    );
    println!("✅ {}", serde_json::to_string(&stats)?);

    Ok(stats)
}
