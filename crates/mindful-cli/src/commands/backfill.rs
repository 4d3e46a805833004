//! Analysis backfill command

use anyhow::{Context, Result};
use mindful_core::{backfill_analysis, AnalysisClient, Analyzer, BackfillStats, Database};

pub async fn cmd_backfill(db: &Database) -> Result<()> {
    let analyzer = AnalysisClient::from_env();
    println!(
        "🧠 Backfilling note analysis with the {} backend...",
        analyzer.name()
    );

    let stats = run_backfill(db, &analyzer).await?;

    if stats.entries_processed == 0 {
        println!("✅ Every note already has an analysis");
        return Ok(());
    }

    println!("   Processed: {}", stats.entries_processed);
    println!("   Analyzed:  {}", stats.entries_analyzed);
    if stats.entries_failed > 0 {
        println!("   ⚠️  Failed:    {}", stats.entries_failed);
    }
    println!("✅ Backfill complete");

    Ok(())
}

/// Backfill with an explicit analyzer
pub async fn run_backfill<A: Analyzer + ?Sized>(
    db: &Database,
    analyzer: &A,
) -> Result<BackfillStats> {
    backfill_analysis(db, analyzer)
        .await
        .context("Failed to backfill analysis")
}
