//! Mood logging with note analysis
//!
//! Ties the repository to an [`Analyzer`]: analysis is computed before the
//! insert and never blocks it.

use serde::Serialize;
use tracing::{info, warn};

use crate::analysis::{analyze_note, Analyzer};
use crate::db::Database;
use crate::error::Result;
use crate::models::{MoodCreate, MoodEntry};

/// Log a mood, enriching it with analysis of its note
///
/// The input is validated first. Analysis runs only for a non-empty note; if
/// the backend fails the entry is stored without analysis.
pub async fn create_mood_entry<A: Analyzer + ?Sized>(
    db: &Database,
    analyzer: &A,
    user_id: &str,
    input: MoodCreate,
) -> Result<MoodEntry> {
    input.validate()?;

    let analysis = analyze_note(analyzer, input.note.as_deref()).await;
    db.create_mood_entry(user_id, &input, analysis.as_ref())?;

    Ok(input.into_entry(user_id, analysis))
}

/// Result of an analysis backfill run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BackfillStats {
    /// Entries with a note and no analysis
    pub entries_processed: usize,
    pub entries_analyzed: usize,
    pub entries_failed: usize,
}

/// Analyze every stored note that has no analysis yet
///
/// Failures are counted and logged per entry; the run always finishes.
pub async fn backfill_analysis<A: Analyzer + ?Sized>(
    db: &Database,
    analyzer: &A,
) -> Result<BackfillStats> {
    let pending = db.mood_entries_missing_analysis()?;
    let mut stats = BackfillStats {
        entries_processed: pending.len(),
        ..Default::default()
    };

    info!(
        pending = pending.len(),
        backend = analyzer.name(),
        "Backfilling mood analysis"
    );

    for (id, note) in &pending {
        match analyzer.analyze(note.trim()).await {
            Ok(analysis) => {
                if db.set_mood_analysis(id, &analysis)? {
                    stats.entries_analyzed += 1;
                }
            }
            Err(e) => {
                warn!(mood_id = %id, error = %e, "Failed to analyze mood note");
                stats.entries_failed += 1;
            }
        }
    }

    info!(
        analyzed = stats.entries_analyzed,
        failed = stats.entries_failed,
        "Backfill complete"
    );
    Ok(stats)
}
