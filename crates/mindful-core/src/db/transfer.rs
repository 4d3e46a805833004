//! Bulk import of an export bundle

use rusqlite::params;
use tracing::info;

use super::{to_json_text, Database};
use crate::error::Result;
use crate::export::{ExportBundle, ImportStats};

impl Database {
    /// Insert every row of a bundle, skipping ids that already exist
    ///
    /// All rows are written in one transaction: if any insert fails nothing
    /// from the bundle is kept. Rows are re-owned by `user_id` regardless of
    /// the `user_id` recorded in the bundle. Row fields are not validated;
    /// a restore reproduces the exported data as it was.
    pub fn import_bundle(&self, user_id: &str, bundle: &ExportBundle) -> Result<ImportStats> {
        info!(
            user_id,
            moods = bundle.mood_entries.len(),
            cbt_logs = bundle.cbt_logs.len(),
            "Importing data bundle"
        );

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut stats = ImportStats::default();

        for mood in &bundle.mood_entries {
            let analysis = mood.ai_analysis.as_ref().map(to_json_text).transpose()?;
            let inserted = tx.execute(
                "INSERT OR IGNORE INTO mood_entries (id, rating, emotions, note, trigger, behavior, timestamp, user_id, ai_analysis)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    mood.id,
                    mood.rating,
                    to_json_text(&mood.emotions)?,
                    mood.note,
                    mood.trigger,
                    mood.behavior,
                    mood.timestamp,
                    user_id,
                    analysis,
                ],
            )?;
            if inserted > 0 {
                stats.moods_imported += 1;
            } else {
                stats.moods_skipped += 1;
            }
        }

        for log in &bundle.cbt_logs {
            let inserted = tx.execute(
                "INSERT OR IGNORE INTO cbt_logs (
                    id, timestamp, situation, automatic_thoughts, distortions,
                    rational_response, mood_before, mood_after, behavioral_link, user_id
                 ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    log.id,
                    log.timestamp,
                    log.situation,
                    log.automatic_thoughts,
                    to_json_text(&log.distortions)?,
                    log.rational_response,
                    log.mood_before,
                    log.mood_after,
                    log.behavioral_link,
                    user_id,
                ],
            )?;
            if inserted > 0 {
                stats.cbt_logs_imported += 1;
            } else {
                stats.cbt_logs_skipped += 1;
            }
        }

        tx.commit()?;

        info!(
            moods_imported = stats.moods_imported,
            moods_skipped = stats.moods_skipped,
            cbt_logs_imported = stats.cbt_logs_imported,
            cbt_logs_skipped = stats.cbt_logs_skipped,
            "Data import complete"
        );
        Ok(stats)
    }
}
