//! Mood entry operations

use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

use super::{from_json_text, is_unique_violation, to_json_text, Database, DeleteOutcome};
use crate::error::{Error, Result};
use crate::models::{AnalysisResult, MoodCreate, MoodEntry};

const MOOD_COLUMNS: &str =
    "id, rating, emotions, note, trigger, behavior, timestamp, user_id, ai_analysis";

fn mood_from_row(row: &Row<'_>) -> rusqlite::Result<MoodEntry> {
    let emotions: String = row.get(2)?;
    let analysis: Option<String> = row.get(8)?;

    Ok(MoodEntry {
        id: row.get(0)?,
        rating: row.get(1)?,
        emotions: from_json_text(2, &emotions)?,
        note: row.get(3)?,
        trigger: row.get(4)?,
        behavior: row.get(5)?,
        timestamp: row.get(6)?,
        user_id: row.get(7)?,
        ai_analysis: analysis
            .as_deref()
            .map(|a| from_json_text(8, a))
            .transpose()?,
    })
}

impl Database {
    /// List a user's mood entries, newest first
    pub fn list_mood_entries(&self, user_id: &str) -> Result<Vec<MoodEntry>> {
        info!(user_id, "Fetching mood entries");
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM mood_entries WHERE user_id = ? ORDER BY timestamp DESC",
            MOOD_COLUMNS
        ))?;

        let entries = stmt
            .query_map(params![user_id], mood_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Get a single mood entry
    pub fn get_mood_entry(&self, user_id: &str, id: &str) -> Result<Option<MoodEntry>> {
        let conn = self.conn()?;
        let found = conn
            .query_row(
                &format!("SELECT {} FROM mood_entries WHERE id = ? AND user_id = ?", MOOD_COLUMNS),
                params![id, user_id],
                mood_from_row,
            )
            .optional()?;
        Ok(found)
    }

    /// Insert a mood entry with its (already computed) analysis
    ///
    /// Returns `Error::Conflict` if the id is taken.
    pub fn create_mood_entry(
        &self,
        user_id: &str,
        mood: &MoodCreate,
        ai_analysis: Option<&AnalysisResult>,
    ) -> Result<()> {
        info!(user_id, mood_id = %mood.id, "Creating mood entry");
        let conn = self.conn()?;

        let analysis_json = ai_analysis.map(to_json_text).transpose()?;
        let result = conn.execute(
            "INSERT INTO mood_entries (id, rating, emotions, note, trigger, behavior, timestamp, user_id, ai_analysis)
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
                analysis_json,
            ],
        );

        match result {
            Ok(_) => {
                info!(mood_id = %mood.id, "Mood entry created successfully");
                Ok(())
            }
            Err(e) if is_unique_violation(&e) => Err(Error::Conflict(format!(
                "Mood entry {} already exists",
                mood.id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a mood entry; a missing row is not an error
    pub fn delete_mood_entry(&self, user_id: &str, id: &str) -> Result<DeleteOutcome> {
        info!(user_id, mood_id = id, "Attempting to delete mood entry");
        let conn = self.conn()?;
        let removed = conn.execute(
            "DELETE FROM mood_entries WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;

        if removed == 0 {
            info!(
                mood_id = id,
                "Mood entry not found, considering delete successful (idempotent)"
            );
            return Ok(DeleteOutcome::AlreadyAbsent);
        }

        info!(mood_id = id, "Mood entry deleted");
        Ok(DeleteOutcome::Deleted)
    }

    /// Entries with a non-empty note but no stored analysis, as (id, note)
    pub fn mood_entries_missing_analysis(&self) -> Result<Vec<(String, String)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, note FROM mood_entries
             WHERE ai_analysis IS NULL AND note IS NOT NULL AND TRIM(note) != ''
             ORDER BY timestamp",
        )?;

        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Store analysis for an entry that has none
    ///
    /// Analysis is frozen once written, so an entry that already has one is left
    /// alone. Returns whether a row was updated.
    pub fn set_mood_analysis(&self, id: &str, analysis: &AnalysisResult) -> Result<bool> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE mood_entries SET ai_analysis = ? WHERE id = ? AND ai_analysis IS NULL",
            params![to_json_text(analysis)?, id],
        )?;
        Ok(updated > 0)
    }
}
