//! CBT log operations

use rusqlite::{params, OptionalExtension, Row};
use tracing::info;

use super::{from_json_text, is_unique_violation, to_json_text, Database, DeleteOutcome};
use crate::error::{Error, Result};
use crate::models::{CbtLog, CbtLogCreate, CbtLogUpdate};

const CBT_COLUMNS: &str = "id, timestamp, situation, automatic_thoughts, distortions, \
     rational_response, mood_before, mood_after, behavioral_link, user_id";

fn cbt_log_from_row(row: &Row<'_>) -> rusqlite::Result<CbtLog> {
    let distortions: String = row.get(4)?;

    Ok(CbtLog {
        id: row.get(0)?,
        timestamp: row.get(1)?,
        situation: row.get(2)?,
        automatic_thoughts: row.get(3)?,
        distortions: from_json_text(4, &distortions)?,
        rational_response: row.get(5)?,
        mood_before: row.get(6)?,
        mood_after: row.get(7)?,
        behavioral_link: row.get(8)?,
        user_id: row.get(9)?,
    })
}

impl Database {
    /// List a user's CBT logs, newest first
    pub fn list_cbt_logs(&self, user_id: &str) -> Result<Vec<CbtLog>> {
        info!(user_id, "Fetching CBT logs");
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM cbt_logs WHERE user_id = ? ORDER BY timestamp DESC",
            CBT_COLUMNS
        ))?;

        let logs = stmt
            .query_map(params![user_id], cbt_log_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(logs)
    }

    /// Get a single CBT log
    pub fn get_cbt_log(&self, user_id: &str, id: &str) -> Result<Option<CbtLog>> {
        let conn = self.conn()?;
        let found = conn
            .query_row(
                &format!("SELECT {} FROM cbt_logs WHERE id = ? AND user_id = ?", CBT_COLUMNS),
                params![id, user_id],
                cbt_log_from_row,
            )
            .optional()?;
        Ok(found)
    }

    /// Insert a CBT log; `Error::Conflict` if the id is taken
    pub fn create_cbt_log(&self, user_id: &str, log: &CbtLogCreate) -> Result<()> {
        info!(user_id, log_id = %log.id, "Creating CBT log");
        let conn = self.conn()?;

        let result = conn.execute(
            "INSERT INTO cbt_logs (
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
        );

        match result {
            Ok(_) => {
                info!(log_id = %log.id, "CBT log created successfully");
                Ok(())
            }
            Err(e) if is_unique_violation(&e) => Err(Error::Conflict(format!(
                "CBT log {} already exists",
                log.id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace every field of a CBT log
    ///
    /// Returns false when no row matched `id` and `user_id`; nothing is written then.
    pub fn update_cbt_log(&self, user_id: &str, id: &str, log: &CbtLogUpdate) -> Result<bool> {
        info!(user_id, log_id = id, "Updating CBT log");
        let conn = self.conn()?;

        let updated = conn.execute(
            "UPDATE cbt_logs
             SET situation = ?,
                 automatic_thoughts = ?,
                 distortions = ?,
                 rational_response = ?,
                 mood_before = ?,
                 mood_after = ?,
                 behavioral_link = ?,
                 timestamp = ?
             WHERE id = ? AND user_id = ?",
            params![
                log.situation,
                log.automatic_thoughts,
                to_json_text(&log.distortions)?,
                log.rational_response,
                log.mood_before,
                log.mood_after,
                log.behavioral_link,
                log.timestamp,
                id,
                user_id,
            ],
        )?;

        let success = updated > 0;
        info!(log_id = id, success, "CBT log update result");
        Ok(success)
    }

    /// Delete a CBT log; a missing row is not an error
    pub fn delete_cbt_log(&self, user_id: &str, id: &str) -> Result<DeleteOutcome> {
        info!(user_id, log_id = id, "Attempting to delete CBT log");
        let conn = self.conn()?;
        let removed = conn.execute(
            "DELETE FROM cbt_logs WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;

        if removed == 0 {
            info!(
                log_id = id,
                "CBT log not found, considering delete successful (idempotent)"
            );
            return Ok(DeleteOutcome::AlreadyAbsent);
        }

        info!(log_id = id, "CBT log deleted");
        Ok(DeleteOutcome::Deleted)
    }
}
