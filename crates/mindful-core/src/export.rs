//! Export and import of a user's journal
//!
//! Supports:
//! - JSON export (`{"moodEntries": [...], "cbtLogs": [...]}`), which round-trips through import
//! - CSV export with one section per entity
//! - Markdown export for reading
//! - JSON import that skips ids already present

use std::fmt::Write as _;
use std::str::FromStr;

use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{CbtLog, MoodEntry};

/// Base name of every export download
pub const EXPORT_FILE_STEM: &str = "mindfultrack_export";

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Markdown => "md",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Markdown => "text/markdown",
        }
    }

    /// Download file name, e.g. `mindfultrack_export.csv`
    pub fn filename(&self) -> String {
        format!("{}.{}", EXPORT_FILE_STEM, self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            _ => Err(Error::InvalidData("Unsupported format".to_string())),
        }
    }
}

/// Everything a user has logged, in the JSON export layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    #[serde(rename = "moodEntries", default)]
    pub mood_entries: Vec<MoodEntry>,
    #[serde(rename = "cbtLogs", default)]
    pub cbt_logs: Vec<CbtLog>,
}

/// Import request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    pub format: String,
    /// The JSON export document, as a string
    pub content: String,
}

/// Rows inserted and skipped (id already present) per entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStats {
    pub moods_imported: usize,
    pub moods_skipped: usize,
    pub cbt_logs_imported: usize,
    pub cbt_logs_skipped: usize,
}

/// A rendered export, ready to be sent as a download or written to disk
#[derive(Debug, Clone)]
pub struct RenderedExport {
    pub content_type: &'static str,
    pub filename: String,
    pub body: String,
}

impl ExportBundle {
    pub fn render(&self, format: ExportFormat) -> Result<RenderedExport> {
        let body = match format {
            ExportFormat::Json => self.to_json()?,
            ExportFormat::Csv => self.to_csv()?,
            ExportFormat::Markdown => self.to_markdown(),
        };

        Ok(RenderedExport {
            content_type: format.content_type(),
            filename: format.filename(),
            body,
        })
    }

    /// Pretty-printed JSON accepted back by [`Database::import_json`]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// CSV with a mood section followed by a CBT section
    ///
    /// Sections have different widths, so the writer is flexible.
    pub fn to_csv(&self) -> Result<String> {
        let mut wtr = WriterBuilder::new().flexible(true).from_writer(Vec::new());

        wtr.write_record(["--- MOOD ENTRIES ---"])?;
        wtr.write_record([
            "ID",
            "Timestamp",
            "Rating",
            "Emotions",
            "Note",
            "Trigger",
            "Behavior",
        ])?;
        for m in &self.mood_entries {
            wtr.write_record([
                m.id.clone(),
                m.timestamp.to_string(),
                m.rating.to_string(),
                m.emotions.join(", "),
                m.note.clone().unwrap_or_default(),
                m.trigger.clone().unwrap_or_default(),
                m.behavior.clone().unwrap_or_default(),
            ])?;
        }

        wtr.write_record(std::iter::empty::<&str>())?;
        wtr.write_record(["--- CBT LOGS ---"])?;
        wtr.write_record([
            "ID",
            "Timestamp",
            "Situation",
            "Automatic Thoughts",
            "Distortions",
            "Rational Response",
            "Mood Before",
            "Mood After",
            "Behavioral Link",
        ])?;
        for l in &self.cbt_logs {
            wtr.write_record([
                l.id.clone(),
                l.timestamp.to_string(),
                l.situation.clone(),
                l.automatic_thoughts.clone(),
                l.distortions.join(", "),
                l.rational_response.clone(),
                l.mood_before.to_string(),
                l.mood_after.map(|v| v.to_string()).unwrap_or_default(),
                l.behavioral_link.clone().unwrap_or_default(),
            ])?;
        }

        let bytes = wtr.into_inner().map_err(|e| Error::Io(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| Error::InvalidData(e.to_string()))
    }

    /// Human-readable Markdown report
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("# MindfulTrack Export\n\n");

        // Writing to a String cannot fail
        out.push_str("## Mood Entries\n\n");
        for m in &self.mood_entries {
            let _ = writeln!(out, "### {} - Rating: {}", m.timestamp, m.rating);
            let _ = writeln!(out, "**Emotions:** {}\n", m.emotions.join(", "));
            if let Some(note) = non_empty(&m.note) {
                let _ = writeln!(out, "> {}\n", note);
            }
            if let Some(trigger) = non_empty(&m.trigger) {
                let _ = writeln!(out, "*Trigger:* {}", trigger);
            }
            if let Some(behavior) = non_empty(&m.behavior) {
                let _ = writeln!(out, "*Behavior:* {}", behavior);
            }
            out.push_str("\n---\n\n");
        }

        out.push_str("## CBT Logs\n\n");
        for l in &self.cbt_logs {
            let _ = writeln!(out, "### Situation: {}", l.situation);
            let _ = writeln!(out, "**Thoughts:** {}", l.automatic_thoughts);
            let _ = writeln!(out, "**Distortions:** {}", l.distortions.join(", "));
            let _ = writeln!(out, "**Reframed:** {}", l.rational_response);
            out.push_str("\n---\n\n");
        }

        out
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl Database {
    /// Collect all of a user's moods and CBT logs, newest first
    pub fn export_bundle(&self, user_id: &str) -> Result<ExportBundle> {
        Ok(ExportBundle {
            mood_entries: self.list_mood_entries(user_id)?,
            cbt_logs: self.list_cbt_logs(user_id)?,
        })
    }

    /// Render a user's data in the requested format
    pub fn export(&self, user_id: &str, format: ExportFormat) -> Result<RenderedExport> {
        let bundle = self.export_bundle(user_id)?;
        info!(
            user_id,
            format = format.as_str(),
            moods = bundle.mood_entries.len(),
            cbt_logs = bundle.cbt_logs.len(),
            "Exporting data"
        );
        bundle.render(format)
    }

    /// Import a JSON export
    ///
    /// The whole document is parsed before anything is written, and the
    /// rows are inserted in a single transaction.
    pub fn import_json(&self, user_id: &str, request: &ImportRequest) -> Result<ImportStats> {
        if !request.format.trim().eq_ignore_ascii_case("json") {
            return Err(Error::InvalidData(
                "Only JSON import is supported in this version".to_string(),
            ));
        }

        let bundle: ExportBundle = serde_json::from_str(&request.content)?;
        self.import_bundle(user_id, &bundle)
    }
}
