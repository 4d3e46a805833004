//! MindfulTrack Core Library
//!
//! Shared functionality for the MindfulTrack mood journal:
//! - Database access, schema setup and the seeded demo user
//! - Mood entry, CBT log and user profile repositories
//! - Pluggable note analysis (embedded lexicon, remote service, mock)
//! - Export renderers (JSON, CSV, Markdown) and JSON import

pub mod analysis;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod mood;

pub use analysis::{
    analyze_note, AnalysisClient, Analyzer, LexiconAnalyzer, MockAnalyzer, RemoteAnalyzer,
};
pub use db::{Database, DeleteOutcome, DEFAULT_USER_ID};
pub use error::{Error, Result};
pub use export::{ExportBundle, ExportFormat, ImportRequest, ImportStats, RenderedExport};
pub use models::{
    AnalysisResult, CbtLog, CbtLogCreate, CbtLogUpdate, MoodCreate, MoodEntry, User,
    UserUpdate,
};
pub use mood::{backfill_analysis, create_mood_entry, BackfillStats};
