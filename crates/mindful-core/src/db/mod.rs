//! Database access layer with connection pooling and schema setup
//!
//! This module is organized by entity:
//! - `moods` - Mood entry operations
//! - `cbt_logs` - CBT log operations
//! - `users` - Profile of the single seeded user
//! - `transfer` - Bulk import used by JSON restore

use std::path::Path;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use serde::{de::DeserializeOwned, Serialize};
use tracing::info;

use crate::error::Result;

mod cbt_logs;
mod moods;
mod transfer;
mod users;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Id of the demo user seeded at initialization
///
/// Every request runs as this user until real authentication exists.
pub const DEFAULT_USER_ID: &str = "1";

/// Result of an idempotent delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// A row was removed
    Deleted,
    /// Nothing matched; treated as success by callers
    AlreadyAbsent,
}

/// Serialize a list-valued field for a TEXT column
pub(crate) fn to_json_text<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Deserialize a TEXT column written by [`to_json_text`]
///
/// Used inside `query_map` closures, so failures surface as rusqlite conversion errors.
pub(crate) fn from_json_text<T: DeserializeOwned>(
    idx: usize,
    text: &str,
) -> rusqlite::Result<T> {
    serde_json::from_str(text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Open (or create) the database file and make sure the schema exists
    ///
    /// Missing parent directories are created. Safe to call on every startup.
    pub fn new(path: &str) -> Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create an isolated throwaway database (for testing)
    ///
    /// Uses a temporary file rather than `:memory:` because each pooled
    /// connection to `:memory:` would see its own empty database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "mindful_test_{}_{}.db",
            std::process::id(),
            id
        ));

        // Remove leftovers from an earlier run
        let _ = std::fs::remove_file(&path);

        Self::new(&path.to_string_lossy())
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Create tables and seed the demo user
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block the writer
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT,
                email TEXT UNIQUE,
                image TEXT
            );

            -- emotions and ai_analysis hold JSON text
            CREATE TABLE IF NOT EXISTS mood_entries (
                id TEXT PRIMARY KEY,
                rating INTEGER NOT NULL,
                emotions TEXT NOT NULL,
                note TEXT,
                timestamp INTEGER NOT NULL,
                trigger TEXT,
                behavior TEXT,
                user_id TEXT NOT NULL DEFAULT '1',
                ai_analysis TEXT,
                FOREIGN KEY (user_id) REFERENCES users(id)
            );

            -- distortions holds JSON text
            CREATE TABLE IF NOT EXISTS cbt_logs (
                id TEXT PRIMARY KEY,
                timestamp INTEGER NOT NULL,
                situation TEXT NOT NULL,
                automatic_thoughts TEXT NOT NULL,
                distortions TEXT NOT NULL,
                rational_response TEXT NOT NULL,
                mood_before INTEGER NOT NULL,
                mood_after INTEGER,
                behavioral_link TEXT,
                user_id TEXT NOT NULL DEFAULT '1',
                FOREIGN KEY (user_id) REFERENCES users(id)
            );

            INSERT OR IGNORE INTO users (id, name, email) VALUES ('1', 'Demo User', 'demo@example.com');
            "#,
        )?;

        info!(path = %self.db_path, "Database schema ready");
        Ok(())
    }

    /// Count rows in a table (used by `mindful init` output and tests)
    pub fn count_rows(&self, table: &str) -> Result<i64> {
        let table = match table {
            "users" | "mood_entries" | "cbt_logs" => table,
            other => {
                return Err(crate::error::Error::InvalidData(format!(
                    "Unknown table: {}",
                    other
                )))
            }
        };
        let conn = self.conn()?;
        let count = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })?;
        Ok(count)
    }
}

/// True when a rusqlite error is a PRIMARY KEY / UNIQUE violation
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
                && (e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                    || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE)
    )
}
