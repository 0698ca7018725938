//! Shared SQLite handle for the user and note stores
//! Mission: Open once, hand out the connection to async callers without blocking the runtime
//!
//! - WAL mode for concurrent reads during writes
//! - Rows are addressed by server-generated string ids, never by SQLite's rowid
//! - Email uniqueness lives in a UNIQUE index so duplicate signups fail atomically

use anyhow::{Context, Result};
use chrono::Utc;
use parking_lot::Mutex; // Faster than std::sync::Mutex
use rusqlite::{Connection, OpenFlags};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

const SCHEMA_SQL: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    row_id INTEGER PRIMARY KEY,
    user_id TEXT NOT NULL UNIQUE,
    user_name TEXT NOT NULL,
    user_email TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password_hash TEXT NOT NULL,
    create_on INTEGER NOT NULL,
    last_update INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS notes (
    row_id INTEGER PRIMARY KEY,
    note_id TEXT NOT NULL UNIQUE,
    user_id TEXT NOT NULL REFERENCES users(user_id),
    note_title TEXT NOT NULL,
    note_content TEXT NOT NULL,
    color TEXT NOT NULL,
    created_by TEXT NOT NULL,
    updated_by TEXT,
    create_on INTEGER NOT NULL,
    last_update INTEGER NOT NULL
);

-- Every note query is owner-filtered and listed oldest first
CREATE INDEX IF NOT EXISTS idx_notes_owner_created
    ON notes(user_id, create_on, row_id);
"#;

/// Errors surfaced by store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// A UNIQUE constraint rejected the write
    #[error("record already exists")]
    Duplicate,

    #[error("database error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                StoreError::Duplicate
            }
            _ => StoreError::Sqlite(err),
        }
    }
}

/// Process-wide database handle. Cloning shares the same connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database file and apply the schema
    pub fn open(db_path: &str) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX; // We handle our own locking

        let conn = Connection::open_with_flags(db_path, flags)
            .with_context(|| format!("Failed to open database at {}", db_path))?;

        let db = Self::init(conn)?;

        let journal_mode: String = db
            .conn
            .lock()
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap_or_default();
        if journal_mode.to_lowercase() != "wal" {
            warn!("WAL mode not active, journal_mode = {}", journal_mode);
        }

        info!("📒 Notes database initialized at: {}", db_path);
        Ok(db)
    }

    /// Private in-memory database, used by tests and throwaway servers
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to initialize database schema")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    ///
    /// The lock is held for the whole closure, so each call is serialized
    /// against every other store operation.
    pub async fn call<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock();
            f(&mut guard)
        })
        .await?
    }
}

/// Wall-clock timestamp stored in `create_on` / `last_update`
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
