// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::time::Duration;

use quizforge_core::QuizforgeError;
use tracing::debug;

use crate::migrations;

/// How long a statement waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Timestamp format shared by every TEXT timestamp column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Date format of the `ai_model_usage.date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Convert a tokio-rusqlite error into QuizforgeError::Storage.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> QuizforgeError {
    QuizforgeError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the migrated SQLite database.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database file at `path`, apply PRAGMAs and run migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, QuizforgeError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| QuizforgeError::Storage {
                source: Box::new(e),
            })?;

        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            if wal_mode {
                let mode: String = conn.pragma_update_and_check(
                    None,
                    "journal_mode",
                    "WAL",
                    |row| row.get(0),
                )?;
                debug!(journal_mode = %mode, "journal mode set");
            }
            apply_common_pragmas(conn)
        })
        .await
        .map_err(map_tr_err)?;

        let db = Self { conn };
        db.migrate().await?;
        debug!(path, wal_mode, "database opened");
        Ok(db)
    }

    /// Open a private in-memory database with the full schema (tests, dry runs).
    pub async fn open_in_memory() -> Result<Self, QuizforgeError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| QuizforgeError::Storage {
                source: Box::new(e),
            })?;

        conn.call(|conn| -> Result<(), rusqlite::Error> { apply_common_pragmas(conn) })
            .await
            .map_err(map_tr_err)?;

        let db = Self { conn };
        db.migrate().await?;
        Ok(db)
    }

    /// The single writer connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL so the main database file is self-contained, then drop.
    pub async fn close(self) -> Result<(), QuizforgeError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    async fn migrate(&self) -> Result<(), QuizforgeError> {
        self.conn
            .call(|conn| -> Result<(), QuizforgeError> { migrations::run_migrations(conn) })
            .await
            .map_err(|e| QuizforgeError::Storage {
                source: Box::new(e),
            })
    }
}

fn apply_common_pragmas(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(())
}
