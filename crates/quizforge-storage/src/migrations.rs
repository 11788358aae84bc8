// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations.
//!
//! SQL files under `migrations/` are compiled in with `embed_migrations!` and
//! applied every time a [`crate::Database`] is opened.

use quizforge_core::QuizforgeError;
use tracing::info;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Apply pending migrations. Applied versions live in `refinery_schema_history`.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), QuizforgeError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(|e| QuizforgeError::Storage {
            source: Box::new(e),
        })?;

    let applied = report.applied_migrations();
    if !applied.is_empty() {
        info!(count = applied.len(), "applied schema migrations");
    }
    Ok(())
}
