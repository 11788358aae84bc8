// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only user activity log (`activity_log`).

use chrono::{DateTime, Utc};
use quizforge_core::QuizforgeError;
use rusqlite::params;

use super::format_timestamp;
use crate::database::Database;

/// Append one activity row stamped `at`.
pub async fn record_activity(
    db: &Database,
    user_id: &str,
    action_type: &str,
    description: &str,
    at: DateTime<Utc>,
) -> Result<(), QuizforgeError> {
    let user_id = user_id.to_string();
    let action_type = action_type.to_string();
    let description = description.to_string();
    let created_at = format_timestamp(at);
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO activity_log (user_id, action_type, description, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![user_id, action_type, description, created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Number of `action_type` rows for `user_id` created at or after `since`.
///
/// Timestamps are fixed-width UTC strings, so lexical comparison is chronological.
pub async fn count_activity_since(
    db: &Database,
    user_id: &str,
    action_type: &str,
    since: DateTime<Utc>,
) -> Result<u32, QuizforgeError> {
    let user_id = user_id.to_string();
    let action_type = action_type.to_string();
    let since = format_timestamp(since);
    db.connection()
        .call(move |conn| -> Result<u32, rusqlite::Error> {
            conn.query_row(
                "SELECT COUNT(*) FROM activity_log
                 WHERE user_id = ?1 AND action_type = ?2 AND created_at >= ?3",
                params![user_id, action_type, since],
                |row| row.get::<_, u32>(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}
