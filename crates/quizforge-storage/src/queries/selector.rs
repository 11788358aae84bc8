// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted selector state (`selector_cursor`, `backend_cooldown`).

use chrono::{DateTime, Utc};
use quizforge_core::{QuizforgeError, SelectorSnapshot};
use rusqlite::params;

use super::{format_timestamp, parse_timestamp};
use crate::database::Database;

/// The stored cursor and the cooldowns that expire after `now`, ordered by model.
pub async fn load_selector_state(
    db: &Database,
    now: DateTime<Utc>,
) -> Result<SelectorSnapshot, QuizforgeError> {
    let now = format_timestamp(now);
    db.connection()
        .call(move |conn| -> Result<SelectorSnapshot, rusqlite::Error> {
            let cursor: i64 =
                conn.query_row("SELECT cursor FROM selector_cursor WHERE id = 1", [], |row| {
                    row.get(0)
                })?;

            let mut stmt = conn.prepare(
                "SELECT model_name, expires_at FROM backend_cooldown
                 WHERE expires_at > ?1 ORDER BY model_name",
            )?;
            let cooldowns = stmt
                .query_map(params![now], |row| {
                    let model: String = row.get(0)?;
                    let expires_at: String = row.get(1)?;
                    Ok((model, parse_timestamp(1, &expires_at)?))
                })?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(SelectorSnapshot {
                cursor: u64::try_from(cursor).unwrap_or_default(),
                cooldowns,
            })
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Raise the stored cursor to `cursor`. A smaller value is ignored, so
/// concurrent writers cannot move the rotation backwards.
pub async fn save_cursor(db: &Database, cursor: u64) -> Result<(), QuizforgeError> {
    let cursor = i64::try_from(cursor).unwrap_or(i64::MAX);
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "UPDATE selector_cursor SET cursor = MAX(cursor, ?1) WHERE id = 1",
                params![cursor],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert or overwrite the cooldown expiry of `model`.
pub async fn save_cooldown(
    db: &Database,
    model: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), QuizforgeError> {
    let model = model.to_string();
    let expires_at = format_timestamp(expires_at);
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO backend_cooldown (model_name, expires_at) VALUES (?1, ?2)
                 ON CONFLICT(model_name) DO UPDATE SET expires_at = excluded.expires_at",
                params![model, expires_at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
