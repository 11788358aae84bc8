// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily per-backend usage counters (`ai_model_usage`).

use chrono::NaiveDate;
use quizforge_core::{QuizforgeError, UsageOutcome, UsageRecord, UsageStatus};
use rusqlite::params;
use rusqlite::types::Type;

use super::{format_date, format_timestamp, parse_date, parse_timestamp};
use crate::database::Database;

const SELECT_COLUMNS: &str =
    "SELECT model_name, date, success_count, failure_count, last_failure_at, status
     FROM ai_model_usage";

/// Create the (model, date) row or add the outcome to its counters.
///
/// Runs as a single `INSERT ... ON CONFLICT DO UPDATE`, so concurrent writers
/// never lose an increment. `last_failure_at` keeps its old value on success.
pub async fn upsert_usage(
    db: &Database,
    model: &str,
    date: NaiveDate,
    outcome: UsageOutcome,
) -> Result<(), QuizforgeError> {
    let model = model.to_string();
    let date = format_date(date);
    let (successes, failures, failed_at, status) = match outcome {
        UsageOutcome::Success => (1_i64, 0_i64, None, UsageStatus::Active),
        UsageOutcome::Failure { at } => (0, 1, Some(format_timestamp(at)), UsageStatus::Degraded),
    };
    let status = status.to_string();

    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO ai_model_usage
                     (model_name, date, success_count, failure_count, last_failure_at, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(model_name, date) DO UPDATE SET
                     success_count = success_count + excluded.success_count,
                     failure_count = failure_count + excluded.failure_count,
                     last_failure_at = COALESCE(excluded.last_failure_at, last_failure_at),
                     status = excluded.status",
                params![model, date, successes, failures, failed_at, status],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Every backend's record for `date`, ordered by model name.
pub async fn usage_for_date(
    db: &Database,
    date: NaiveDate,
) -> Result<Vec<UsageRecord>, QuizforgeError> {
    let date = format_date(date);
    db.connection()
        .call(move |conn| -> Result<Vec<UsageRecord>, rusqlite::Error> {
            let mut stmt =
                conn.prepare(&format!("{SELECT_COLUMNS} WHERE date = ?1 ORDER BY model_name"))?;
            let rows = stmt.query_map(params![date], map_usage_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

fn map_usage_row(row: &rusqlite::Row<'_>) -> Result<UsageRecord, rusqlite::Error> {
    let date: String = row.get(1)?;
    let last_failure_at: Option<String> = row.get(4)?;
    let status: String = row.get(5)?;
    Ok(UsageRecord {
        model_name: row.get(0)?,
        date: parse_date(1, &date)?,
        success_count: row.get(2)?,
        failure_count: row.get(3)?,
        last_failure_at: last_failure_at
            .as_deref()
            .map(|raw| parse_timestamp(4, raw))
            .transpose()?,
        status: status
            .parse()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?,
    })
}
