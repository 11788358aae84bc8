// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Usage store trait for the per-backend daily ledger.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::QuizforgeError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{UsageOutcome, UsageRecord};

/// Persistence for daily per-backend usage records.
#[async_trait]
pub trait UsageStore: PluginAdapter {
    /// Atomically create-or-increment the record for (`model`, `date`).
    ///
    /// Success bumps `success_count` and sets status `active`; failure bumps
    /// `failure_count`, stamps `last_failure_at` and sets status `degraded`.
    async fn upsert_usage(
        &self,
        model: &str,
        date: NaiveDate,
        outcome: UsageOutcome,
    ) -> Result<(), QuizforgeError>;

    /// All records for `date`, ordered by model name.
    async fn usage_for_date(&self, date: NaiveDate) -> Result<Vec<UsageRecord>, QuizforgeError>;
}
