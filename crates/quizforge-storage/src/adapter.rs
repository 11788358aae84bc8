// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the usage store, activity log and selector state traits.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use quizforge_config::model::StorageConfig;
use quizforge_core::{
    ActivityLog, AdapterType, HealthStatus, PluginAdapter, QuizforgeError, SelectorSnapshot,
    SelectorStateStore, UsageOutcome, UsageRecord, UsageStore,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage for the usage ledger, the activity log and the
/// selector state.
///
/// One [`Database`] handle serves every trait so every write goes through the
/// same serialized connection.
pub struct SqliteStorage {
    db: Database,
}

impl SqliteStorage {
    /// Open the database described by `config`, running migrations.
    pub async fn open(config: &StorageConfig) -> Result<Self, QuizforgeError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "SQLite storage initialized");
        Ok(Self { db })
    }

    /// Storage over a fresh in-memory database.
    pub async fn in_memory() -> Result<Self, QuizforgeError> {
        Ok(Self {
            db: Database::open_in_memory().await?,
        })
    }

    /// Append an activity with an explicit timestamp (imports, backfills).
    pub async fn record_activity_at(
        &self,
        user_id: &str,
        action_type: &str,
        description: &str,
        at: DateTime<Utc>,
    ) -> Result<(), QuizforgeError> {
        queries::activity::record_activity(&self.db, user_id, action_type, description, at).await
    }

    /// Checkpoint the WAL and release the connection.
    pub async fn close(self) -> Result<(), QuizforgeError> {
        self.db.close().await
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, QuizforgeError> {
        self.db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("SELECT 1", [], |_| Ok(()))
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl UsageStore for SqliteStorage {
    async fn upsert_usage(
        &self,
        model: &str,
        date: NaiveDate,
        outcome: UsageOutcome,
    ) -> Result<(), QuizforgeError> {
        queries::usage::upsert_usage(&self.db, model, date, outcome).await
    }

    async fn usage_for_date(&self, date: NaiveDate) -> Result<Vec<UsageRecord>, QuizforgeError> {
        queries::usage::usage_for_date(&self.db, date).await
    }
}

#[async_trait]
impl ActivityLog for SqliteStorage {
    async fn record_activity(
        &self,
        user_id: &str,
        action_type: &str,
        description: &str,
    ) -> Result<(), QuizforgeError> {
        queries::activity::record_activity(&self.db, user_id, action_type, description, Utc::now())
            .await
    }

    async fn count_since(
        &self,
        user_id: &str,
        action_type: &str,
        since: DateTime<Utc>,
    ) -> Result<u32, QuizforgeError> {
        queries::activity::count_activity_since(&self.db, user_id, action_type, since).await
    }
}

#[async_trait]
impl SelectorStateStore for SqliteStorage {
    async fn load_selector_state(
        &self,
        now: DateTime<Utc>,
    ) -> Result<SelectorSnapshot, QuizforgeError> {
        queries::selector::load_selector_state(&self.db, now).await
    }

    async fn save_cursor(&self, cursor: u64) -> Result<(), QuizforgeError> {
        queries::selector::save_cursor(&self.db, cursor).await
    }

    async fn save_cooldown(
        &self,
        backend: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), QuizforgeError> {
        queries::selector::save_cooldown(&self.db, backend, expires_at).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizforge_core::{AI_GENERATE_ACTION, UsageStatus};
    use tempfile::tempdir;

    fn file_config(dir: &tempfile::TempDir) -> StorageConfig {
        StorageConfig {
            database_path: dir.path().join("test.db").to_str().unwrap().to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn health_check_reports_healthy() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::open(&file_config(&dir)).await.unwrap();
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
        assert_eq!(storage.adapter_type(), AdapterType::Storage);
        storage.close().await.unwrap();
    }

    #[tokio::test]
    async fn usage_survives_reopen() {
        let dir = tempdir().unwrap();
        let config = file_config(&dir);
        let today = Utc::now().date_naive();

        let storage = SqliteStorage::open(&config).await.unwrap();
        storage
            .upsert_usage("m1", today, UsageOutcome::Failure { at: Utc::now() })
            .await
            .unwrap();
        storage.close().await.unwrap();

        let storage = SqliteStorage::open(&config).await.unwrap();
        let records = storage.usage_for_date(today).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, UsageStatus::Degraded);
        assert_eq!(records[0].failure_count, 1);
    }

    #[tokio::test]
    async fn recorded_activity_counts_toward_today() {
        let storage = SqliteStorage::in_memory().await.unwrap();
        let start = Utc::now() - chrono::Duration::minutes(1);

        storage
            .record_activity("u1", AI_GENERATE_ACTION, "Generated quiz: Rust")
            .await
            .unwrap();
        storage
            .record_activity_at(
                "u1",
                AI_GENERATE_ACTION,
                "old",
                start - chrono::Duration::days(1),
            )
            .await
            .unwrap();

        assert_eq!(
            storage.count_since("u1", AI_GENERATE_ACTION, start).await.unwrap(),
            1
        );
    }
}
