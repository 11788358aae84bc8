// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory usage store, activity log and selector state, plus a store that
//! always fails.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Mutex;

use quizforge_core::{
    ActivityLog, AdapterType, HealthStatus, PluginAdapter, QuizforgeError, SelectorSnapshot,
    SelectorStateStore, UsageOutcome, UsageRecord, UsageStatus, UsageStore,
};

fn storage_error(message: &str) -> QuizforgeError {
    QuizforgeError::Storage {
        source: message.to_string().into(),
    }
}

/// Usage store backed by a map keyed on (model, date).
#[derive(Clone, Default)]
pub struct MemoryUsageStore {
    records: Arc<Mutex<BTreeMap<(String, NaiveDate), UsageRecord>>>,
}

impl MemoryUsageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The record for `model` on `date`, if any outcome was written.
    pub async fn record(&self, model: &str, date: NaiveDate) -> Option<UsageRecord> {
        self.records
            .lock()
            .await
            .get(&(model.to_string(), date))
            .cloned()
    }

    /// Sum of successes for `model` across all days.
    pub async fn successes(&self, model: &str) -> u32 {
        self.sum(model, |r| r.success_count).await
    }

    /// Sum of failures for `model` across all days.
    pub async fn failures(&self, model: &str) -> u32 {
        self.sum(model, |r| r.failure_count).await
    }

    async fn sum(&self, model: &str, field: impl Fn(&UsageRecord) -> u32) -> u32 {
        self.records
            .lock()
            .await
            .values()
            .filter(|r| r.model_name == model)
            .map(field)
            .sum()
    }
}

#[async_trait]
impl PluginAdapter for MemoryUsageStore {
    fn name(&self) -> &str {
        "memory-usage"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, QuizforgeError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl UsageStore for MemoryUsageStore {
    async fn upsert_usage(
        &self,
        model: &str,
        date: NaiveDate,
        outcome: UsageOutcome,
    ) -> Result<(), QuizforgeError> {
        let mut records = self.records.lock().await;
        let record = records
            .entry((model.to_string(), date))
            .or_insert_with(|| UsageRecord {
                model_name: model.to_string(),
                date,
                success_count: 0,
                failure_count: 0,
                last_failure_at: None,
                status: UsageStatus::Active,
            });
        match outcome {
            UsageOutcome::Success => {
                record.success_count += 1;
                record.status = UsageStatus::Active;
            }
            UsageOutcome::Failure { at } => {
                record.failure_count += 1;
                record.last_failure_at = Some(at);
                record.status = UsageStatus::Degraded;
            }
        }
        Ok(())
    }

    async fn usage_for_date(&self, date: NaiveDate) -> Result<Vec<UsageRecord>, QuizforgeError> {
        Ok(self
            .records
            .lock()
            .await
            .values()
            .filter(|r| r.date == date)
            .cloned()
            .collect())
    }
}

/// Selector state kept in memory, shared between clones.
#[derive(Clone, Default)]
pub struct MemorySelectorState {
    cursor: Arc<Mutex<u64>>,
    cooldowns: Arc<Mutex<BTreeMap<String, DateTime<Utc>>>>,
}

impl MemorySelectorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored cursor.
    pub async fn stored_cursor(&self) -> u64 {
        *self.cursor.lock().await
    }

    /// The stored expiry for `backend`, expired or not.
    pub async fn stored_cooldown(&self, backend: &str) -> Option<DateTime<Utc>> {
        self.cooldowns.lock().await.get(backend).copied()
    }
}

#[async_trait]
impl PluginAdapter for MemorySelectorState {
    fn name(&self) -> &str {
        "memory-selector-state"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, QuizforgeError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl SelectorStateStore for MemorySelectorState {
    async fn load_selector_state(
        &self,
        now: DateTime<Utc>,
    ) -> Result<SelectorSnapshot, QuizforgeError> {
        let cooldowns = self
            .cooldowns
            .lock()
            .await
            .iter()
            .filter(|(_, expires)| **expires > now)
            .map(|(backend, expires)| (backend.clone(), *expires))
            .collect();
        Ok(SelectorSnapshot {
            cursor: self.stored_cursor().await,
            cooldowns,
        })
    }

    async fn save_cursor(&self, cursor: u64) -> Result<(), QuizforgeError> {
        let mut stored = self.cursor.lock().await;
        *stored = (*stored).max(cursor);
        Ok(())
    }

    async fn save_cooldown(
        &self,
        backend: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), QuizforgeError> {
        self.cooldowns
            .lock()
            .await
            .insert(backend.to_string(), expires_at);
        Ok(())
    }
}

/// Usage store whose every call fails with a storage error.
#[derive(Clone, Copy, Default)]
pub struct FailingUsageStore;

#[async_trait]
impl PluginAdapter for FailingUsageStore {
    fn name(&self) -> &str {
        "failing-usage"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, QuizforgeError> {
        Ok(HealthStatus::Unhealthy("always fails".into()))
    }
}

#[async_trait]
impl UsageStore for FailingUsageStore {
    async fn upsert_usage(
        &self,
        _model: &str,
        _date: NaiveDate,
        _outcome: UsageOutcome,
    ) -> Result<(), QuizforgeError> {
        Err(storage_error("database is locked"))
    }

    async fn usage_for_date(&self, _date: NaiveDate) -> Result<Vec<UsageRecord>, QuizforgeError> {
        Err(storage_error("database is locked"))
    }
}

#[async_trait]
impl SelectorStateStore for FailingUsageStore {
    async fn load_selector_state(
        &self,
        _now: DateTime<Utc>,
    ) -> Result<SelectorSnapshot, QuizforgeError> {
        Err(storage_error("database is locked"))
    }

    async fn save_cursor(&self, _cursor: u64) -> Result<(), QuizforgeError> {
        Err(storage_error("database is locked"))
    }

    async fn save_cooldown(
        &self,
        _backend: &str,
        _expires_at: DateTime<Utc>,
    ) -> Result<(), QuizforgeError> {
        Err(storage_error("database is locked"))
    }
}

/// One row of the in-memory activity log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub user_id: String,
    pub action_type: String,
    pub description: String,
    pub at: DateTime<Utc>,
}

/// Activity log kept in a vector. Can be switched to reject writes.
#[derive(Clone, Default)]
pub struct MemoryActivityLog {
    entries: Arc<Mutex<Vec<ActivityEntry>>>,
    reject_writes: Arc<AtomicBool>,
}

impl MemoryActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry with an explicit timestamp.
    pub async fn push_at(&self, user_id: &str, action_type: &str, at: DateTime<Utc>) {
        self.entries.lock().await.push(ActivityEntry {
            user_id: user_id.to_string(),
            action_type: action_type.to_string(),
            description: String::new(),
            at,
        });
    }

    /// Append `count` entries for `user_id` stamped now.
    pub async fn seed(&self, user_id: &str, action_type: &str, count: u32) {
        for _ in 0..count {
            self.push_at(user_id, action_type, Utc::now()).await;
        }
    }

    /// Make subsequent `record_activity` calls fail.
    pub fn reject_writes(&self) {
        self.reject_writes.store(true, Ordering::SeqCst);
    }

    pub async fn entries(&self) -> Vec<ActivityEntry> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for MemoryActivityLog {
    fn name(&self) -> &str {
        "memory-activity"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::ActivityLog
    }

    async fn health_check(&self) -> Result<HealthStatus, QuizforgeError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ActivityLog for MemoryActivityLog {
    async fn record_activity(
        &self,
        user_id: &str,
        action_type: &str,
        description: &str,
    ) -> Result<(), QuizforgeError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(storage_error("activity log is read-only"));
        }
        self.entries.lock().await.push(ActivityEntry {
            user_id: user_id.to_string(),
            action_type: action_type.to_string(),
            description: description.to_string(),
            at: Utc::now(),
        });
        Ok(())
    }

    async fn count_since(
        &self,
        user_id: &str,
        action_type: &str,
        since: DateTime<Utc>,
    ) -> Result<u32, QuizforgeError> {
        let count = self
            .entries
            .lock()
            .await
            .iter()
            .filter(|e| e.user_id == user_id && e.action_type == action_type && e.at >= since)
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}
