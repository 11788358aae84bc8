// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Usage ledger: durable per-backend daily outcome counters.
//!
//! Every backend call made by the engine ends in exactly one
//! [`UsageLedger::record_outcome`]. Writes are best-effort: a failed write is
//! logged and dropped so bookkeeping can never fail a generation.
//!
//! With a [`SelectorStateStore`] attached, the ledger also persists the
//! selector's rotation cursor and cooldown expiries, so that rotation and
//! cooldowns carry over between short-lived processes.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate, TimeDelta, Utc};
use quizforge_core::{
    CooldownEntry, QuizforgeError, SelectorStateStore, UsageOutcome, UsageRecord, UsageStore,
};
use quizforge_resilience::ModelSelector;
use tracing::{debug, warn};

/// Ledger over a [`UsageStore`], plus read access to the selector's cooldowns.
#[derive(Clone)]
pub struct UsageLedger {
    store: Arc<dyn UsageStore>,
    selector: Arc<ModelSelector>,
    state: Option<Arc<dyn SelectorStateStore>>,
}

impl UsageLedger {
    pub fn new(store: Arc<dyn UsageStore>, selector: Arc<ModelSelector>) -> Self {
        Self {
            store,
            selector,
            state: None,
        }
    }

    /// Persist selector picks and cooldowns to `state`.
    pub fn with_state_store(mut self, state: Arc<dyn SelectorStateStore>) -> Self {
        self.state = Some(state);
        self
    }

    /// Load persisted rotation and live cooldowns into the selector.
    ///
    /// No-op without a state store.
    pub async fn restore_selector(&self) -> Result<(), QuizforgeError> {
        let Some(state) = &self.state else {
            return Ok(());
        };
        let now = Utc::now();
        let snapshot = state.load_selector_state(now).await?;
        let cooldowns = snapshot.cooldowns.into_iter().filter_map(|(backend, expires_at)| {
            (expires_at - now)
                .to_std()
                .ok()
                .map(|remaining| (backend, remaining))
        });
        self.selector.restore(snapshot.cursor, cooldowns);
        Ok(())
    }

    /// Next backend in rotation. The advanced cursor is persisted best-effort.
    pub async fn next_backend(&self, ids: &[String]) -> Option<String> {
        let picked = self.selector.next(ids)?;
        if let Some(state) = &self.state
            && let Err(e) = state.save_cursor(self.selector.cursor()).await
        {
            warn!(error = %e, "failed to persist selector cursor");
        }
        Some(picked)
    }

    /// Put `backend` in cooldown. The expiry is persisted best-effort.
    pub async fn mark_cooldown(&self, backend: &str, duration: Duration) {
        self.selector.mark_cooldown(backend, duration);
        let Some(state) = &self.state else {
            return;
        };
        let expires_at = TimeDelta::from_std(duration)
            .ok()
            .and_then(|delta| Utc::now().checked_add_signed(delta));
        let Some(expires_at) = expires_at else {
            return;
        };
        if let Err(e) = state.save_cooldown(backend, expires_at).await {
            warn!(backend, error = %e, "failed to persist backend cooldown");
        }
    }

    /// Record one call outcome against today's (local date) record for `backend`.
    ///
    /// Never fails observably.
    pub async fn record_outcome(&self, backend: &str, success: bool) {
        let outcome = if success {
            UsageOutcome::Success
        } else {
            UsageOutcome::Failure { at: Utc::now() }
        };
        let today = Local::now().date_naive();

        match self.store.upsert_usage(backend, today, outcome).await {
            Ok(()) => debug!(backend, success, "usage recorded"),
            Err(e) => warn!(backend, success, error = %e, "failed to record AI usage"),
        }
    }

    /// Backends currently in cooldown, with their expiry.
    pub fn cooldown_snapshot(&self) -> Vec<CooldownEntry> {
        self.selector.cooldown_snapshot()
    }

    /// Today's records (local date), ordered by model name.
    pub async fn today_report(&self) -> Result<Vec<UsageRecord>, QuizforgeError> {
        self.report_for(Local::now().date_naive()).await
    }

    /// Records for an arbitrary day.
    pub async fn report_for(&self, date: NaiveDate) -> Result<Vec<UsageRecord>, QuizforgeError> {
        let mut records = self.store.usage_for_date(date).await?;
        records.sort_by(|a, b| a.model_name.cmp(&b.model_name));
        Ok(records)
    }
}
