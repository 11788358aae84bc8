// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend selection: round-robin cursor plus per-backend cooldowns.
//!
//! A backend that fails retryably is put in cooldown and skipped until the
//! cooldown expires. Expired entries are cleared lazily on lookup.
//!
//! The selector is shared across concurrent requests behind an `Arc`. Every
//! operation holds the lock for a constant-time map or cursor update and never
//! across a backend call.
//!
//! The selector itself is process-local. [`ModelSelector::cursor`] and
//! [`ModelSelector::restore`] let a caller carry the rotation and live
//! cooldowns across processes.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use quizforge_core::CooldownEntry;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Default)]
struct SelectorState {
    cursor: u64,
    cooldowns: HashMap<String, Instant>,
}

/// Round-robin selector with per-backend cooldowns.
#[derive(Debug, Default)]
pub struct ModelSelector {
    state: Mutex<SelectorState>,
}

impl ModelSelector {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock only means another thread panicked mid-update; the map
    // and cursor are still internally consistent.
    fn lock(&self) -> MutexGuard<'_, SelectorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Next id in strict round-robin order over the full list, ignoring cooldowns.
    ///
    /// Returns `None` only for an empty list.
    pub fn next(&self, ids: &[String]) -> Option<String> {
        if ids.is_empty() {
            return None;
        }
        let mut state = self.lock();
        let slot = state.cursor % ids.len() as u64;
        let picked = ids[slot as usize].clone();
        state.cursor = state.cursor.wrapping_add(1);
        Some(picked)
    }

    /// Number of picks made so far, including restored ones.
    pub fn cursor(&self) -> u64 {
        self.lock().cursor
    }

    /// Merge persisted state: the cursor only moves forward and each cooldown
    /// keeps whichever expiry is later.
    pub fn restore(&self, cursor: u64, cooldowns: impl IntoIterator<Item = (String, Duration)>) {
        let now = Instant::now();
        let mut state = self.lock();
        state.cursor = state.cursor.max(cursor);
        for (id, remaining) in cooldowns {
            let expires = now + remaining;
            let entry = state.cooldowns.entry(id).or_insert(expires);
            if *entry < expires {
                *entry = expires;
            }
        }
        debug!(cursor = state.cursor, cooldowns = state.cooldowns.len(), "selector state restored");
    }

    /// Put `id` in cooldown for `duration`, replacing any existing expiry.
    pub fn mark_cooldown(&self, id: &str, duration: Duration) {
        let expires = Instant::now() + duration;
        self.lock().cooldowns.insert(id.to_string(), expires);
        debug!(backend = id, cooldown_secs = duration.as_secs(), "backend put in cooldown");
    }

    /// Whether `id` has no live cooldown. Clears the entry if it has expired.
    pub fn is_available(&self, id: &str) -> bool {
        let now = Instant::now();
        let mut state = self.lock();
        match state.cooldowns.get(id) {
            None => true,
            Some(expires) if *expires <= now => {
                state.cooldowns.remove(id);
                true
            }
            Some(_) => false,
        }
    }

    /// The ids not in cooldown, in their original order. May be empty.
    pub fn available_candidates(&self, ids: &[String]) -> Vec<String> {
        ids.iter()
            .filter(|id| self.is_available(id))
            .cloned()
            .collect()
    }

    /// Live cooldowns, sorted by backend id.
    pub fn cooldown_snapshot(&self) -> Vec<CooldownEntry> {
        let now = Instant::now();
        let wall_now = Utc::now();
        let state = self.lock();

        let mut entries: Vec<CooldownEntry> = state
            .cooldowns
            .iter()
            .filter(|(_, expires)| **expires > now)
            .map(|(backend, expires)| {
                let remaining = expires.duration_since(now);
                CooldownEntry {
                    backend: backend.clone(),
                    expires_at: wall_clock_expiry(wall_now, remaining),
                    remaining,
                }
            })
            .collect();
        entries.sort_by(|a, b| a.backend.cmp(&b.backend));
        entries
    }
}

fn wall_clock_expiry(now: DateTime<Utc>, remaining: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(remaining)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
