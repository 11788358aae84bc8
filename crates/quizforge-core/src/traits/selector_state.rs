// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence for the model selector's round-robin cursor and cooldowns.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::QuizforgeError;
use crate::traits::adapter::PluginAdapter;
use crate::types::SelectorSnapshot;

/// Durable home of the selector state, so rotation and cooldowns survive
/// across processes sharing one database.
#[async_trait]
pub trait SelectorStateStore: PluginAdapter {
    /// The stored cursor and every cooldown still live at `now`.
    async fn load_selector_state(
        &self,
        now: DateTime<Utc>,
    ) -> Result<SelectorSnapshot, QuizforgeError>;

    /// Store `cursor` unless a larger value is already stored.
    async fn save_cursor(&self, cursor: u64) -> Result<(), QuizforgeError>;

    /// Store or replace the cooldown expiry of `backend`.
    async fn save_cooldown(
        &self,
        backend: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), QuizforgeError>;
}
