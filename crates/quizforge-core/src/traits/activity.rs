// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Activity log trait: the source of truth for per-user daily generation counts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::QuizforgeError;
use crate::traits::adapter::PluginAdapter;

/// Action type logged for every successful AI generation.
pub const AI_GENERATE_ACTION: &str = "AI Generate";

/// Append-only log of user actions.
#[async_trait]
pub trait ActivityLog: PluginAdapter {
    /// Append one action for `user_id`.
    async fn record_activity(
        &self,
        user_id: &str,
        action_type: &str,
        description: &str,
    ) -> Result<(), QuizforgeError>;

    /// Count actions of `action_type` by `user_id` at or after `since`.
    async fn count_since(
        &self,
        user_id: &str,
        action_type: &str,
        since: DateTime<Utc>,
    ) -> Result<u32, QuizforgeError>;
}
