// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user daily generation quota.
//!
//! The activity log is the source of truth: "used" is the number of
//! generation actions the user logged since local midnight. The check is
//! advisory: nothing is reserved, so two concurrent requests may both pass
//! with one unit left.

use std::sync::Arc;

use chrono::{DateTime, Local, LocalResult, NaiveTime, TimeZone, Utc};
use quizforge_core::{AI_GENERATE_ACTION, ActivityLog, QuizforgeError};
use serde::Serialize;
use tracing::{debug, info};

/// Result of a quota check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaStatus {
    pub used: u32,
    pub remaining: u32,
    pub limit: u32,
}

impl QuotaStatus {
    /// `remaining` is `limit - used`, floored at zero.
    pub fn new(used: u32, limit: u32) -> Self {
        Self {
            used,
            remaining: limit.saturating_sub(used),
            limit,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

/// Gatekeeper run before the generation engine.
#[derive(Clone)]
pub struct QuotaGuard {
    log: Arc<dyn ActivityLog>,
}

impl QuotaGuard {
    pub fn new(log: Arc<dyn ActivityLog>) -> Self {
        Self { log }
    }

    /// Count today's generations for `user_id` against `daily_limit`.
    pub async fn check(&self, user_id: &str, daily_limit: u32) -> Result<QuotaStatus, QuizforgeError> {
        let since = local_midnight_utc(Local::now());
        let used = self
            .log
            .count_since(user_id, AI_GENERATE_ACTION, since)
            .await?;
        let status = QuotaStatus::new(used, daily_limit);
        debug!(user_id, used, remaining = status.remaining, "quota checked");
        Ok(status)
    }

    /// Like [`check`](Self::check), but an exhausted allowance is an error.
    pub async fn ensure_available(
        &self,
        user_id: &str,
        daily_limit: u32,
    ) -> Result<QuotaStatus, QuizforgeError> {
        let status = self.check(user_id, daily_limit).await?;
        if status.is_exhausted() {
            info!(user_id, used = status.used, limit = daily_limit, "daily AI quota exhausted");
            return Err(QuizforgeError::QuotaExceeded {
                limit: daily_limit,
                used: status.used,
            });
        }
        Ok(status)
    }
}

/// Start of the local calendar day containing `now`, as a UTC instant.
///
/// When midnight does not exist locally (a DST jump at 00:00) the earliest
/// valid instant of the day is used.
pub fn local_midnight_utc<Tz: TimeZone>(now: DateTime<Tz>) -> DateTime<Utc> {
    let tz = now.timezone();
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            let one_am = midnight + chrono::Duration::hours(1);
            tz.from_local_datetime(&one_am)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|| now.with_timezone(&Utc))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};
    use quizforge_test_utils::MemoryActivityLog;

    fn guard_with(log: &MemoryActivityLog) -> QuotaGuard {
        QuotaGuard::new(Arc::new(log.clone()))
    }

    #[test]
    fn remaining_is_floored_at_zero() {
        assert_eq!(QuotaStatus::new(6, 6).remaining, 0);
        assert_eq!(QuotaStatus::new(7, 6).remaining, 0);
        assert_eq!(QuotaStatus::new(2, 6).remaining, 4);
        assert!(QuotaStatus::new(0, 0).is_exhausted());
    }

    #[test]
    fn midnight_in_fixed_offset_zone() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2026, 4, 3, 1, 30, 0).unwrap();
        let midnight = local_midnight_utc(now);
        assert_eq!(midnight, Utc.with_ymd_and_hms(2026, 4, 2, 22, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn fresh_user_has_full_allowance() {
        let log = MemoryActivityLog::new();
        let status = guard_with(&log).check("u1", 6).await.unwrap();
        assert_eq!(status, QuotaStatus { used: 0, remaining: 6, limit: 6 });
    }

    #[tokio::test]
    async fn used_at_limit_leaves_nothing() {
        let log = MemoryActivityLog::new();
        log.seed("u1", AI_GENERATE_ACTION, 6).await;
        let status = guard_with(&log).check("u1", 6).await.unwrap();
        assert_eq!(status.used, 6);
        assert_eq!(status.remaining, 0);

        log.seed("u1", AI_GENERATE_ACTION, 1).await;
        let status = guard_with(&log).check("u1", 6).await.unwrap();
        assert_eq!(status.used, 7);
        assert_eq!(status.remaining, 0);
    }

    #[tokio::test]
    async fn other_actions_and_users_do_not_count() {
        let log = MemoryActivityLog::new();
        log.seed("u1", "Create Quiz", 3).await;
        log.seed("u2", AI_GENERATE_ACTION, 3).await;
        let status = guard_with(&log).check("u1", 6).await.unwrap();
        assert_eq!(status.used, 0);
    }

    #[tokio::test]
    async fn yesterdays_generations_do_not_count() {
        let log = MemoryActivityLog::new();
        let yesterday = local_midnight_utc(Local::now()) - Duration::minutes(1);
        log.push_at("u1", AI_GENERATE_ACTION, yesterday).await;
        let status = guard_with(&log).check("u1", 6).await.unwrap();
        assert_eq!(status.used, 0);
    }

    #[tokio::test]
    async fn ensure_available_rejects_exhausted_user() {
        let log = MemoryActivityLog::new();
        log.seed("u1", AI_GENERATE_ACTION, 6).await;
        let err = guard_with(&log).ensure_available("u1", 6).await.unwrap_err();
        assert!(matches!(err, QuizforgeError::QuotaExceeded { limit: 6, used: 6 }));
    }

    #[tokio::test]
    async fn zero_limit_always_rejects() {
        let log = MemoryActivityLog::new();
        let err = guard_with(&log).ensure_available("u1", 0).await.unwrap_err();
        assert!(matches!(err, QuizforgeError::QuotaExceeded { limit: 0, used: 0 }));
    }
}
