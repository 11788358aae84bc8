// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Quizforge engine.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
    ActivityLog,
}

/// Requested difficulty of the generated quiz.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// A user's request for a generated quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRequest {
    /// Subject of the quiz. Must be non-empty.
    pub topic: String,
    /// Optional extra context for the model; empty when not provided.
    pub description: String,
    /// Number of questions to ask for (the service clamps this to 5..=50).
    pub question_count: u32,
    pub difficulty: Difficulty,
}

impl QuizRequest {
    pub fn new(topic: impl Into<String>, question_count: u32, difficulty: Difficulty) -> Self {
        Self {
            topic: topic.into(),
            description: String::new(),
            question_count,
            difficulty,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A single validated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: [String; 4],
    /// Index into `options`, always in `0..4`.
    pub correct_index: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// A structurally valid quiz produced by one backend.
///
/// Transient: the engine never persists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedQuiz {
    pub title: String,
    pub description: String,
    pub questions: Vec<QuizQuestion>,
    /// Backend identifier that produced this quiz.
    pub model_used: String,
}

/// Health of a backend as of its last recorded outcome today.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UsageStatus {
    Active,
    Degraded,
}

/// Outcome of one backend call, as written to the usage ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageOutcome {
    Success,
    Failure { at: DateTime<Utc> },
}

/// Daily counters for one backend. Unique per (model_name, date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub model_name: String,
    pub date: NaiveDate,
    pub success_count: u32,
    pub failure_count: u32,
    pub last_failure_at: Option<DateTime<Utc>>,
    pub status: UsageStatus,
}

impl UsageRecord {
    pub fn total_calls(&self) -> u32 {
        self.success_count + self.failure_count
    }
}

/// A backend currently excluded from selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CooldownEntry {
    pub backend: String,
    /// Wall-clock instant the cooldown ends.
    pub expires_at: DateTime<Utc>,
    /// Time left until `expires_at`.
    pub remaining: Duration,
}

/// Breaker state persisted between processes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorSnapshot {
    /// Number of round-robin picks made so far.
    pub cursor: u64,
    /// Unexpired cooldowns as (backend, wall-clock expiry).
    pub cooldowns: Vec<(String, DateTime<Utc>)>,
}

/// One backend's failure inside an aggregate generation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendFailure {
    pub backend: String,
    pub message: String,
}

impl BackendFailure {
    pub fn new(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for BackendFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.backend, self.message)
    }
}
