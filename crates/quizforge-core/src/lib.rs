// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Quizforge generation engine.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Quizforge workspace. Providers, storage,
//! and the activity log all implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::QuizforgeError;
pub use types::{
    AdapterType, BackendFailure, CooldownEntry, Difficulty, GeneratedQuiz, HealthStatus,
    QuizQuestion, QuizRequest, SelectorSnapshot, UsageOutcome, UsageRecord, UsageStatus,
};

// Re-export all adapter traits at crate root.
pub use traits::{
    AI_GENERATE_ACTION, ActivityLog, PluginAdapter, ProviderAdapter, SelectorStateStore,
    UsageStore,
};
