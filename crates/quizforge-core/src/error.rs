// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Quizforge generation engine.

use thiserror::Error;

use crate::types::BackendFailure;

/// The primary error type used across all Quizforge adapter traits and core operations.
#[derive(Debug, Error)]
pub enum QuizforgeError {
    /// Configuration errors (missing credentials, invalid values). Never retried.
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Raw failure surfaced by a provider call before classification
    /// (transport error, non-2xx status, unreadable body).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Transient backend failure (rate limit, overload, timeout). The next backend is tried.
    #[error("retryable error from {backend}: {message}")]
    RetryableBackend { backend: String, message: String },

    /// Permanent backend failure (auth, permission). Stops the backend loop.
    #[error("non-retryable error from {backend}: {message}")]
    NonRetryableBackend { backend: String, message: String },

    /// The backend answered but its output did not match the quiz shape.
    #[error("malformed output from {backend}: {message}")]
    MalformedOutput { backend: String, message: String },

    /// The caller used up their daily generation allowance.
    #[error("daily AI generation limit reached ({used}/{limit} today), try again tomorrow")]
    QuotaExceeded { limit: u32, used: u32 },

    /// Every candidate backend failed, or a non-retryable failure stopped the loop.
    #[error(
        "all AI backends failed after {attempts} attempt(s): {}",
        format_failures(failures)
    )]
    AllBackendsFailed {
        attempts: u32,
        failures: Vec<BackendFailure>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// The request was rejected before any backend was called.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl QuizforgeError {
    /// Whether a per-backend failure should move on to the next candidate.
    ///
    /// Malformed output counts as retryable: another backend may well answer correctly.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RetryableBackend { .. } | Self::MalformedOutput { .. } | Self::Timeout { .. }
        )
    }
}

fn format_failures(failures: &[BackendFailure]) -> String {
    if failures.is_empty() {
        return "no backend was attempted".to_string();
    }
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
