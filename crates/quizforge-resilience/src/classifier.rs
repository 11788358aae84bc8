// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend failure classification.
//!
//! Sorts a raw backend failure into retryable (try the next backend) or
//! non-retryable (stop the loop) using case-insensitive substring rules.
//! No state, no I/O.

use quizforge_core::QuizforgeError;

/// Signals of a transient failure. Checked before [`NON_RETRYABLE_SIGNALS`].
const RETRYABLE_SIGNALS: &[&str] = &[
    "429",
    "rate limit",
    "503",
    "overloaded",
    "timeout",
    "deadline",
];

/// Signals of a failure no other attempt can fix (auth, permissions).
const NON_RETRYABLE_SIGNALS: &[&str] = &[
    "401",
    "403",
    "permission",
    "invalid api key",
    "forbidden",
];

/// Verdict for one failed backend call. Carries the original message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureClass {
    Retryable(String),
    NonRetryable(String),
}

impl FailureClass {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Retryable(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Retryable(msg) | Self::NonRetryable(msg) => msg,
        }
    }

    /// Attach the backend id, producing the matching per-backend error.
    pub fn into_error(self, backend: &str) -> QuizforgeError {
        let backend = backend.to_string();
        match self {
            Self::Retryable(message) => QuizforgeError::RetryableBackend { backend, message },
            Self::NonRetryable(message) => QuizforgeError::NonRetryableBackend { backend, message },
        }
    }
}

/// Classify a failure message.
///
/// Anything that matches neither signal table is retryable: an unknown failure
/// should cost one attempt, not the whole request.
pub fn classify(message: &str) -> FailureClass {
    let lower = message.to_lowercase();

    if RETRYABLE_SIGNALS.iter().any(|s| lower.contains(s)) {
        return FailureClass::Retryable(message.to_string());
    }
    if NON_RETRYABLE_SIGNALS.iter().any(|s| lower.contains(s)) {
        return FailureClass::NonRetryable(message.to_string());
    }
    FailureClass::Retryable(message.to_string())
}

/// Classify a typed error returned by a provider call.
///
/// Timeouts and malformed output are retryable without looking at the text.
/// Configuration errors (e.g. a missing API key) are never retried. Everything
/// else falls back to [`classify`] on its message.
pub fn classify_error(err: &QuizforgeError) -> FailureClass {
    match err {
        QuizforgeError::Timeout { duration } => {
            FailureClass::Retryable(format!("timeout after {}s", duration.as_secs()))
        }
        QuizforgeError::MalformedOutput { message, .. } => {
            FailureClass::Retryable(format!("malformed output: {message}"))
        }
        QuizforgeError::RetryableBackend { message, .. } => {
            FailureClass::Retryable(message.clone())
        }
        QuizforgeError::NonRetryableBackend { message, .. } => {
            FailureClass::NonRetryable(message.clone())
        }
        QuizforgeError::Config(message) => FailureClass::NonRetryable(message.clone()),
        QuizforgeError::Provider { message, .. } => classify(message),
        other => classify(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn rate_limit_is_retryable() {
        let class = classify("Gemini API error 429 (RESOURCE_EXHAUSTED): quota");
        assert!(class.is_retryable());
        assert!(classify("Rate Limit exceeded").is_retryable());
    }

    #[test]
    fn overload_and_deadline_are_retryable() {
        for msg in [
            "503 Service Unavailable",
            "model is overloaded",
            "request timeout",
            "DEADLINE_EXCEEDED",
        ] {
            assert!(classify(msg).is_retryable(), "{msg} should be retryable");
        }
    }

    #[test]
    fn auth_failures_are_not_retryable() {
        for msg in [
            "401 Unauthorized",
            "403",
            "PERMISSION_DENIED: caller lacks permission",
            "API key not valid. Invalid API key",
            "Forbidden",
        ] {
            assert_eq!(
                classify(msg),
                FailureClass::NonRetryable(msg.to_string()),
                "{msg} should not be retryable"
            );
        }
    }

    #[test]
    fn retryable_signal_wins_over_non_retryable() {
        let class = classify("403 forbidden, then 429 rate limit");
        assert!(class.is_retryable());
    }

    #[test]
    fn unknown_failure_defaults_to_retryable() {
        assert_eq!(
            classify("connection reset by peer"),
            FailureClass::Retryable("connection reset by peer".to_string())
        );
        assert!(classify("").is_retryable());
    }

    #[test]
    fn message_is_preserved_verbatim() {
        let class = classify("Invalid API Key supplied");
        assert_eq!(class.message(), "Invalid API Key supplied");
    }

    #[test]
    fn into_error_tags_backend() {
        let err = classify("401").into_error("m1");
        assert!(matches!(
            err,
            QuizforgeError::NonRetryableBackend { ref backend, .. } if backend == "m1"
        ));
        assert!(!err.is_retryable());
    }

    #[test]
    fn typed_timeout_mentions_timeout() {
        let class = classify_error(&QuizforgeError::Timeout {
            duration: Duration::from_secs(60),
        });
        assert_eq!(class, FailureClass::Retryable("timeout after 60s".to_string()));
    }

    #[test]
    fn malformed_output_is_retryable() {
        let class = classify_error(&QuizforgeError::MalformedOutput {
            backend: "m1".into(),
            message: "question 2 has 3 options, expected 4".into(),
        });
        assert!(class.is_retryable());
    }

    #[test]
    fn missing_credentials_are_fatal() {
        let class = classify_error(&QuizforgeError::Config("Gemini API key is not set".into()));
        assert!(!class.is_retryable());
    }

    #[test]
    fn provider_error_uses_message_signals() {
        let err = QuizforgeError::Provider {
            message: "Gemini API error 403 (PERMISSION_DENIED): denied".into(),
            source: None,
        };
        assert!(!classify_error(&err).is_retryable());
    }
}
