// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Multi-backend generation engine.
//!
//! Walks the configured backends in order, skipping those in cooldown, until
//! one returns a structurally valid quiz or the attempt budget runs out.
//! Retryable failures put the backend in cooldown and move on; a
//! non-retryable failure ends the request. Every attempt is written to the
//! usage ledger.

use std::sync::Arc;
use std::time::Duration;

use quizforge_config::model::GenerationConfig;
use quizforge_core::{BackendFailure, GeneratedQuiz, ProviderAdapter, QuizRequest, QuizforgeError};
use quizforge_resilience::{ModelSelector, classify_error};
use quizforge_usage::UsageLedger;
use tracing::{error, info, warn};

use crate::parse::parse_quiz;
use crate::prompt::build_prompt;

/// Backend rotation and failure policy for one engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPolicy {
    /// Ordered backend ids; order is the fallback and round-robin order.
    pub backends: Vec<String>,
    /// When false, one backend is picked round-robin and called once.
    pub fallback_enabled: bool,
    /// Maximum attempts per request.
    pub max_retries: u32,
    pub per_call_timeout: Duration,
    pub cooldown: Duration,
}

impl GenerationPolicy {
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            backends: config.models.clone(),
            fallback_enabled: config.fallback_enabled,
            max_retries: config.max_retries,
            per_call_timeout: config.timeout(),
            cooldown: config.cooldown(),
        }
    }
}

/// The generation engine. Cheap to share behind an `Arc`.
pub struct GenerationEngine {
    provider: Arc<dyn ProviderAdapter>,
    selector: Arc<ModelSelector>,
    ledger: UsageLedger,
    policy: GenerationPolicy,
}

impl GenerationEngine {
    pub fn new(
        provider: Arc<dyn ProviderAdapter>,
        selector: Arc<ModelSelector>,
        ledger: UsageLedger,
        policy: GenerationPolicy,
    ) -> Self {
        Self {
            provider,
            selector,
            ledger,
            policy,
        }
    }

    pub fn ledger(&self) -> &UsageLedger {
        &self.ledger
    }

    /// Generate a quiz with the engine's configured policy.
    pub async fn generate(&self, request: &QuizRequest) -> Result<GeneratedQuiz, QuizforgeError> {
        self.generate_with_policy(request, &self.policy).await
    }

    /// Generate a quiz with an explicit policy.
    ///
    /// Returns the first valid quiz, or [`QuizforgeError::AllBackendsFailed`]
    /// listing every backend tried with its failure message.
    pub async fn generate_with_policy(
        &self,
        request: &QuizRequest,
        policy: &GenerationPolicy,
    ) -> Result<GeneratedQuiz, QuizforgeError> {
        if policy.backends.is_empty() {
            return Err(QuizforgeError::Config(
                "no generation backends configured".into(),
            ));
        }
        let prompt = build_prompt(request);

        if !policy.fallback_enabled {
            return self.generate_single(&prompt, policy).await;
        }

        let mut candidates = self.selector.available_candidates(&policy.backends);
        if candidates.is_empty() {
            warn!("all backends are in cooldown, trying full list");
            candidates = policy.backends.clone();
        }

        let mut attempts: u32 = 0;
        let mut failures = Vec::new();

        for backend in &candidates {
            if attempts >= policy.max_retries {
                break;
            }
            attempts += 1;
            info!(
                attempt = attempts,
                max_retries = policy.max_retries,
                backend = %backend,
                "trying backend"
            );

            match self.attempt(backend, &prompt, policy.per_call_timeout).await {
                Ok(quiz) => {
                    self.ledger.record_outcome(backend, true).await;
                    info!(backend = %backend, attempts, "generation succeeded");
                    return Ok(quiz);
                }
                Err(err) => {
                    failures.push(self.handle_failure(backend, &err, policy).await);
                    if !err.is_retryable() {
                        break;
                    }
                }
            }
        }

        error!(attempts, failed = failures.len(), "all backends failed");
        Err(QuizforgeError::AllBackendsFailed { attempts, failures })
    }

    /// No-fallback mode: exactly one attempt on the next round-robin backend.
    async fn generate_single(
        &self,
        prompt: &str,
        policy: &GenerationPolicy,
    ) -> Result<GeneratedQuiz, QuizforgeError> {
        let Some(backend) = self.ledger.next_backend(&policy.backends).await else {
            return Err(QuizforgeError::Config(
                "no generation backends configured".into(),
            ));
        };
        info!(backend = %backend, "fallback disabled, single attempt");

        match self.attempt(&backend, prompt, policy.per_call_timeout).await {
            Ok(quiz) => {
                self.ledger.record_outcome(&backend, true).await;
                Ok(quiz)
            }
            Err(err) => {
                let failure = self.handle_failure(&backend, &err, policy).await;
                Err(QuizforgeError::AllBackendsFailed {
                    attempts: 1,
                    failures: vec![failure],
                })
            }
        }
    }

    /// One bounded call plus output validation.
    ///
    /// Every failure comes back as [`QuizforgeError::RetryableBackend`] or
    /// [`QuizforgeError::NonRetryableBackend`] tagged with `backend`.
    async fn attempt(
        &self,
        backend: &str,
        prompt: &str,
        timeout: Duration,
    ) -> Result<GeneratedQuiz, QuizforgeError> {
        let result = self.call_and_parse(backend, prompt, timeout).await;
        result.map_err(|err| {
            if is_unexpected(&err) {
                error!(backend, error = %err, "unexpected error from backend");
            }
            classify_error(&err).into_error(backend)
        })
    }

    async fn call_and_parse(
        &self,
        backend: &str,
        prompt: &str,
        timeout: Duration,
    ) -> Result<GeneratedQuiz, QuizforgeError> {
        let raw = tokio::time::timeout(timeout, self.provider.generate_content(backend, prompt))
            .await
            .map_err(|_| QuizforgeError::Timeout { duration: timeout })??;
        parse_quiz(&raw, backend)
    }

    /// Log, record and (when retryable) cool down a failed attempt.
    async fn handle_failure(
        &self,
        backend: &str,
        err: &QuizforgeError,
        policy: &GenerationPolicy,
    ) -> BackendFailure {
        self.ledger.record_outcome(backend, false).await;

        match err {
            QuizforgeError::RetryableBackend { backend, message } => {
                warn!(backend = %backend, error = %message, "retryable error from backend");
                self.ledger.mark_cooldown(backend, policy.cooldown).await;
                BackendFailure::new(backend.as_str(), message.as_str())
            }
            QuizforgeError::NonRetryableBackend { backend, message } => {
                error!(
                    backend = %backend,
                    error = %message,
                    "non-retryable error from backend, stopping"
                );
                BackendFailure::new(backend.as_str(), message.as_str())
            }
            other => {
                error!(backend, error = %other, "unclassified backend failure, stopping");
                BackendFailure::new(backend, other.to_string())
            }
        }
    }
}

/// Errors a provider is not expected to return for a backend failure.
fn is_unexpected(err: &QuizforgeError) -> bool {
    !matches!(
        err,
        QuizforgeError::Provider { .. }
            | QuizforgeError::RetryableBackend { .. }
            | QuizforgeError::NonRetryableBackend { .. }
            | QuizforgeError::MalformedOutput { .. }
            | QuizforgeError::Timeout { .. }
            | QuizforgeError::Config(_)
    )
}
