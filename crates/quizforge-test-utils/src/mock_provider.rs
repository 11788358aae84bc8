// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted provider adapter for deterministic engine tests.
//!
//! Each backend id gets its own script: one-shot replies are popped in FIFO
//! order, then the backend's sticky reply (if any) repeats forever.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use quizforge_core::{
    AdapterType, HealthStatus, PluginAdapter, ProviderAdapter, QuizforgeError,
};

/// What a scripted backend does when called.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this text as the model output.
    Text(String),
    /// Fail with a provider error carrying this message.
    Fail(String),
    /// Fail with a configuration error (e.g. missing credentials).
    ConfigError(String),
    /// Sleep this long, then return the text.
    Slow(Duration, String),
}

#[derive(Debug, Default)]
struct Script {
    queued: VecDeque<MockReply>,
    sticky: Option<MockReply>,
}

/// A mock provider driven by per-backend scripts.
#[derive(Clone, Default)]
pub struct MockProvider {
    scripts: Arc<Mutex<HashMap<String, Script>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `model` answer every call with `reply`.
    pub async fn always(&self, model: &str, reply: MockReply) {
        self.scripts
            .lock()
            .await
            .entry(model.to_string())
            .or_default()
            .sticky = Some(reply);
    }

    /// Queue a one-shot reply for `model`, used before any sticky reply.
    pub async fn push(&self, model: &str, reply: MockReply) {
        self.scripts
            .lock()
            .await
            .entry(model.to_string())
            .or_default()
            .queued
            .push_back(reply);
    }

    /// Backend ids in the order they were called.
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    /// Number of calls made to `model`.
    pub async fn call_count(&self, model: &str) -> usize {
        self.calls.lock().await.iter().filter(|m| *m == model).count()
    }

    async fn next_reply(&self, model: &str) -> Option<MockReply> {
        let mut scripts = self.scripts.lock().await;
        let script = scripts.get_mut(model)?;
        script.queued.pop_front().or_else(|| script.sticky.clone())
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, QuizforgeError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn generate_content(&self, model: &str, _prompt: &str) -> Result<String, QuizforgeError> {
        self.calls.lock().await.push(model.to_string());

        match self.next_reply(model).await {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Fail(message)) => Err(QuizforgeError::Provider {
                message,
                source: None,
            }),
            Some(MockReply::ConfigError(message)) => Err(QuizforgeError::Config(message)),
            Some(MockReply::Slow(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            None => Err(QuizforgeError::Internal(format!(
                "no scripted reply for {model}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queued_replies_come_before_sticky() {
        let provider = MockProvider::new();
        provider.push("m1", MockReply::Fail("429".into())).await;
        provider.always("m1", MockReply::Text("ok".into())).await;

        assert!(provider.generate_content("m1", "p").await.is_err());
        assert_eq!(provider.generate_content("m1", "p").await.unwrap(), "ok");
        assert_eq!(provider.generate_content("m1", "p").await.unwrap(), "ok");
        assert_eq!(provider.call_count("m1").await, 3);
    }

    #[tokio::test]
    async fn unscripted_model_fails() {
        let provider = MockProvider::new();
        let err = provider.generate_content("ghost", "p").await.unwrap_err();
        assert!(err.to_string().contains("no scripted reply for ghost"));
        assert_eq!(provider.calls().await, vec!["ghost"]);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_reply_waits() {
        let provider = MockProvider::new();
        provider
            .always("m1", MockReply::Slow(Duration::from_secs(10), "late".into()))
            .await;
        let start = tokio::time::Instant::now();
        assert_eq!(provider.generate_content("m1", "p").await.unwrap(), "late");
        assert!(start.elapsed() >= Duration::from_secs(10));
    }
}
