// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for LLM backends (Gemini, etc.).

use async_trait::async_trait;

use crate::error::QuizforgeError;
use crate::traits::adapter::PluginAdapter;

/// Adapter for a family of interchangeable generation backends.
///
/// One provider serves several backend identifiers (model names); the engine
/// picks the identifier, the provider only performs the call.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends `prompt` to the backend named `model` and returns the raw text answer.
    ///
    /// Failures are returned unclassified, usually as [`QuizforgeError::Provider`]
    /// carrying the status code and body text; the engine decides whether they
    /// are retryable.
    async fn generate_content(&self, model: &str, prompt: &str) -> Result<String, QuizforgeError>;
}
