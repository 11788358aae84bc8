// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini provider adapter for the Quizforge engine.
//!
//! Implements [`ProviderAdapter`] over the `generateContent` REST endpoint.
//! The model id is chosen per call, so one provider instance serves every
//! backend in the configured rotation.

pub mod client;
pub mod types;

use async_trait::async_trait;
use quizforge_config::QuizforgeConfig;
use quizforge_core::{
    AdapterType, HealthStatus, PluginAdapter, ProviderAdapter, QuizforgeError,
};
use tracing::{debug, info};

use crate::client::GeminiClient;
use crate::types::GenerateContentRequest;

/// Environment variable consulted when the config has no API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini provider implementing [`ProviderAdapter`].
///
/// API key resolution order: config -> `GEMINI_API_KEY` env var -> error.
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    /// Creates a provider from the loaded configuration.
    ///
    /// The HTTP client timeout is the per-call generation timeout.
    pub fn new(config: &QuizforgeConfig) -> Result<Self, QuizforgeError> {
        let api_key = resolve_api_key(
            config.gemini.api_key.as_deref(),
            std::env::var(API_KEY_ENV).ok(),
        )?;
        let client = GeminiClient::new(
            &api_key,
            &config.gemini.base_url,
            config.generation.timeout(),
        )?;

        info!(
            backends = config.generation.models.len(),
            "Gemini provider initialized"
        );
        Ok(Self { client })
    }

    /// Creates a provider around an existing client.
    pub fn with_client(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, QuizforgeError> {
        // No API call: a probe would count against the same rate limits.
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ProviderAdapter for GeminiProvider {
    async fn generate_content(&self, model: &str, prompt: &str) -> Result<String, QuizforgeError> {
        let request = GenerateContentRequest::from_prompt(prompt).json_output();
        let response = self.client.generate_content(model, &request).await?;

        if let Some(text) = response.text() {
            debug!(model, chars = text.len(), "received generated text");
            return Ok(text);
        }

        let message = match response.blocked_reason() {
            Some(reason) => format!("{model} returned no content (blocked: {reason})"),
            None => format!("{model} returned an empty response"),
        };
        Err(QuizforgeError::Provider {
            message,
            source: None,
        })
    }
}

/// Picks the configured key, then the environment key. Blank keys count as missing.
fn resolve_api_key(
    config_key: Option<&str>,
    env_key: Option<String>,
) -> Result<String, QuizforgeError> {
    if let Some(key) = config_key
        && !key.trim().is_empty()
    {
        return Ok(key.to_string());
    }
    env_key.filter(|k| !k.trim().is_empty()).ok_or_else(|| {
        QuizforgeError::Config(
            "Gemini API key is not configured. Set gemini.api_key in config or the GEMINI_API_KEY environment variable.".into(),
        )
    })
}
