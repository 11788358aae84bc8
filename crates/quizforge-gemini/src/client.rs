// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini `generateContent` API.
//!
//! One call per method invocation. Retrying across backends is the
//! generation engine's job, so this client never retries on its own.

use std::time::Duration;

use quizforge_core::QuizforgeError;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::types::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse};

/// HTTP client for Gemini API communication.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    /// Creates a client authenticated with `api_key`.
    ///
    /// `base_url` is the API root without the `/models` suffix. `timeout`
    /// bounds the whole request including reading the body.
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, QuizforgeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(api_key).map_err(|e| {
                QuizforgeError::Config(format!("invalid API key header value: {e}"))
            })?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| QuizforgeError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.base_url)
    }

    /// Sends one `generateContent` request for `model`.
    ///
    /// Non-2xx responses become [`QuizforgeError::Provider`] whose message
    /// carries the HTTP code and Gemini status name (e.g. `429 (RESOURCE_EXHAUSTED)`).
    /// A request that exceeds the client timeout becomes [`QuizforgeError::Timeout`].
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, QuizforgeError> {
        let response = self
            .client
            .post(self.endpoint(model))
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        debug!(status = %status, model, "generateContent response received");

        if status.is_success() {
            let body = response.text().await.map_err(|e| self.transport_error(e))?;
            return serde_json::from_str(&body).map_err(|e| QuizforgeError::Provider {
                message: format!("failed to parse API response: {e}"),
                source: Some(Box::new(e)),
            });
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_err) => format!(
                "Gemini API error {} ({}): {}",
                api_err.error.code, api_err.error.status, api_err.error.message
            ),
            Err(_) => format!("API returned {status}: {body}"),
        };
        Err(QuizforgeError::Provider {
            message,
            source: None,
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> QuizforgeError {
        if e.is_timeout() {
            return QuizforgeError::Timeout {
                duration: self.timeout,
            };
        }
        QuizforgeError::Provider {
            message: format!("HTTP request failed: {e}"),
            source: Some(Box::new(e)),
        }
    }
}
