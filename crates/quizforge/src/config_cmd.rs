// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `quizforge config`: print the effective configuration.

use quizforge_config::QuizforgeConfig;
use quizforge_core::QuizforgeError;

const REDACTED: &str = "<redacted>";

pub fn run_config(config: &QuizforgeConfig) -> Result<(), QuizforgeError> {
    print!("{}", effective_toml(config)?);
    Ok(())
}

/// Effective configuration as TOML, with the API key masked.
fn effective_toml(config: &QuizforgeConfig) -> Result<String, QuizforgeError> {
    let mut shown = config.clone();
    if shown.gemini.api_key.is_some() {
        shown.gemini.api_key = Some(REDACTED.to_string());
    }
    toml::to_string_pretty(&shown)
        .map_err(|e| QuizforgeError::Internal(format!("failed to render config: {e}")))
}
