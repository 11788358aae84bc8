// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as a non-empty backend list and a retry budget of at least one.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::QuizforgeConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &QuizforgeConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let generation = &config.generation;

    if generation.models.is_empty() {
        errors.push(ConfigError::Validation {
            message: "generation.models must list at least one backend".to_string(),
        });
    }

    for (i, model) in generation.models.iter().enumerate() {
        if model.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("generation.models[{i}] must not be empty"),
            });
        }
    }

    let mut seen = HashSet::new();
    for model in &generation.models {
        if !seen.insert(model.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!("duplicate backend `{model}` in generation.models"),
            });
        }
    }

    if generation.max_retries < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "generation.max_retries must be at least 1, got {}",
                generation.max_retries
            ),
        });
    }

    if generation.timeout_secs < 1 {
        errors.push(ConfigError::Validation {
            message: "generation.timeout_secs must be at least 1".to_string(),
        });
    }

    if config.gemini.base_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gemini.base_url must not be empty".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
