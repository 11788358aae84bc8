// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./quizforge.toml` > `~/.config/quizforge/quizforge.toml`
//! > `/etc/quizforge/quizforge.toml` with environment variable overrides via the
//! `QUIZFORGE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::QuizforgeConfig;

/// Config file name searched in every layer.
pub const CONFIG_FILE_NAME: &str = "quizforge.toml";

/// System-wide config location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/quizforge/quizforge.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/quizforge/quizforge.toml` (system-wide)
/// 3. `~/.config/quizforge/quizforge.toml` (user XDG config)
/// 4. `./quizforge.toml` (local directory)
/// 5. `QUIZFORGE_*` environment variables
pub fn load_config() -> Result<QuizforgeConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<QuizforgeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QuizforgeConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<QuizforgeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QuizforgeConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(QuizforgeConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(CONFIG_FILE_NAME))
        .merge(env_provider())
}

/// `~/.config/quizforge/quizforge.toml`, if the platform has a config dir.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("quizforge").join(CONFIG_FILE_NAME))
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `QUIZFORGE_GEMINI_API_KEY` must map to `gemini.api_key`,
/// not `gemini.api.key`.
fn env_provider() -> Env {
    Env::prefixed("QUIZFORGE_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to its dotted config path.
fn map_env_key(key: &str) -> String {
    const SECTIONS: &[&str] = &["app", "gemini", "generation", "quota", "storage"];
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
