// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Quizforge configuration system.

use quizforge_config::diagnostic::ConfigError;
use quizforge_config::model::QuizforgeConfig;
use quizforge_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[app]
log_level = "debug"

[gemini]
api_key = "AIza-test"
base_url = "http://localhost:9999/v1beta"

[generation]
models = ["m1", "m2", "m3"]
fallback_enabled = true
max_retries = 2
timeout_secs = 30
cooldown_minutes = 10

[quota]
daily_limit = 12

[storage]
database_path = "/tmp/quizforge-test.db"
wal_mode = false
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.app.log_level, "debug");
    assert_eq!(config.gemini.api_key.as_deref(), Some("AIza-test"));
    assert_eq!(config.gemini.base_url, "http://localhost:9999/v1beta");
    assert_eq!(config.generation.models, vec!["m1", "m2", "m3"]);
    assert_eq!(config.generation.max_retries, 2);
    assert_eq!(config.generation.timeout_secs, 30);
    assert_eq!(config.generation.cooldown_minutes, 10);
    assert_eq!(config.quota.daily_limit, 12);
    assert_eq!(config.storage.database_path, "/tmp/quizforge-test.db");
    assert!(!config.storage.wal_mode);
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.app.log_level, "info");
    assert!(config.gemini.api_key.is_none());
    assert_eq!(config.generation.models, vec!["gemini-2.5-flash"]);
    assert!(config.generation.fallback_enabled);
    assert_eq!(config.generation.max_retries, 3);
    assert_eq!(config.generation.timeout_secs, 60);
    assert_eq!(config.generation.cooldown_minutes, 5);
    assert_eq!(config.quota.daily_limit, 6);
    assert_eq!(config.storage.database_path, "quizforge.db");
    assert!(config.storage.wal_mode);
}

/// Unknown field in [generation] is rejected.
#[test]
fn unknown_field_in_generation_produces_error() {
    let toml = r#"
[generation]
max_retires = 2
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("max_retires"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[leaderboard]
size = 10
"#;

    let err = load_config_from_str(toml).expect_err("unknown section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("leaderboard"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Diagnostics for a typo carry the suggestion and the valid keys.
#[test]
fn diagnostic_error_suggests_valid_key() {
    let toml = r#"
[generation]
max_retires = 2
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "max_retires"
                && suggestion.as_deref() == Some("max_retries")
                && valid_keys.contains("cooldown_minutes")
        })
    });
    assert!(found, "expected UnknownKey for max_retires, got: {errors:?}");
}

/// Wrong value type produces an InvalidType diagnostic.
#[test]
fn diagnostic_invalid_type() {
    let toml = r#"
[quota]
daily_limit = "six"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. } | ConfigError::Other(_))),
        "got: {errors:?}"
    );
}

/// Semantic validation runs after a successful parse.
#[test]
fn validation_rejects_zero_retries() {
    let toml = r#"
[generation]
max_retries = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("zero retries should fail");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("max_retries"))
    ));
}

/// A negative daily limit cannot even be deserialized into u32.
#[test]
fn negative_daily_limit_is_rejected() {
    let toml = r#"
[quota]
daily_limit = -1
"#;
    assert!(load_and_validate_str(toml).is_err());
}

/// ConfigError can be rendered using miette's graphical handler.
#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "api_kye".to_string(),
        suggestion: Some("api_key".to_string()),
        valid_keys: "api_key, base_url".to_string(),
        span: None,
        src: None,
    };

    assert!(error.code().is_some());
    let help = error.help().expect("should have help").to_string();
    assert!(help.contains("did you mean `api_key`"), "got: {help}");

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(buf.contains("api_kye"));
}

/// Explicit config file path is honored and validated.
#[test]
fn load_from_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quizforge.toml");
    std::fs::write(
        &path,
        "[generation]\nmodels = [\"alpha\", \"beta\"]\n\n[quota]\ndaily_limit = 2\n",
    )
    .unwrap();

    let config = load_and_validate_path(&path).expect("file config should validate");
    assert_eq!(config.generation.models, vec!["alpha", "beta"]);
    assert_eq!(config.quota.daily_limit, 2);
}

/// QUIZFORGE_* env vars override file values, including underscore-containing keys.
#[test]
fn env_vars_override_file_values() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "quizforge.toml",
            "[gemini]\napi_key = \"from-file\"\n\n[quota]\ndaily_limit = 2\n",
        )?;
        jail.set_env("QUIZFORGE_GEMINI_API_KEY", "from-env");
        jail.set_env("QUIZFORGE_QUOTA_DAILY_LIMIT", "9");
        jail.set_env("QUIZFORGE_GENERATION_MAX_RETRIES", "5");

        let config: QuizforgeConfig = quizforge_config::load_config_from_path(
            std::path::Path::new("quizforge.toml"),
        )?;
        assert_eq!(config.gemini.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.quota.daily_limit, 9);
        assert_eq!(config.generation.max_retries, 5);
        Ok(())
    });
}
