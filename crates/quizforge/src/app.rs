// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Composition root: tracing setup and wiring of storage, selector, ledger,
//! provider and engine into a [`QuizGenerator`].
//!
//! Each command runs in a fresh process, so the selector is seeded from the
//! rotation cursor and cooldowns persisted in the database.

use std::sync::Arc;

use quizforge_config::QuizforgeConfig;
use quizforge_core::{
    ActivityLog, ProviderAdapter, QuizforgeError, SelectorStateStore, UsageStore,
};
use quizforge_generation::{GenerationEngine, GenerationPolicy, QuizGenerator};
use quizforge_resilience::ModelSelector;
use quizforge_storage::SqliteStorage;
use quizforge_usage::UsageLedger;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the configured level applies to every
/// `quizforge*` target and everything else logs at `warn`. Logs go to stderr so
/// `--json` output on stdout stays machine-readable.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

fn default_directives(log_level: &str) -> String {
    format!("quizforge={log_level},warn")
}

/// Open the configured SQLite database, running migrations.
pub async fn open_storage(config: &QuizforgeConfig) -> Result<Arc<SqliteStorage>, QuizforgeError> {
    let storage = SqliteStorage::open(&config.storage).await?;
    Ok(Arc::new(storage))
}

/// Ledger over `storage` with `selector` restored from its persisted state.
pub async fn build_ledger(
    storage: &Arc<SqliteStorage>,
    selector: Arc<ModelSelector>,
) -> Result<UsageLedger, QuizforgeError> {
    let store: Arc<dyn UsageStore> = storage.clone();
    let state: Arc<dyn SelectorStateStore> = storage.clone();
    let ledger = UsageLedger::new(store, selector).with_state_store(state);
    ledger.restore_selector().await?;
    Ok(ledger)
}

/// Wire a generator around `provider` and `storage`.
pub async fn build_generator(
    config: &QuizforgeConfig,
    provider: Arc<dyn ProviderAdapter>,
    storage: &Arc<SqliteStorage>,
) -> Result<QuizGenerator, QuizforgeError> {
    let selector = Arc::new(ModelSelector::new());
    let ledger = build_ledger(storage, selector.clone()).await?;
    let policy = GenerationPolicy::from_config(&config.generation);

    info!(
        backends = policy.backends.len(),
        fallback = policy.fallback_enabled,
        max_retries = policy.max_retries,
        daily_limit = config.quota.daily_limit,
        "generation engine ready"
    );

    let engine = Arc::new(GenerationEngine::new(provider, selector, ledger, policy));
    let activity: Arc<dyn ActivityLog> = storage.clone();
    Ok(QuizGenerator::new(engine, activity, config.quota.daily_limit))
}
