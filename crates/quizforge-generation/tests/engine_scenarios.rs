// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engine behaviour across backend failure mixes.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use quizforge_core::{Difficulty, QuizRequest, QuizforgeError, UsageStatus, UsageStore};
use quizforge_generation::{GenerationEngine, GenerationPolicy};
use quizforge_resilience::ModelSelector;
use quizforge_storage::SqliteStorage;
use quizforge_test_utils::fixtures::{fenced, prose_reply, quiz_with_option_count, valid_quiz_json};
use quizforge_test_utils::{MemoryUsageStore, MockProvider, MockReply};
use quizforge_usage::UsageLedger;

struct Fixture {
    provider: MockProvider,
    store: MemoryUsageStore,
    selector: Arc<ModelSelector>,
    engine: GenerationEngine,
}

fn policy(backends: &[&str], max_retries: u32) -> GenerationPolicy {
    GenerationPolicy {
        backends: backends.iter().map(|s| s.to_string()).collect(),
        fallback_enabled: true,
        max_retries,
        per_call_timeout: Duration::from_secs(60),
        cooldown: Duration::from_secs(5 * 60),
    }
}

fn fixture(backends: &[&str], max_retries: u32) -> Fixture {
    let provider = MockProvider::new();
    let store = MemoryUsageStore::new();
    let selector = Arc::new(ModelSelector::new());
    let ledger = UsageLedger::new(Arc::new(store.clone()), selector.clone());
    let engine = GenerationEngine::new(
        Arc::new(provider.clone()),
        selector.clone(),
        ledger,
        policy(backends, max_retries),
    );
    Fixture {
        provider,
        store,
        selector,
        engine,
    }
}

fn request() -> QuizRequest {
    QuizRequest::new("Rust ownership", 5, Difficulty::Medium)
}

fn failures_of(err: QuizforgeError) -> (u32, Vec<String>) {
    match err {
        QuizforgeError::AllBackendsFailed { attempts, failures } => {
            (attempts, failures.into_iter().map(|f| f.backend).collect())
        }
        other => panic!("expected AllBackendsFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn first_success_wins_after_retryable_failure() {
    let f = fixture(&["a", "b"], 3);
    f.provider.always("a", MockReply::Fail("429 Too Many Requests".into())).await;
    f.provider.always("b", MockReply::Text(valid_quiz_json(5))).await;

    let quiz = f.engine.generate(&request()).await.unwrap();

    assert_eq!(quiz.model_used, "b");
    assert_eq!(f.store.failures("a").await, 1);
    assert_eq!(f.store.successes("b").await, 1);
    assert_eq!(f.store.successes("a").await + f.store.failures("b").await, 0);
    assert!(!f.selector.is_available("a"));
    assert!(f.selector.is_available("b"));
}

#[tokio::test]
async fn non_retryable_failure_short_circuits() {
    let f = fixture(&["a", "b", "c"], 3);
    f.provider
        .always("a", MockReply::Fail("403 PERMISSION_DENIED".into()))
        .await;
    f.provider.always("b", MockReply::Text(valid_quiz_json(5))).await;
    f.provider.always("c", MockReply::Text(valid_quiz_json(5))).await;

    let err = f.engine.generate(&request()).await.unwrap_err();
    let message = err.to_string();
    let (attempts, backends) = failures_of(err);

    assert_eq!(attempts, 1);
    assert_eq!(backends, vec!["a"]);
    assert!(message.contains("a: 403 PERMISSION_DENIED"), "got: {message}");
    assert_eq!(f.provider.calls().await, vec!["a"]);
    // Non-retryable failures are not cooled down.
    assert!(f.selector.is_available("a"));
}

#[tokio::test]
async fn every_backend_failing_yields_aggregate() {
    let f = fixture(&["a", "b"], 3);
    f.provider.always("a", MockReply::Fail("503 overloaded".into())).await;
    f.provider.always("b", MockReply::Text(prose_reply())).await;

    let err = f.engine.generate(&request()).await.unwrap_err();
    let message = err.to_string();
    let (attempts, backends) = failures_of(err);

    assert_eq!(attempts, 2);
    assert_eq!(backends, vec!["a", "b"]);
    assert!(message.contains("after 2 attempt(s)"), "got: {message}");
    assert!(message.contains("b: malformed output: invalid JSON"), "got: {message}");
}

#[tokio::test]
async fn three_option_question_is_retried_elsewhere() {
    let f = fixture(&["a", "b"], 3);
    f.provider
        .always("a", MockReply::Text(quiz_with_option_count(5, 3)))
        .await;
    f.provider.always("b", MockReply::Text(fenced(&valid_quiz_json(5)))).await;

    let quiz = f.engine.generate(&request()).await.unwrap();
    assert_eq!(quiz.model_used, "b");
    assert_eq!(f.store.failures("a").await, 1);
    assert!(!f.selector.is_available("a"), "malformed output cools the backend down");
}

#[tokio::test]
async fn cooled_down_backend_is_skipped() {
    let f = fixture(&["a", "b"], 3);
    f.provider.always("a", MockReply::Text(valid_quiz_json(5))).await;
    f.provider.always("b", MockReply::Text(valid_quiz_json(5))).await;
    f.selector.mark_cooldown("a", Duration::from_secs(300));

    let quiz = f.engine.generate(&request()).await.unwrap();
    assert_eq!(quiz.model_used, "b");
    assert_eq!(f.provider.calls().await, vec!["b"]);
}

#[tokio::test]
async fn all_cooled_down_still_attempts_full_list() {
    let f = fixture(&["a", "b"], 3);
    f.provider.always("a", MockReply::Fail("timeout".into())).await;
    f.provider.always("b", MockReply::Text(valid_quiz_json(5))).await;
    f.selector.mark_cooldown("a", Duration::from_secs(300));
    f.selector.mark_cooldown("b", Duration::from_secs(300));

    let quiz = f.engine.generate(&request()).await.unwrap();
    assert_eq!(quiz.model_used, "b");
    assert_eq!(f.provider.calls().await, vec!["a", "b"]);
}

#[tokio::test(start_paused = true)]
async fn backend_returns_after_cooldown_expires() {
    let f = fixture(&["a", "b"], 3);
    f.provider.push("a", MockReply::Fail("429".into())).await;
    f.provider.always("a", MockReply::Text(valid_quiz_json(5))).await;
    f.provider.always("b", MockReply::Text(valid_quiz_json(5))).await;

    assert_eq!(f.engine.generate(&request()).await.unwrap().model_used, "b");
    assert_eq!(f.engine.generate(&request()).await.unwrap().model_used, "b");

    tokio::time::advance(Duration::from_secs(5 * 60 + 1)).await;
    assert_eq!(f.engine.generate(&request()).await.unwrap().model_used, "a");
}

#[tokio::test]
async fn ledger_failure_does_not_fail_generation() {
    let provider = MockProvider::new();
    provider.always("a", MockReply::Text(valid_quiz_json(5))).await;
    let selector = Arc::new(ModelSelector::new());
    let ledger = UsageLedger::new(
        Arc::new(quizforge_test_utils::FailingUsageStore),
        selector.clone(),
    );
    let engine = GenerationEngine::new(Arc::new(provider), selector, ledger, policy(&["a"], 3));

    let quiz = engine.generate(&request()).await.unwrap();
    assert_eq!(quiz.model_used, "a");
}

#[tokio::test]
async fn photosynthesis_end_to_end_with_sqlite_ledger() {
    let provider = MockProvider::new();
    provider.always("m1", MockReply::Text(prose_reply())).await;
    provider.always("m2", MockReply::Text(valid_quiz_json(10))).await;

    let storage = Arc::new(SqliteStorage::in_memory().await.unwrap());
    let selector = Arc::new(ModelSelector::new());
    let ledger = UsageLedger::new(storage.clone(), selector.clone());
    let engine = GenerationEngine::new(
        Arc::new(provider),
        selector,
        ledger,
        policy(&["m1", "m2"], 3),
    );

    let request = QuizRequest::new("Photosynthesis", 10, Difficulty::Medium);
    let quiz = engine.generate(&request).await.unwrap();

    assert_eq!(quiz.questions.len(), 10);
    assert_eq!(quiz.model_used, "m2");
    for q in &quiz.questions {
        assert_eq!(q.options.len(), 4);
        assert!(q.correct_index < 4);
    }

    let records = storage.usage_for_date(Local::now().date_naive()).await.unwrap();
    let m1 = records.iter().find(|r| r.model_name == "m1").unwrap();
    let m2 = records.iter().find(|r| r.model_name == "m2").unwrap();
    assert!(m1.failure_count >= 1);
    assert_eq!(m1.status, UsageStatus::Degraded);
    assert!(m2.success_count >= 1);
    assert_eq!(m2.status, UsageStatus::Active);
}
