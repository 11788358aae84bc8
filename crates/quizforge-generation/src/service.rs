// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Caller-facing generation service: request checks, quota, engine, activity log.

use std::sync::Arc;

use quizforge_core::{AI_GENERATE_ACTION, ActivityLog, GeneratedQuiz, QuizRequest, QuizforgeError};
use quizforge_usage::QuotaGuard;
use serde::Serialize;
use tracing::{info, warn};

use crate::engine::GenerationEngine;

pub const MIN_QUESTIONS: u32 = 5;
pub const MAX_QUESTIONS: u32 = 50;

/// Clamp a requested question count into the supported range.
pub fn clamp_question_count(count: u32) -> u32 {
    count.clamp(MIN_QUESTIONS, MAX_QUESTIONS)
}

/// A generated quiz plus the caller's allowance left after it.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub quiz: GeneratedQuiz,
    pub remaining: u32,
}

/// Runs one user request through quota check, engine and activity logging.
pub struct QuizGenerator {
    engine: Arc<GenerationEngine>,
    quota: QuotaGuard,
    activity: Arc<dyn ActivityLog>,
    daily_limit: u32,
}

impl QuizGenerator {
    pub fn new(
        engine: Arc<GenerationEngine>,
        activity: Arc<dyn ActivityLog>,
        daily_limit: u32,
    ) -> Self {
        Self {
            engine,
            quota: QuotaGuard::new(activity.clone()),
            activity,
            daily_limit,
        }
    }

    pub fn engine(&self) -> &GenerationEngine {
        &self.engine
    }

    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    /// Generate a quiz for `user_id`.
    ///
    /// The topic must be non-blank and the question count is clamped to
    /// [`MIN_QUESTIONS`]..=[`MAX_QUESTIONS`]. Quota is checked before any
    /// backend is called. A successful generation is logged as an
    /// `"AI Generate"` activity; a failed log write does not fail the request.
    pub async fn generate(
        &self,
        user_id: &str,
        mut request: QuizRequest,
    ) -> Result<GenerationOutcome, QuizforgeError> {
        request.topic = request.topic.trim().to_string();
        if request.topic.is_empty() {
            return Err(QuizforgeError::InvalidRequest("topic must not be empty".into()));
        }
        request.question_count = clamp_question_count(request.question_count);

        let status = self.quota.ensure_available(user_id, self.daily_limit).await?;
        let quiz = self.engine.generate(&request).await?;

        let description = format!(
            "Generated quiz \"{}\" on {} with {}",
            quiz.title, request.topic, quiz.model_used
        );
        let remaining = match self
            .activity
            .record_activity(user_id, AI_GENERATE_ACTION, &description)
            .await
        {
            Ok(()) => match self.quota.check(user_id, self.daily_limit).await {
                Ok(after) => after.remaining,
                Err(_) => status.remaining.saturating_sub(1),
            },
            Err(e) => {
                warn!(user_id, error = %e, "failed to log AI generation activity");
                status.remaining.saturating_sub(1)
            }
        };

        info!(
            user_id,
            model = %quiz.model_used,
            questions = quiz.questions.len(),
            remaining,
            "quiz generated"
        );
        Ok(GenerationOutcome { quiz, remaining })
    }
}
