// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Quiz generation for the Quizforge engine.
//!
//! - [`prompt`]: the single prompt every backend receives
//! - [`parse`]: fence stripping, JSON parsing and structural validation
//! - [`engine`]: backend rotation with cooldown, fallback and retry budget
//! - [`service`]: the caller-facing entry point (quota, engine, activity log)

pub mod engine;
pub mod parse;
pub mod prompt;
pub mod service;

pub use engine::{GenerationEngine, GenerationPolicy};
pub use parse::{parse_quiz, strip_code_fences};
pub use prompt::build_prompt;
pub use service::{GenerationOutcome, QuizGenerator, clamp_question_count};
