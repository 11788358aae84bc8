// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resilience primitives for the Quizforge engine.
//!
//! - [`classifier`]: sorts backend failures into retryable and non-retryable.
//! - [`selector`]: round-robin backend selection with per-backend cooldowns.

pub mod classifier;
pub mod selector;

pub use classifier::{FailureClass, classify, classify_error};
pub use selector::ModelSelector;
