// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned model outputs.

use serde_json::{Value, json};

/// A well-formed quiz document with `questions` questions.
pub fn valid_quiz_json(questions: usize) -> String {
    quiz_with_option_count(questions, 4)
}

/// A quiz whose every question has `options` options.
pub fn quiz_with_option_count(questions: usize, options: usize) -> String {
    let questions: Vec<Value> = (0..questions)
        .map(|i| {
            let opts: Vec<String> = (0..options).map(|o| format!("Option {o} for Q{i}")).collect();
            json!({
                "question": format!("Question {} about the topic?", i + 1),
                "options": opts,
                "correct_index": i % options.max(1),
                "explanation": format!("Option {} is correct.", i % options.max(1)),
            })
        })
        .collect();
    json!({
        "title": "Generated Quiz",
        "description": "A quiz produced for tests",
        "questions": questions,
    })
    .to_string()
}

/// `body` wrapped in a Markdown code fence, as chat models like to answer.
pub fn fenced(body: &str) -> String {
    format!("```json\n{body}\n```")
}

/// Output that is not JSON at all.
pub fn prose_reply() -> String {
    "Sure! Here is a quiz about your topic: 1) What is ...".to_string()
}
