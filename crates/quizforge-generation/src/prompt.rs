// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt construction for quiz generation.

use quizforge_core::QuizRequest;

/// Placeholder used when the request carries no extra context.
const NO_CONTEXT: &str = "None provided";

/// Build the single prompt sent to every backend for `request`.
///
/// The prompt pins the JSON document shape the parser expects and asks for
/// bare JSON with no Markdown fences or commentary.
pub fn build_prompt(request: &QuizRequest) -> String {
    let context = match request.description.trim() {
        "" => NO_CONTEXT,
        text => text,
    };

    format!(
        r#"You are an expert quiz author.

Write a multiple-choice quiz as one STRICT JSON document with this shape:

{{
  "title": "A short, engaging quiz title",
  "description": "A one-line summary of the quiz",
  "questions": [
    {{
      "question": "The question text",
      "options": ["Option A", "Option B", "Option C", "Option D"],
      "correct_index": 0,
      "explanation": "Why the correct option is right"
    }}
  ]
}}

Requirements:
- Exactly {count} questions
- Difficulty: {difficulty}
- Topic: {topic}
- Additional context: {context}
- Every question has exactly 4 options
- correct_index is 0, 1, 2 or 3
- Respond with the JSON document only: no Markdown, no code fences, no commentary
"#,
        count = request.question_count,
        difficulty = request.difficulty,
        topic = request.topic.trim(),
    )
}
