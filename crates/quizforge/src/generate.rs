// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `quizforge generate` command implementation.

use std::io::IsTerminal;
use std::sync::Arc;

use colored::Colorize;
use quizforge_config::QuizforgeConfig;
use quizforge_core::{Difficulty, QuizRequest, QuizforgeError};
use quizforge_gemini::GeminiProvider;
use quizforge_generation::GenerationOutcome;

use crate::app;

/// User id generations are counted against when none is given.
pub const DEFAULT_USER: &str = "local";

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub topic: String,
    pub description: String,
    pub questions: u32,
    pub difficulty: Difficulty,
    pub user: String,
    pub json: bool,
    pub plain: bool,
}

/// Runs the `quizforge generate` command.
///
/// The provider is built before the database is opened so a missing API key
/// fails without touching storage.
pub async fn run_generate(
    config: &QuizforgeConfig,
    opts: GenerateOptions,
) -> Result<(), QuizforgeError> {
    let provider = Arc::new(GeminiProvider::new(config)?);
    let storage = app::open_storage(config).await?;
    let generator = app::build_generator(config, provider, &storage).await?;

    let request = QuizRequest::new(opts.topic, opts.questions, opts.difficulty)
        .with_description(opts.description);
    let result = generator.generate(&opts.user, request).await;

    drop(generator);
    if let Ok(storage) = Arc::try_unwrap(storage) {
        storage.close().await?;
    }

    let outcome = result?;
    if opts.json {
        let json = serde_json::to_string_pretty(&outcome)
            .map_err(|e| QuizforgeError::Internal(format!("failed to serialize quiz: {e}")))?;
        println!("{json}");
    } else {
        let use_color = !opts.plain && std::io::stdout().is_terminal();
        print!("{}", render_outcome(&outcome, use_color));
    }
    Ok(())
}

/// Human-readable rendering of a generated quiz with the answer marked.
fn render_outcome(outcome: &GenerationOutcome, use_color: bool) -> String {
    let quiz = &outcome.quiz;
    let mut lines = vec![String::new()];

    if use_color {
        lines.push(format!("  {}", quiz.title.bold()));
    } else {
        lines.push(format!("  {}", quiz.title));
    }
    if !quiz.description.is_empty() {
        lines.push(format!("  {}", quiz.description));
    }
    lines.push(format!("  {}", "-".repeat(35)));

    for (i, q) in quiz.questions.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!("  {}. {}", i + 1, q.question));
        for (j, option) in q.options.iter().enumerate() {
            let label = OPTION_LABELS[j];
            let correct = j == usize::from(q.correct_index);
            lines.push(match (correct, use_color) {
                (true, true) => format!("     {} {label}) {}", "✓".green(), option.green()),
                (true, false) => format!("     * {label}) {option}"),
                (false, _) => format!("       {label}) {option}"),
            });
        }
        if let Some(explanation) = &q.explanation {
            let text = format!("     {explanation}");
            lines.push(if use_color { text.dimmed().to_string() } else { text });
        }
    }

    lines.push(String::new());
    lines.push(format!("  Model:     {}", quiz.model_used));
    lines.push(format!("  Remaining: {} generation(s) today", outcome.remaining));
    lines.push(String::new());
    lines.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizforge_core::{GeneratedQuiz, QuizQuestion};

    fn outcome() -> GenerationOutcome {
        GenerationOutcome {
            quiz: GeneratedQuiz {
                title: "Rust Basics".into(),
                description: "Ownership and borrowing".into(),
                questions: vec![QuizQuestion {
                    question: "Who owns a moved value?".into(),
                    options: ["caller".into(), "callee".into(), "nobody".into(), "both".into()],
                    correct_index: 1,
                    explanation: Some("Moves transfer ownership.".into()),
                }],
                model_used: "gemini-2.5-flash".into(),
            },
            remaining: 4,
        }
    }

    #[test]
    fn plain_rendering_marks_correct_option() {
        let text = render_outcome(&outcome(), false);
        assert!(text.contains("  Rust Basics\n"));
        assert!(text.contains("  1. Who owns a moved value?"));
        assert!(text.contains("     * B) callee"));
        assert!(text.contains("       A) caller"));
        assert!(text.contains("Moves transfer ownership."));
        assert!(text.contains("Model:     gemini-2.5-flash"));
        assert!(text.contains("Remaining: 4 generation(s) today"));
    }

    #[test]
    fn empty_description_is_omitted() {
        let mut outcome = outcome();
        outcome.quiz.description.clear();
        let text = render_outcome(&outcome, false);
        let header: Vec<_> = text.lines().skip(1).take(2).collect();
        assert_eq!(header[0], "  Rust Basics");
        assert!(header[1].starts_with("  ---"));
    }

    #[test]
    fn outcome_json_has_quiz_and_remaining() {
        let json = serde_json::to_value(outcome()).unwrap();
        assert_eq!(json["remaining"], 4);
        assert_eq!(json["quiz"]["model_used"], "gemini-2.5-flash");
        assert_eq!(json["quiz"]["questions"][0]["correct_index"], 1);
    }
}
