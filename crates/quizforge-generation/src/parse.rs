// SPDX-FileCopyrightText: 2026 Quizforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsing and structural validation of raw model output.
//!
//! Any failure here is reported as [`QuizforgeError::MalformedOutput`], which
//! the engine treats as retryable.

use quizforge_core::{GeneratedQuiz, QuizQuestion, QuizforgeError};
use serde_json::{Map, Value};

/// Title used when the model omits one.
pub const DEFAULT_TITLE: &str = "AI Generated Quiz";

const OPTION_COUNT: usize = 4;

/// Remove a surrounding Markdown code fence (```` ``` ```` or ```` ```json ````), if present.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if text.starts_with("```") {
        text = match text.split_once('\n') {
            Some((_, rest)) => rest,
            None => text.trim_start_matches('`'),
        };
    }
    if let Some(body) = text.trim_end().strip_suffix("```") {
        text = body;
    }
    text.trim()
}

/// Parse `raw` output from `backend` into a validated quiz tagged with that backend.
pub fn parse_quiz(raw: &str, backend: &str) -> Result<GeneratedQuiz, QuizforgeError> {
    let malformed = |message: String| QuizforgeError::MalformedOutput {
        backend: backend.to_string(),
        message,
    };

    let body = strip_code_fences(raw);
    let value: Value =
        serde_json::from_str(body).map_err(|e| malformed(format!("invalid JSON: {e}")))?;
    let root = value
        .as_object()
        .ok_or_else(|| malformed("quiz must be a JSON object".to_string()))?;

    let questions = match root.get("questions") {
        Some(Value::Array(items)) => items,
        _ => return Err(malformed("invalid quiz structure: `questions` array missing".into())),
    };
    if questions.is_empty() {
        return Err(malformed("quiz contains zero questions".into()));
    }

    let questions = questions
        .iter()
        .enumerate()
        .map(|(i, q)| parse_question(i + 1, q).map_err(&malformed))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GeneratedQuiz {
        title: string_field(root, "title").unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        description: string_field(root, "description").unwrap_or_default(),
        questions,
        model_used: backend.to_string(),
    })
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Validate one question. `n` is 1-based, for messages.
fn parse_question(n: usize, value: &Value) -> Result<QuizQuestion, String> {
    let obj = value
        .as_object()
        .ok_or_else(|| format!("question {n} is not an object"))?;

    let (Some(question), Some(options), Some(correct)) = (
        obj.get("question"),
        obj.get("options"),
        obj.get("correct_index"),
    ) else {
        return Err(format!("question {n} is missing required fields"));
    };

    let question = question
        .as_str()
        .ok_or_else(|| format!("question {n} text must be a string"))?
        .to_string();

    let options = options
        .as_array()
        .ok_or_else(|| format!("question {n} options must be an array"))?;
    if options.len() != OPTION_COUNT {
        return Err(format!(
            "question {n} must have exactly {OPTION_COUNT} options (got {})",
            options.len()
        ));
    }
    let options: Vec<String> = options
        .iter()
        .map(|o| o.as_str().map(str::to_string))
        .collect::<Option<_>>()
        .ok_or_else(|| format!("question {n} options must be strings"))?;
    let options: [String; OPTION_COUNT] = options
        .try_into()
        .map_err(|_| format!("question {n} must have exactly {OPTION_COUNT} options"))?;

    let correct_index = index_value(correct)
        .filter(|i| (*i as usize) < OPTION_COUNT)
        .ok_or_else(|| format!("question {n} has invalid correct_index"))?;

    let explanation = obj
        .get("explanation")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(QuizQuestion {
        question,
        options,
        correct_index,
        explanation,
    })
}

/// A JSON integer (or integral float such as `2.0`) in `u8` range.
fn index_value(value: &Value) -> Option<u8> {
    if let Some(i) = value.as_u64() {
        return u8::try_from(i).ok();
    }
    let f = value.as_f64()?;
    if f.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(&f) {
        Some(f as u8)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn question(options: Value, correct: Value) -> Value {
        json!({"question": "Q?", "options": options, "correct_index": correct})
    }

    fn quiz(questions: Vec<Value>) -> String {
        json!({"title": "T", "description": "D", "questions": questions}).to_string()
    }

    fn four() -> Value {
        json!(["a", "b", "c", "d"])
    }

    fn message(err: QuizforgeError) -> String {
        match err {
            QuizforgeError::MalformedOutput { message, .. } => message,
            other => panic!("expected MalformedOutput, got {other:?}"),
        }
    }

    #[test]
    fn strips_json_fence() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn strips_bare_fence_and_whitespace() {
        assert_eq!(strip_code_fences("  ```\n{}\n```  \n"), "{}");
    }

    #[test]
    fn leaves_unfenced_text_alone() {
        assert_eq!(strip_code_fences("{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn valid_quiz_parses() {
        let raw = quiz(vec![
            question(four(), json!(0)),
            json!({"question": "Q2", "options": ["w", "x", "y", "z"], "correct_index": 3, "explanation": "because"}),
        ]);
        let parsed = parse_quiz(&raw, "m1").unwrap();
        assert_eq!(parsed.title, "T");
        assert_eq!(parsed.description, "D");
        assert_eq!(parsed.model_used, "m1");
        assert_eq!(parsed.questions.len(), 2);
        assert_eq!(parsed.questions[1].correct_index, 3);
        assert_eq!(parsed.questions[1].explanation.as_deref(), Some("because"));
        assert!(parsed.questions[0].explanation.is_none());
    }

    #[test]
    fn fenced_quiz_parses() {
        let raw = format!("```json\n{}\n```", quiz(vec![question(four(), json!(1))]));
        assert_eq!(parse_quiz(&raw, "m1").unwrap().questions.len(), 1);
    }

    #[test]
    fn missing_title_and_description_get_defaults() {
        let raw = json!({"questions": [question(four(), json!(2))]}).to_string();
        let parsed = parse_quiz(&raw, "m1").unwrap();
        assert_eq!(parsed.title, DEFAULT_TITLE);
        assert_eq!(parsed.description, "");
    }

    #[test]
    fn prose_is_invalid_json() {
        let err = parse_quiz("Here is your quiz!", "m1").unwrap_err();
        assert!(err.is_retryable());
        assert!(message(err).starts_with("invalid JSON"));
    }

    #[test]
    fn missing_questions_is_rejected() {
        let err = parse_quiz(r#"{"title": "T"}"#, "m1").unwrap_err();
        assert!(message(err).contains("`questions` array missing"));
    }

    #[test]
    fn empty_questions_is_rejected() {
        let err = parse_quiz(&quiz(vec![]), "m1").unwrap_err();
        assert_eq!(message(err), "quiz contains zero questions");
    }

    #[test]
    fn three_options_is_rejected() {
        let raw = quiz(vec![question(json!(["a", "b", "c"]), json!(0))]);
        let err = parse_quiz(&raw, "m1").unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(message(err), "question 1 must have exactly 4 options (got 3)");
    }

    #[test]
    fn missing_field_is_rejected() {
        let raw = quiz(vec![
            question(four(), json!(0)),
            json!({"question": "Q?", "options": ["a", "b", "c", "d"]}),
        ]);
        let err = parse_quiz(&raw, "m1").unwrap_err();
        assert_eq!(message(err), "question 2 is missing required fields");
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        for bad in [json!(4), json!(-1), json!("0"), json!(1.5)] {
            let raw = quiz(vec![question(four(), bad.clone())]);
            let err = parse_quiz(&raw, "m1").unwrap_err();
            assert_eq!(
                message(err),
                "question 1 has invalid correct_index",
                "index {bad} should be rejected"
            );
        }
    }

    #[test]
    fn integral_float_index_is_accepted() {
        let raw = quiz(vec![question(four(), json!(2.0))]);
        assert_eq!(parse_quiz(&raw, "m1").unwrap().questions[0].correct_index, 2);
    }

    #[test]
    fn non_string_option_is_rejected() {
        let raw = quiz(vec![question(json!(["a", 2, "c", "d"]), json!(0))]);
        let err = parse_quiz(&raw, "m1").unwrap_err();
        assert_eq!(message(err), "question 1 options must be strings");
    }
}
