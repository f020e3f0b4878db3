use serde_json::{Map, Value};
use thiserror::Error;

/// Largest accepted `mode`, enough for teams "A" through "ZZ".
pub const MAX_MODE: u64 = 26 * 27;

/// A single broken shape rule of a quiz document.
///
/// Question indices are 0-based, in document order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("document is empty")]
    EmptyDocument,

    #[error("document is not a record")]
    NotAnObject,

    #[error("title is missing")]
    MissingTitle,

    #[error("mode is missing")]
    MissingMode,

    #[error("mode must be at least 1")]
    ModeNotPositive,

    #[error("mode must be at most {max}")]
    ModeTooLarge { max: u64 },

    #[error("questions are missing")]
    MissingQuestions,

    #[error("question {index} is not a record")]
    QuestionNotAnObject { index: usize },

    #[error("question text for question {index} is missing")]
    MissingQuestionText { index: usize },

    #[error("answers for question {index} are missing")]
    MissingAnswers { index: usize },

    #[error("answer {answer} of question {index} is not text")]
    AnswerNotText { index: usize, answer: usize },

    #[error("correct answer for question {index} is missing or out of range")]
    CorrectOutOfRange { index: usize },
}

impl Violation {
    /// The offending question, if the violation is about one.
    pub fn question_index(&self) -> Option<usize> {
        match self {
            Violation::QuestionNotAnObject { index }
            | Violation::MissingQuestionText { index }
            | Violation::MissingAnswers { index }
            | Violation::AnswerNotText { index, .. }
            | Violation::CorrectOutOfRange { index } => Some(*index),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(Vec<Violation>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn violations(&self) -> &[Violation] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid(violations) => violations,
        }
    }
}

/// Checks a parsed document against the quiz shape.
///
/// Every rule is evaluated so that all violations are reported at once; each
/// one is also logged as a warning.
pub fn validate(value: &Value) -> ValidationResult {
    let violations = collect_violations(value);

    for violation in &violations {
        log::warn!("invalid quiz document: {}", violation);
    }

    if violations.is_empty() {
        ValidationResult::Valid
    } else {
        ValidationResult::Invalid(violations)
    }
}

fn collect_violations(value: &Value) -> Vec<Violation> {
    let doc = match value {
        Value::Object(map) => map,
        Value::Null => return vec![Violation::EmptyDocument],
        Value::Array(items) if items.is_empty() => return vec![Violation::EmptyDocument],
        Value::String(s) if s.is_empty() => return vec![Violation::EmptyDocument],
        _ => return vec![Violation::NotAnObject],
    };

    let mut violations = Vec::new();

    if non_empty_text(doc.get("title")).is_none() {
        violations.push(Violation::MissingTitle);
    }

    match doc.get("mode") {
        Some(Value::Number(n)) if n.as_u64().is_some_and(|m| (1..=MAX_MODE).contains(&m)) => {}
        Some(Value::Number(n)) if n.as_u64().is_some_and(|m| m > MAX_MODE) => {
            violations.push(Violation::ModeTooLarge { max: MAX_MODE })
        }
        Some(Value::Number(n)) if n.as_i64().is_some_and(|m| m <= 0) => {
            violations.push(Violation::ModeNotPositive)
        }
        _ => violations.push(Violation::MissingMode),
    }

    match doc.get("questions").and_then(|q| q.as_array()) {
        Some(questions) if !questions.is_empty() => {
            for (index, question) in questions.iter().enumerate() {
                match question.as_object() {
                    Some(question) => check_question(index, question, &mut violations),
                    None => violations.push(Violation::QuestionNotAnObject { index }),
                }
            }
        }
        _ => violations.push(Violation::MissingQuestions),
    }

    violations
}

fn check_question(index: usize, question: &Map<String, Value>, violations: &mut Vec<Violation>) {
    if non_empty_text(question.get("question")).is_none() {
        violations.push(Violation::MissingQuestionText { index });
    }

    let answers = question
        .get("answers")
        .and_then(|a| a.as_array())
        .filter(|a| !a.is_empty());

    match answers {
        Some(answers) => {
            for (answer, value) in answers.iter().enumerate() {
                if !value.is_string() {
                    violations.push(Violation::AnswerNotText { index, answer });
                }
            }
        }
        None => violations.push(Violation::MissingAnswers { index }),
    }

    let answer_count = answers.map_or(0, |a| a.len() as u64);
    let correct = question.get("correct").and_then(|c| c.as_u64());
    if !correct.is_some_and(|c| c >= 1 && c <= answer_count) {
        violations.push(Violation::CorrectOutOfRange { index });
    }
}

fn non_empty_text(value: Option<&Value>) -> Option<&str> {
    value.and_then(|v| v.as_str()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn violations(value: Value) -> Vec<Violation> {
        validate(&value).violations().to_vec()
    }

    #[test]
    fn test_valid_document() {
        let doc = json!({
            "title": "T",
            "mode": 1,
            "questions": [{"question": "Q1", "answers": ["x", "y"], "correct": 2}]
        });
        assert!(validate(&doc).is_valid());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let doc = json!({
            "title": "T",
            "mode": 2,
            "author": "someone",
            "questions": [{"question": "Q1", "answers": ["x"], "correct": 1, "hint": "?"}]
        });
        assert!(validate(&doc).is_valid());
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(violations(json!([])), vec![Violation::EmptyDocument]);
        assert_eq!(violations(Value::Null), vec![Violation::EmptyDocument]);
        assert_eq!(violations(json!(42)), vec![Violation::NotAnObject]);
    }

    #[test]
    fn test_all_top_level_fields_reported() {
        assert_eq!(
            violations(json!({})),
            vec![
                Violation::MissingTitle,
                Violation::MissingMode,
                Violation::MissingQuestions
            ]
        );
    }

    #[test]
    fn test_mode_zero_and_missing_are_distinct() {
        let zero = json!({"title": "T", "mode": 0, "questions": [{"question": "Q", "answers": ["a"], "correct": 1}]});
        assert_eq!(violations(zero), vec![Violation::ModeNotPositive]);

        let text = json!({"title": "T", "mode": "two", "questions": [{"question": "Q", "answers": ["a"], "correct": 1}]});
        assert_eq!(violations(text), vec![Violation::MissingMode]);
    }

    #[test]
    fn test_negative_and_fractional_mode() {
        let negative = json!({"title": "T", "mode": -1, "questions": [{"question": "Q", "answers": ["a"], "correct": 1}]});
        assert_eq!(violations(negative), vec![Violation::ModeNotPositive]);

        let fractional = json!({"title": "T", "mode": 1.5, "questions": [{"question": "Q", "answers": ["a"], "correct": 1}]});
        assert_eq!(violations(fractional), vec![Violation::MissingMode]);
    }

    #[test]
    fn test_mode_is_capped() {
        let at_cap = json!({"title": "T", "mode": MAX_MODE, "questions": [{"question": "Q", "answers": ["a"], "correct": 1}]});
        assert!(validate(&at_cap).is_valid());

        let huge = json!({"title": "T", "mode": 1_000_000_000u64, "questions": [{"question": "Q", "answers": ["a"], "correct": 1}]});
        assert_eq!(violations(huge), vec![Violation::ModeTooLarge { max: MAX_MODE }]);
    }

    #[test]
    fn test_empty_questions_rejected() {
        let doc = json!({"title": "T", "mode": 1, "questions": []});
        assert_eq!(violations(doc), vec![Violation::MissingQuestions]);
    }

    #[test]
    fn test_correct_out_of_range_names_question() {
        let doc = json!({
            "title": "T",
            "mode": 1,
            "questions": [
                {"question": "Q0", "answers": ["a", "b"], "correct": 1},
                {"question": "Q1", "answers": ["a", "b"], "correct": 0},
                {"question": "Q2", "answers": ["a", "b"], "correct": 3}
            ]
        });
        let found = violations(doc);
        assert_eq!(
            found,
            vec![
                Violation::CorrectOutOfRange { index: 1 },
                Violation::CorrectOutOfRange { index: 2 }
            ]
        );
        assert_eq!(found[0].question_index(), Some(1));
    }

    #[test]
    fn test_every_question_rule_evaluated() {
        let doc = json!({
            "title": "",
            "mode": 1,
            "questions": [{"answers": []}, "nope", {"question": "Q", "answers": ["a", 3], "correct": 1}]
        });
        assert_eq!(
            violations(doc),
            vec![
                Violation::MissingTitle,
                Violation::MissingQuestionText { index: 0 },
                Violation::MissingAnswers { index: 0 },
                Violation::CorrectOutOfRange { index: 0 },
                Violation::QuestionNotAnObject { index: 1 },
                Violation::AnswerNotText { index: 2, answer: 1 },
            ]
        );
    }
}
