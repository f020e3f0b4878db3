use serde::{Deserialize, Serialize};
use std::fmt::Write;

use super::document::{to_pretty_json, QuizDocument};
use super::error::LoadError;

/// An editable quiz that is not yet known to be valid. Positions and answer
/// numbers in this module are 1-based, the way quiz authors count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizDraft {
    pub title: String,
    pub mode: usize,
    pub questions: Vec<QuestionDraft>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct QuestionDraft {
    pub question: String,
    pub answers: Vec<String>,
    pub correct: usize,
}

impl Default for QuizDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            mode: 1,
            questions: Vec::new(),
        }
    }
}

impl QuizDraft {
    pub fn new(title: &str, mode: usize) -> Self {
        Self {
            title: title.to_string(),
            mode,
            questions: Vec::new(),
        }
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub fn set_mode(&mut self, mode: usize) {
        self.mode = mode;
    }

    /// Inserts a question with its first answer marked correct. `position` is
    /// clamped to the valid range; the actual position is returned.
    pub fn insert_question(&mut self, position: usize, question: QuestionDraft) -> usize {
        let index = clamp_insert(position, self.questions.len());
        self.questions.insert(index, question);
        index + 1
    }

    pub fn remove_question(&mut self, number: usize) -> Option<QuestionDraft> {
        let index = number.checked_sub(1).filter(|i| *i < self.questions.len())?;
        Some(self.questions.remove(index))
    }

    pub fn question_mut(&mut self, number: usize) -> Option<&mut QuestionDraft> {
        self.questions.get_mut(number.checked_sub(1)?)
    }

    /// Pretty printed JSON with 4-space indentation.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        to_pretty_json(self)
    }

    /// Overview of the quiz; `extensive` also lists the answers, marking the
    /// correct one with `(X)`.
    pub fn summary(&self, extensive: bool) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "  Title: {}", self.title);
        let _ = writeln!(out, "  # Groups: {}", self.mode);
        let _ = writeln!(out, "  # Questions: {}", self.questions.len());

        for (i, q) in self.questions.iter().enumerate() {
            let _ = writeln!(out, "    {:2}: {}", i + 1, q.question);
            if extensive {
                for (a, answer) in q.answers.iter().enumerate() {
                    let mark = if a + 1 == q.correct { " (X)" } else { "" };
                    let _ = writeln!(out, "        - {}{}", answer, mark);
                }
            }
        }
        out
    }
}

impl QuestionDraft {
    pub fn new(question: &str, first_answer: &str) -> Self {
        Self {
            question: question.to_string(),
            answers: vec![first_answer.to_string()],
            correct: 1,
        }
    }

    pub fn set_text(&mut self, question: &str) {
        self.question = question.to_string();
    }

    /// Inserts an answer, keeping `correct` on the same answer.
    pub fn insert_answer(&mut self, position: usize, answer: &str) -> usize {
        let index = clamp_insert(position, self.answers.len());
        self.answers.insert(index, answer.to_string());
        if self.correct > index {
            self.correct += 1;
        }
        index + 1
    }

    pub fn edit_answer(&mut self, number: usize, answer: &str) -> bool {
        match number.checked_sub(1).and_then(|i| self.answers.get_mut(i)) {
            Some(slot) => {
                *slot = answer.to_string();
                true
            }
            None => false,
        }
    }

    /// Removes an answer. Removing the correct answer marks the first one
    /// correct.
    pub fn remove_answer(&mut self, number: usize) -> Option<String> {
        let index = number.checked_sub(1).filter(|i| *i < self.answers.len())?;
        let removed = self.answers.remove(index);
        if self.correct > number {
            self.correct -= 1;
        } else if self.correct == number {
            log::warn!("removed the correct answer, marking the first answer as correct");
            self.correct = 1;
        }
        Some(removed)
    }

    pub fn set_correct(&mut self, number: usize) -> bool {
        if number >= 1 && number <= self.answers.len() {
            self.correct = number;
            true
        } else {
            false
        }
    }
}

impl TryFrom<QuizDraft> for QuizDocument {
    type Error = LoadError;

    fn try_from(draft: QuizDraft) -> Result<Self, Self::Error> {
        QuizDocument::from_value(serde_json::to_value(&draft)?)
    }
}

impl From<&QuizDocument> for QuizDraft {
    fn from(document: &QuizDocument) -> Self {
        Self {
            title: document.title().to_string(),
            mode: document.mode(),
            questions: document
                .questions()
                .iter()
                .map(|q| QuestionDraft {
                    question: q.question().to_string(),
                    answers: q.answers().to_vec(),
                    correct: q.correct(),
                })
                .collect(),
        }
    }
}

/// Overview of a validated quiz, see [`QuizDraft::summary`].
pub fn summary(document: &QuizDocument, extensive: bool) -> String {
    QuizDraft::from(document).summary(extensive)
}

fn clamp_insert(position: usize, len: usize) -> usize {
    position.saturating_sub(1).min(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::Violation;

    fn question() -> QuestionDraft {
        let mut q = QuestionDraft::new("Colour of the sky?", "blue");
        q.insert_answer(2, "green");
        q.insert_answer(3, "red");
        q
    }

    #[test]
    fn test_new_question_marks_first_answer() {
        let q = QuestionDraft::new("Q", "a");
        assert_eq!(q.correct, 1);
        assert_eq!(q.answers, vec!["a"]);
    }

    #[test]
    fn test_insert_answer_keeps_correct() {
        let mut q = question();
        q.set_correct(2);
        assert_eq!(q.insert_answer(1, "black"), 1);
        assert_eq!(q.answers, vec!["black", "blue", "green", "red"]);
        assert_eq!(q.correct, 3);

        assert_eq!(q.insert_answer(99, "white"), 5);
        assert_eq!(q.correct, 3);
    }

    #[test]
    fn test_remove_answer_adjusts_correct() {
        let mut q = question();
        q.set_correct(3);
        assert_eq!(q.remove_answer(1).as_deref(), Some("blue"));
        assert_eq!(q.correct, 2);
        assert_eq!(q.answers[q.correct - 1], "red");

        assert_eq!(q.remove_answer(2).as_deref(), Some("red"));
        assert_eq!(q.correct, 1);

        assert_eq!(q.remove_answer(0), None);
        assert_eq!(q.remove_answer(5), None);
    }

    #[test]
    fn test_set_correct_checks_range() {
        let mut q = question();
        assert!(!q.set_correct(0));
        assert!(!q.set_correct(4));
        assert!(q.set_correct(3));
        assert!(q.edit_answer(3, "grey"));
        assert!(!q.edit_answer(4, "x"));
        assert_eq!(q.answers[2], "grey");
    }

    #[test]
    fn test_questions_are_positioned() {
        let mut draft = QuizDraft::new("Quiz", 2);
        assert_eq!(draft.insert_question(5, QuestionDraft::new("second", "x")), 1);
        assert_eq!(draft.insert_question(1, QuestionDraft::new("first", "x")), 1);
        assert_eq!(draft.questions[1].question, "second");

        draft.question_mut(2).unwrap().set_text("last");
        assert_eq!(draft.remove_question(2).unwrap().question, "last");
        assert!(draft.remove_question(2).is_none());
        assert!(draft.question_mut(0).is_none());
    }

    #[test]
    fn test_draft_must_validate() {
        let draft = QuizDraft::default();
        match QuizDocument::try_from(draft) {
            Err(LoadError::Invalid(violations)) => assert_eq!(
                violations,
                vec![Violation::MissingTitle, Violation::MissingQuestions]
            ),
            other => panic!("unexpected result: {other:?}"),
        }

        let mut draft = QuizDraft::new("Sky", 1);
        draft.insert_question(1, question());
        let document = QuizDocument::try_from(draft.clone()).unwrap();
        assert_eq!(QuizDraft::from(&document), draft);
    }

    #[test]
    fn test_lenient_parsing_fills_defaults() {
        let draft: QuizDraft = serde_json::from_str(r#"{"title": "T"}"#).unwrap();
        assert_eq!(draft.mode, 1);
        assert!(draft.questions.is_empty());
    }

    #[test]
    fn test_summary() {
        let mut draft = QuizDraft::new("Sky", 2);
        draft.insert_question(1, question());

        let short = draft.summary(false);
        assert!(short.contains("  Title: Sky\n"));
        assert!(short.contains("  # Groups: 2\n"));
        assert!(short.contains("     1: Colour of the sky?\n"));
        assert!(!short.contains("blue"));

        let full = draft.summary(true);
        assert!(full.contains("        - blue (X)\n"));
        assert!(full.contains("        - green\n"));
    }
}
