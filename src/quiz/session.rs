use serde::Serialize;
use std::sync::Arc;

use super::document::{QuestionSpec, QuizDocument};
use super::error::SessionError;
use super::participant::Participant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Unanswered,
    Correct,
    Wrong,
}

/// One run of a quiz: the document, the active question and the recorded
/// outcomes. Outcomes only ever move from `Unanswered` to a terminal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    document: Arc<QuizDocument>,
    position: usize,
    answered: Vec<Outcome>,
    selected: Vec<Option<usize>>,
}

impl Session {
    pub fn begin(document: Arc<QuizDocument>) -> Self {
        let len = document.len();
        Self {
            document,
            position: 0,
            answered: vec![Outcome::Unanswered; len],
            selected: vec![None; len],
        }
    }

    pub fn document(&self) -> &QuizDocument {
        &self.document
    }

    pub fn len(&self) -> usize {
        self.answered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answered.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn set_position(&mut self, index: usize) {
        debug_assert!(index < self.len(), "position {index} out of range");
        self.position = index;
    }

    pub fn question_at(&self, index: usize) -> Result<&QuestionSpec, SessionError> {
        self.check_range(index)?;
        Ok(&self.document.questions()[index])
    }

    pub fn is_first(&self, index: usize) -> bool {
        index == 0
    }

    pub fn is_last(&self, index: usize) -> bool {
        index + 1 == self.len()
    }

    /// Round-robin rotation slot of a question.
    pub fn participant_of(&self, index: usize) -> usize {
        index % self.document.mode()
    }

    pub fn participant(&self, index: usize) -> Participant {
        Participant::new(self.participant_of(index), self.document.mode())
    }

    pub fn outcome(&self, index: usize) -> Result<Outcome, SessionError> {
        self.check_range(index)?;
        Ok(self.answered[index])
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.answered
    }

    pub fn is_checked(&self, index: usize) -> bool {
        self.answered
            .get(index)
            .is_some_and(|o| *o != Outcome::Unanswered)
    }

    /// Records the outcome of a question. Returns `false` without touching
    /// anything if the question was already checked.
    pub fn record_outcome(&mut self, index: usize, outcome: Outcome) -> Result<bool, SessionError> {
        self.check_range(index)?;
        if self.answered[index] != Outcome::Unanswered || outcome == Outcome::Unanswered {
            return Ok(false);
        }
        self.answered[index] = outcome;
        Ok(true)
    }

    /// The tentatively selected answer (0-based) of a question.
    pub fn selection(&self, index: usize) -> Option<usize> {
        self.selected.get(index).copied().flatten()
    }

    pub(crate) fn select(&mut self, index: usize, answer: usize) {
        self.selected[index] = Some(answer);
    }

    fn check_range(&self, index: usize) -> Result<(), SessionError> {
        if index < self.len() {
            Ok(())
        } else {
            Err(SessionError::OutOfRange {
                index,
                len: self.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::parse_document;

    fn session(mode: usize, questions: usize) -> Session {
        let questions: Vec<String> = (0..questions)
            .map(|i| format!(r#"{{"question": "Q{i}", "answers": ["a", "b"], "correct": 1}}"#))
            .collect();
        let raw = format!(
            r#"{{"title": "T", "mode": {mode}, "questions": [{}]}}"#,
            questions.join(",")
        );
        Session::begin(Arc::new(parse_document(&raw).unwrap()))
    }

    #[test]
    fn test_begin_starts_unanswered_at_zero() {
        let s = session(1, 4);
        assert_eq!(s.position(), 0);
        assert_eq!(s.len(), 4);
        assert!(s.outcomes().iter().all(|o| *o == Outcome::Unanswered));
        assert!((0..4).all(|i| s.selection(i).is_none()));
    }

    #[test]
    fn test_question_at_out_of_range() {
        let s = session(1, 2);
        assert_eq!(s.question_at(1).unwrap().question(), "Q1");
        assert_eq!(
            s.question_at(2),
            Err(SessionError::OutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_boundaries() {
        let s = session(1, 3);
        assert!(s.is_first(0));
        assert!(!s.is_first(1));
        assert!(s.is_last(2));
        assert!(!s.is_last(1));
    }

    #[test]
    fn test_participant_rotation() {
        let s = session(3, 7);
        let slots: Vec<usize> = (0..7).map(|i| s.participant_of(i)).collect();
        assert_eq!(slots, vec![0, 1, 2, 0, 1, 2, 0]);

        let single = session(1, 3);
        assert!((0..3).all(|i| single.participant_of(i) == 0));
    }

    #[test]
    fn test_outcome_is_immutable_once_recorded() {
        let mut s = session(1, 2);
        assert_eq!(s.record_outcome(0, Outcome::Wrong), Ok(true));
        assert_eq!(s.record_outcome(0, Outcome::Correct), Ok(false));
        assert_eq!(s.outcome(0), Ok(Outcome::Wrong));
        assert!(s.is_checked(0));
        assert!(!s.is_checked(1));
        assert!(s.record_outcome(5, Outcome::Correct).is_err());
    }

    #[test]
    fn test_recording_unanswered_is_ignored() {
        let mut s = session(1, 1);
        assert_eq!(s.record_outcome(0, Outcome::Unanswered), Ok(false));
        assert!(!s.is_checked(0));
    }
}
