use serde::Serialize;
use std::fmt;

use super::participant::Participant;
use super::session::{Outcome, Session};

/// Share of correct answers, or `Indeterminate` for a participant without
/// assigned questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Percentage {
    Value(u8),
    Indeterminate,
}

impl Percentage {
    /// `round(100 * correct / total)`, halves rounded up.
    pub fn of(correct: usize, total: usize) -> Self {
        if total == 0 {
            return Percentage::Indeterminate;
        }
        let rounded = (200 * correct + total) / (2 * total);
        Percentage::Value(rounded.min(100) as u8)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Percentage::Value(p) => write!(f, "{}%", p),
            Percentage::Indeterminate => f.write_str("no questions"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreRow {
    pub participant: String,
    #[serde(skip)]
    pub slot: usize,
    pub correct: usize,
    pub total: usize,
    pub percentage: Percentage,
}

/// One row per rotation slot in ascending order; a single row in single
/// player mode.
pub fn compute_scores(session: &Session) -> Vec<ScoreRow> {
    let mode = session.document().mode();

    let mut buckets = vec![(0usize, 0usize); mode];
    for (index, outcome) in session.outcomes().iter().enumerate() {
        let (correct, total) = &mut buckets[session.participant_of(index)];
        *correct += usize::from(*outcome == Outcome::Correct);
        *total += 1;
    }

    buckets
        .into_iter()
        .enumerate()
        .map(|(slot, (correct, total))| ScoreRow {
            participant: Participant::new(slot, mode).label(),
            slot,
            correct,
            total,
            percentage: Percentage::of(correct, total),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::parse_document;
    use std::sync::Arc;

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
    fn test_percentage_rounding() {
        assert_eq!(Percentage::of(1, 1), Percentage::Value(100));
        assert_eq!(Percentage::of(1, 2), Percentage::Value(50));
        assert_eq!(Percentage::of(1, 3), Percentage::Value(33));
        assert_eq!(Percentage::of(2, 3), Percentage::Value(67));
        assert_eq!(Percentage::of(1, 8), Percentage::Value(13));
        assert_eq!(Percentage::of(0, 4), Percentage::Value(0));
        assert_eq!(Percentage::of(0, 0), Percentage::Indeterminate);
    }

    #[test]
    fn test_single_player_has_one_row() {
        let mut s = session(1, 3);
        s.record_outcome(0, Outcome::Correct).unwrap();
        s.record_outcome(1, Outcome::Wrong).unwrap();
        s.record_outcome(2, Outcome::Correct).unwrap();

        let rows = compute_scores(&s);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].participant, "Player");
        assert_eq!((rows[0].correct, rows[0].total), (2, 3));
        assert_eq!(rows[0].percentage, Percentage::Value(67));
    }

    #[test]
    fn test_rows_per_team() {
        let mut s = session(2, 3);
        s.record_outcome(0, Outcome::Correct).unwrap();
        s.record_outcome(1, Outcome::Correct).unwrap();
        s.record_outcome(2, Outcome::Wrong).unwrap();

        let rows = compute_scores(&s);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].participant, "Team A");
        assert_eq!((rows[0].correct, rows[0].total), (1, 2));
        assert_eq!(rows[0].percentage, Percentage::Value(50));
        assert_eq!(rows[1].participant, "Team B");
        assert_eq!((rows[1].correct, rows[1].total), (1, 1));
        assert_eq!(rows[1].percentage, Percentage::Value(100));
    }

    #[test]
    fn test_team_without_questions_is_indeterminate() {
        let s = session(3, 2);
        let rows = compute_scores(&s);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].total, 0);
        assert_eq!(rows[2].percentage, Percentage::Indeterminate);
        assert_eq!(rows[2].percentage.to_string(), "no questions");
    }

    #[test]
    fn test_rotation_wraps_across_many_questions() {
        let mut s = session(3, 7);
        for index in [0, 3, 4, 6] {
            s.record_outcome(index, Outcome::Correct).unwrap();
        }

        let rows = compute_scores(&s);
        let counts: Vec<(usize, usize)> = rows.iter().map(|r| (r.correct, r.total)).collect();
        assert_eq!(counts, vec![(3, 3), (1, 2), (0, 2)]);
        assert_eq!(rows.iter().map(|r| r.total).sum::<usize>(), 7);
        assert_eq!(rows[2].participant, "Team C");
    }

    #[test]
    fn test_unanswered_counts_as_not_correct() {
        let s = session(1, 2);
        let rows = compute_scores(&s);
        assert_eq!((rows[0].correct, rows[0].total), (0, 2));
    }
}
