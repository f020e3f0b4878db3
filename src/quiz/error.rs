use thiserror::Error;

use super::validate::Violation;

/// Why a quiz document could not be loaded. A failed load never starts a
/// session.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read quiz file: {0}")]
    Io(#[from] std::io::Error),

    #[error("quiz document is empty")]
    Empty,

    #[error("Cannot parse quiz document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("quiz document is invalid: {}", join_violations(.0))]
    Invalid(Vec<Violation>),
}

impl LoadError {
    /// Human readable reasons, one per violated rule.
    pub fn reasons(&self) -> Vec<String> {
        match self {
            LoadError::Invalid(violations) => violations.iter().map(|v| v.to_string()).collect(),
            other => vec![other.to_string()],
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("question index {index} out of range for quiz with {len} questions")]
    OutOfRange { index: usize, len: usize },
}

/// A transition the controller declined. The controller state is unchanged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refused {
    #[error("no valid quiz document is loaded")]
    NothingLoaded,

    #[error("a quiz session is already active")]
    SessionActive,

    #[error("no quiz is in progress")]
    NotInProgress,

    #[error("question {index} is not the active question")]
    NotActive { index: usize },

    #[error("answer {answer} does not exist")]
    NoSuchAnswer { answer: usize },

    #[error("the answer has already been checked")]
    AlreadyChecked,

    #[error("the answer must be checked first")]
    NotChecked,

    #[error("already at the first question")]
    AtFirst,

    #[error("already at the last question")]
    AtLast,

    #[error("not at the last question")]
    NotLast,
}
