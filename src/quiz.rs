mod controller;
mod document;
mod draft;
mod error;
mod keymap;
mod participant;
mod score;
mod session;
mod validate;

pub use controller::{Controller, Event, LoadTicket, Phase};
pub use document::{load_file, parse_document, QuestionSpec, QuizDocument};
pub use draft::{summary, QuestionDraft, QuizDraft};
pub use error::{LoadError, Refused, SessionError};
pub use keymap::{dispatch, Command, Key};
pub use participant::Participant;
pub use score::{compute_scores, Percentage, ScoreRow};
pub use session::{Outcome, Session};
pub use validate::{validate, ValidationResult, Violation, MAX_MODE};
