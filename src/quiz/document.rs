use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fs, io, path::Path};

use super::error::LoadError;
use super::validate::{validate, ValidationResult};

/// A validated quiz. Every way of building one, deserializing included, runs
/// the validator, so `mode >= 1`, there is at least one question and every
/// `correct` index points at an existing answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct QuizDocument {
    title: String,
    mode: usize,
    questions: Vec<QuestionSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionSpec {
    /// question text, may contain markup
    question: String,

    answers: Vec<String>,

    /// 1-based index into `answers`
    correct: usize,
}

impl QuizDocument {
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Number of rotating participants, 1 for single player.
    pub fn mode(&self) -> usize {
        self.mode
    }

    pub fn questions(&self) -> &[QuestionSpec] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub(crate) fn from_value(value: Value) -> Result<Self, LoadError> {
        if let ValidationResult::Invalid(violations) = validate(&value) {
            return Err(LoadError::Invalid(violations));
        }
        let raw: RawDocument = serde_json::from_value(value)?;
        Ok(Self {
            title: raw.title,
            mode: raw.mode,
            questions: raw
                .questions
                .into_iter()
                .map(|q| QuestionSpec {
                    question: q.question,
                    answers: q.answers,
                    correct: q.correct,
                })
                .collect(),
        })
    }

    /// Pretty printed JSON with 4-space indentation.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        to_pretty_json(self)
    }
}

impl TryFrom<Value> for QuizDocument {
    type Error = LoadError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

/// Shape of a document as read from JSON, before validation.
#[derive(Deserialize)]
struct RawDocument {
    title: String,
    mode: usize,
    questions: Vec<RawQuestion>,
}

#[derive(Deserialize)]
struct RawQuestion {
    question: String,
    answers: Vec<String>,
    correct: usize,
}

impl QuestionSpec {
    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    /// The correct answer as stored in the document (1-based).
    pub fn correct(&self) -> usize {
        self.correct
    }

    /// The correct answer as a 0-based index into [`answers`](Self::answers).
    pub fn correct_index(&self) -> usize {
        self.correct - 1
    }

    pub fn is_correct(&self, answer: usize) -> bool {
        answer == self.correct_index()
    }
}

/// Parses raw text into a validated quiz document.
pub fn parse_document(raw: &str) -> Result<QuizDocument, LoadError> {
    if raw.trim().is_empty() {
        return Err(LoadError::Empty);
    }

    let value: Value = serde_json::from_str(raw)?;
    QuizDocument::from_value(value)
}

pub fn load_file(path: impl AsRef<Path>) -> io::Result<String> {
    let path = path.as_ref();
    log::info!("Load quiz \"{}\" ...", path.display());
    fs::read_to_string(path)
}

pub(crate) fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
