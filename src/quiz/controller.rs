//! Navigation state machine driving a quiz session.
//!
//! The controller owns the staged document and the active [`Session`]. Input
//! adapters call its transition methods; renderers drain the [`Event`]s it
//! queues. Illegal transitions are refused with [`Refused`] and leave every
//! piece of state untouched.

use std::io;
use std::mem;
use std::sync::Arc;

use super::document::{parse_document, QuestionSpec, QuizDocument};
use super::error::{LoadError, Refused};
use super::participant::Participant;
use super::score::{compute_scores, ScoreRow};
use super::session::{Outcome, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Intro,
    InProgress(usize),
    Finished,
}

/// What the core reports to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    DocumentAccepted(Arc<QuizDocument>),
    DocumentRejected {
        reasons: Vec<String>,
    },
    SessionStarted(Arc<QuizDocument>),
    QuestionEntered {
        index: usize,
        question: QuestionSpec,
        participant: Participant,
    },
    AnswerSelected {
        index: usize,
        answer: usize,
    },
    AnswerChecked {
        index: usize,
        outcome: Outcome,
        /// the locked in answer, 0-based
        selected: Option<usize>,
        /// the correct answer, 0-based
        correct: usize,
    },
    Navigated {
        from: usize,
        to: usize,
    },
    Finished(Vec<ScoreRow>),
    Reset,
}

/// Handle for a pending document load. Only the most recently issued ticket
/// is honoured on delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug)]
enum State {
    Intro,
    InProgress(Session),
    Finished(Session),
}

#[derive(Debug)]
pub struct Controller {
    state: State,
    staged: Option<Arc<QuizDocument>>,
    issued: u64,
    pending: Option<u64>,
    events: Vec<Event>,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    pub fn new() -> Self {
        Self {
            state: State::Intro,
            staged: None,
            issued: 0,
            pending: None,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        match &self.state {
            State::Intro => Phase::Intro,
            State::InProgress(session) => Phase::InProgress(session.position()),
            State::Finished(_) => Phase::Finished,
        }
    }

    /// The active or finished session.
    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            State::Intro => None,
            State::InProgress(session) | State::Finished(session) => Some(session),
        }
    }

    /// The document `start` would use.
    pub fn staged_document(&self) -> Option<&QuizDocument> {
        self.staged.as_deref()
    }

    pub fn can_start(&self) -> bool {
        matches!(self.state, State::Intro) && self.staged.is_some()
    }

    /// Drains the queued events, oldest first.
    pub fn take_events(&mut self) -> Vec<Event> {
        mem::take(&mut self.events)
    }

    /// Starts a document load, superseding any load still in flight.
    pub fn request_load(&mut self) -> LoadTicket {
        self.issued += 1;
        self.pending = Some(self.issued);
        LoadTicket(self.issued)
    }

    /// Completes a load. Returns `Ok(false)` and changes nothing when the
    /// ticket was superseded. On failure the staged document is dropped so
    /// that `start` stays disabled until a valid document arrives; an active
    /// session is never affected.
    pub fn deliver(
        &mut self,
        ticket: LoadTicket,
        raw: Result<String, io::Error>,
    ) -> Result<bool, LoadError> {
        if self.pending != Some(ticket.0) {
            log::debug!("dropping superseded load #{}", ticket.0);
            return Ok(false);
        }
        self.pending = None;

        match raw.map_err(LoadError::from).and_then(|raw| parse_document(&raw)) {
            Ok(document) => {
                log::info!(
                    "loaded quiz \"{}\" with {} questions",
                    document.title(),
                    document.len()
                );
                let document = Arc::new(document);
                self.staged = Some(Arc::clone(&document));
                self.events.push(Event::DocumentAccepted(document));
                Ok(true)
            }
            Err(e) => {
                log::error!("{}", e);
                self.staged = None;
                self.events.push(Event::DocumentRejected {
                    reasons: e.reasons(),
                });
                Err(e)
            }
        }
    }

    pub fn load_document(&mut self, raw: &str) -> Result<(), LoadError> {
        let ticket = self.request_load();
        self.deliver(ticket, Ok(raw.to_string())).map(|_| ())
    }

    pub fn start(&mut self) -> Result<(), Refused> {
        if !matches!(self.state, State::Intro) {
            return refuse(Refused::SessionActive);
        }
        let Some(document) = self.staged.clone() else {
            return refuse(Refused::NothingLoaded);
        };

        log::info!("Start quiz \"{}\" ...", document.title());
        let session = Session::begin(Arc::clone(&document));
        self.events.push(Event::SessionStarted(document));
        self.state = State::InProgress(session);
        self.enter(0);
        Ok(())
    }

    /// Tentatively selects an answer (0-based) of the active question.
    pub fn select_answer(&mut self, question: usize, answer: usize) -> Result<(), Refused> {
        let session = self.active_mut()?;
        let index = session.position();
        if question != index {
            return refuse(Refused::NotActive { index: question });
        }
        if session.is_checked(index) {
            return refuse(Refused::AlreadyChecked);
        }
        if answer >= session.document().questions()[index].answers().len() {
            return refuse(Refused::NoSuchAnswer { answer });
        }

        session.select(index, answer);
        self.events.push(Event::AnswerSelected { index, answer });
        Ok(())
    }

    /// Locks in the selection of the active question. Without a selection the
    /// question counts as wrong.
    pub fn check(&mut self) -> Result<(), Refused> {
        let session = self.active_mut()?;
        let index = session.position();
        if session.is_checked(index) {
            return refuse(Refused::AlreadyChecked);
        }

        let correct = session.document().questions()[index].correct_index();
        let selected = session.selection(index);
        let outcome = match selected {
            Some(answer) if answer == correct => Outcome::Correct,
            _ => Outcome::Wrong,
        };
        if !matches!(session.record_outcome(index, outcome), Ok(true)) {
            return refuse(Refused::AlreadyChecked);
        }

        log::debug!("question {} checked: {:?}", index, outcome);
        self.events.push(Event::AnswerChecked {
            index,
            outcome,
            selected,
            correct,
        });
        Ok(())
    }

    pub fn next(&mut self) -> Result<(), Refused> {
        let session = self.active()?;
        let index = session.position();
        if !session.is_checked(index) {
            return refuse(Refused::NotChecked);
        }
        if session.is_last(index) {
            return refuse(Refused::AtLast);
        }
        self.navigate(index, index + 1)
    }

    /// Moves back one question. Allowed whether or not the active question
    /// is checked; earlier outcomes stay as they are.
    pub fn previous(&mut self) -> Result<(), Refused> {
        let session = self.active()?;
        let index = session.position();
        if session.is_first(index) {
            return refuse(Refused::AtFirst);
        }
        self.navigate(index, index - 1)
    }

    pub fn finish(&mut self) -> Result<(), Refused> {
        let session = self.active()?;
        let index = session.position();
        if !session.is_checked(index) {
            return refuse(Refused::NotChecked);
        }
        if !session.is_last(index) {
            return refuse(Refused::NotLast);
        }

        let State::InProgress(session) = mem::replace(&mut self.state, State::Intro) else {
            return refuse(Refused::NotInProgress);
        };
        let scores = compute_scores(&session);
        log::info!("quiz \"{}\" finished", session.document().title());
        self.state = State::Finished(session);
        self.events.push(Event::Finished(scores));
        Ok(())
    }

    /// Scores of the current session, available once it is finished.
    pub fn scores(&self) -> Option<Vec<ScoreRow>> {
        match &self.state {
            State::Finished(session) => Some(compute_scores(session)),
            _ => None,
        }
    }

    /// Discards the session and returns to the intro. The staged document is
    /// kept so the same quiz can be started again.
    pub fn exit(&mut self) -> Result<(), Refused> {
        if matches!(self.state, State::Intro) {
            return refuse(Refused::NotInProgress);
        }
        self.state = State::Intro;
        log::info!("quiz reset");
        self.events.push(Event::Reset);
        Ok(())
    }

    fn active(&self) -> Result<&Session, Refused> {
        match &self.state {
            State::InProgress(session) => Ok(session),
            _ => Err(refused(Refused::NotInProgress)),
        }
    }

    fn active_mut(&mut self) -> Result<&mut Session, Refused> {
        match &mut self.state {
            State::InProgress(session) => Ok(session),
            _ => Err(refused(Refused::NotInProgress)),
        }
    }

    fn navigate(&mut self, from: usize, to: usize) -> Result<(), Refused> {
        self.active_mut()?.set_position(to);
        self.events.push(Event::Navigated { from, to });
        self.enter(to);
        Ok(())
    }

    fn enter(&mut self, index: usize) {
        if let State::InProgress(session) = &self.state {
            let question = session.document().questions()[index].clone();
            self.events.push(Event::QuestionEntered {
                index,
                question,
                participant: session.participant(index),
            });
        }
    }
}

fn refused(reason: Refused) -> Refused {
    log::debug!("transition refused: {}", reason);
    reason
}

fn refuse(reason: Refused) -> Result<(), Refused> {
    Err(refused(reason))
}
