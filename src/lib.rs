//! Multiple-choice quiz engine.
//!
//! The [`quiz`] module holds the presentation-independent core: document
//! validation, the session model, the navigation state machine and scoring.
//! Renderers drive a [`quiz::Controller`] and consume the [`quiz::Event`]s it
//! queues.

pub mod quiz;
