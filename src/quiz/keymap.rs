//! Translates key presses into controller calls. No quiz rules live here.

use super::controller::{Controller, Phase};
use super::error::Refused;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Space,
    Left,
    Right,
    Backspace,
    PageUp,
    PageDown,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// ask the presentation layer to pick a new quiz file
    Open,
    Start,
    /// select an answer of the active question, 0-based
    Select(usize),
    Forward,
    Back,
    Exit,
}

impl Key {
    /// Reads a typed terminal line: a blank line is Enter, single characters
    /// map to themselves, and a few words name the special keys.
    pub fn from_line(line: &str) -> Option<Key> {
        let line = line.trim();
        let key = match line.to_ascii_lowercase().as_str() {
            "" => Key::Enter,
            "space" => Key::Space,
            "<" | "left" | "prev" => Key::Left,
            ">" | "right" | "next" => Key::Right,
            "pgup" => Key::PageUp,
            "pgdn" => Key::PageDown,
            "bs" | "backspace" => Key::Backspace,
            "esc" | "escape" | "q" | "quit" => Key::Escape,
            _ => {
                let mut chars = line.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c.to_ascii_lowercase()),
                    _ => return None,
                }
            }
        };
        Some(key)
    }

    /// The command this key stands for in the given phase.
    pub fn command(self, phase: Phase) -> Option<Command> {
        match phase {
            Phase::Intro => match self {
                Key::Char('l') | Key::Char('o') => Some(Command::Open),
                Key::Enter | Key::Space => Some(Command::Start),
                _ => None,
            },
            Phase::InProgress(_) | Phase::Finished => match self {
                Key::Char(c @ 'a'..='h') => Some(Command::Select(usize::from(c as u8 - b'a'))),
                Key::Char(c @ '1'..='8') => Some(Command::Select(usize::from(c as u8 - b'1'))),
                Key::Right | Key::Enter | Key::Space | Key::PageDown => Some(Command::Forward),
                Key::Left | Key::Backspace | Key::PageUp => Some(Command::Back),
                Key::Escape => Some(Command::Exit),
                _ => None,
            },
        }
    }
}

/// Applies a command to the controller.
///
/// `Forward` means whichever of next, finish and check is enabled, `Back` on
/// the first question leaves the quiz. `Open` has no core counterpart; it is
/// accepted on the intro so the caller can show its file picker.
pub fn dispatch(controller: &mut Controller, command: Command) -> Result<(), Refused> {
    match command {
        Command::Open if controller.phase() == Phase::Intro => Ok(()),
        Command::Open => Err(Refused::SessionActive),
        Command::Start => controller.start(),
        Command::Select(answer) => match controller.phase() {
            Phase::InProgress(index) => controller.select_answer(index, answer),
            _ => Err(Refused::NotInProgress),
        },
        Command::Forward => controller
            .next()
            .or_else(|_| controller.finish())
            .or_else(|_| controller.check()),
        Command::Back => match controller.phase() {
            Phase::InProgress(0) => controller.exit(),
            _ => controller.previous(),
        },
        Command::Exit => controller.exit(),
    }
}
