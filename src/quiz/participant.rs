use serde::Serialize;
use std::fmt;

/// One rotation slot among `mode` participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Participant {
    pub slot: usize,
    pub mode: usize,
}

impl Participant {
    pub fn new(slot: usize, mode: usize) -> Self {
        Self { slot, mode }
    }

    /// Whether participants take turns, false in single player mode.
    pub fn has_rotation(&self) -> bool {
        self.mode > 1
    }

    /// "Player" in single player mode, otherwise "Team A", "Team B", ...,
    /// "Team Z", "Team AA".
    pub fn label(&self) -> String {
        if self.has_rotation() {
            format!("Team {}", team_letters(self.slot))
        } else {
            String::from("Player")
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

fn team_letters(slot: usize) -> String {
    let mut letters = Vec::new();
    let mut n = slot + 1;
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}
