use anyhow::Context;
use regex::Regex;
use std::io::{self, Write};

use jsquiz::quiz::{Event, Outcome, Phase, Refused, ScoreRow};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const PROGRESS_WIDTH: usize = 30;

/// Renders controller events as plain terminal text.
pub struct Terminal {
    raw: bool,
    line_break: Regex,
    tag: Regex,
    questions: usize,
    answers: Vec<String>,
}

impl Terminal {
    pub fn new(raw: bool) -> anyhow::Result<Self> {
        Ok(Self {
            raw,
            line_break: Regex::new(r"(?i)<br\s*/?>").context("invalid line break pattern")?,
            tag: Regex::new(r"<[^>]+>").context("invalid tag pattern")?,
            questions: 0,
            answers: Vec::new(),
        })
    }

    pub fn render(&mut self, event: &Event) -> io::Result<()> {
        let mut out = io::stdout().lock();

        match event {
            Event::DocumentAccepted(document) => writeln!(
                out,
                "Loaded {BOLD}{}{RESET} ({} questions). Press Enter to start.",
                document.title(),
                document.len()
            )?,
            Event::DocumentRejected { reasons } => {
                writeln!(out, "Invalid file!")?;
                for reason in reasons {
                    writeln!(out, "  Error: {}", reason)?;
                }
            }
            Event::SessionStarted(document) => {
                self.questions = document.len();
                writeln!(out, "\n=== {BOLD}{}{RESET} ===", document.title())?;
            }
            Event::QuestionEntered {
                index,
                question,
                participant,
            } => {
                writeln!(out)?;
                writeln!(out, "{}", progress_bar(*index, self.questions))?;
                if participant.has_rotation() {
                    writeln!(out, "{BOLD}{}{RESET}", participant.label())?;
                }
                writeln!(out, "{}", self.markup(question.question()))?;
                self.answers = question.answers().to_vec();
                for (i, answer) in self.answers.iter().enumerate() {
                    writeln!(out, "  {}) {}", answer_letter(i), self.markup(answer))?;
                }
            }
            Event::AnswerSelected { answer, .. } => {
                writeln!(out, "selected {})", answer_letter(*answer))?
            }
            Event::AnswerChecked {
                outcome,
                selected,
                correct,
                ..
            } => match (outcome, selected) {
                (Outcome::Correct, _) => writeln!(out, "{BOLD}Correct!{RESET}")?,
                (_, None) => writeln!(
                    out,
                    "No answer given. Correct was {}) {}",
                    answer_letter(*correct),
                    self.answer_text(*correct)
                )?,
                (_, Some(_)) => writeln!(
                    out,
                    "Wrong. Correct was {}) {}",
                    answer_letter(*correct),
                    self.answer_text(*correct)
                )?,
            },
            Event::Navigated { from, to } => log::debug!("moved from question {} to {}", from, to),
            Event::Finished(rows) => {
                writeln!(out, "\n{}", progress_bar(self.questions, self.questions))?;
                write_result_table(&mut out, rows)?;
            }
            Event::Reset => writeln!(out, "\nQuiz reset.")?,
        }

        out.flush()
    }

    pub fn prompt(&self, phase: Phase, can_start: bool) -> io::Result<()> {
        let hint = match phase {
            Phase::Intro if can_start => "[Enter] start  [o] open file  [q] quit",
            Phase::Intro => "[o] open file  [q] quit",
            Phase::InProgress(_) => "[a-h] answer  [Enter] check/next  [<] back  [q] exit",
            Phase::Finished => "[q] retry",
        };
        let mut out = io::stdout().lock();
        write!(out, "{} > ", hint)?;
        out.flush()
    }

    pub fn ask_path(&self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        write!(out, "Quiz file: ")?;
        out.flush()
    }

    pub fn refused(&self, reason: Refused) {
        println!("({})", reason);
    }

    fn answer_text(&self, index: usize) -> String {
        self.answers
            .get(index)
            .map(|a| self.markup(a))
            .unwrap_or_default()
    }

    fn markup(&self, text: &str) -> String {
        if self.raw {
            return text.to_string();
        }
        let text = self.line_break.replace_all(text, "\n");
        let text = self.tag.replace_all(&text, "");
        text.replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&amp;", "&")
    }
}

fn answer_letter(index: usize) -> char {
    char::from(b'a' + (index % 26) as u8)
}

fn progress_bar(position: usize, total: usize) -> String {
    let percent = if total == 0 {
        0
    } else {
        (200 * position + total) / (2 * total)
    };
    let filled = percent * PROGRESS_WIDTH / 100;
    format!(
        "[{}{}] {:3}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_WIDTH - filled),
        percent
    )
}

fn write_result_table(out: &mut impl Write, rows: &[ScoreRow]) -> io::Result<()> {
    let teams = rows.len() > 1;
    if teams {
        writeln!(out, "{BOLD}{:<10}{:<14}{}{RESET}", "Team", "Correct", "Percent")?;
    } else {
        writeln!(out, "{BOLD}{:<14}{}{RESET}", "Correct", "Percent")?;
    }

    for row in rows {
        let correct = format!("{} of {}", row.correct, row.total);
        if teams {
            writeln!(out, "{:<10}{:<14}{}", row.participant, correct, row.percentage)?;
        } else {
            writeln!(out, "{:<14}{}", correct, row.percentage)?;
        }
    }
    Ok(())
}
