use std::env;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use jsquiz::quiz::{load_file, parse_document, summary, LoadError, QuestionDraft, QuizDraft};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const USAGE: &str = "Usage: quiz_tool <command> <file> [args]

Commands:
    check <file>                                   validate a quiz file
    summary <file> [--full]                        print an overview, --full lists answers
    new <file> <title> [mode]                      create an empty quiz
    add <file> <question> <answer>... [--correct N] [--at POS]
                                                   add a question, first answer correct by default
    remove <file> <number>                         remove a question";

#[derive(Debug, PartialEq)]
enum Action {
    Check,
    Summary {
        full: bool,
    },
    New {
        title: String,
        mode: usize,
    },
    Add {
        question: String,
        answers: Vec<String>,
        correct: usize,
        position: Option<usize>,
    },
    Remove {
        number: usize,
    },
}

#[derive(Debug)]
struct Config {
    file: PathBuf,
    action: Action,
}

fn parse_config(mut args: impl Iterator<Item = String>) -> anyhow::Result<Config> {
    let command = args.next().context("a command is required")?;
    let file = PathBuf::from(args.next().context("a quiz file is required")?);
    let rest: Vec<String> = args.collect();

    let action = match command.as_str() {
        "check" => Action::Check,
        "summary" => Action::Summary {
            full: rest.iter().any(|a| a == "--full"),
        },
        "new" => {
            let title = rest.first().context("a title is required")?.to_string();
            let mode = match rest.get(1) {
                Some(mode) => mode.parse().context("mode must be a number")?,
                None => 1,
            };
            Action::New { title, mode }
        }
        "add" => {
            let mut positional = Vec::new();
            let mut correct = 1;
            let mut position = None;
            let mut rest = rest.into_iter();
            while let Some(arg) = rest.next() {
                match arg.as_str() {
                    "--correct" => {
                        correct = rest
                            .next()
                            .context("--correct requires a number")?
                            .parse()
                            .context("invalid --correct")?;
                    }
                    "--at" => {
                        position = Some(
                            rest.next()
                                .context("--at requires a number")?
                                .parse()
                                .context("invalid --at")?,
                        );
                    }
                    _ => positional.push(arg),
                }
            }
            if positional.len() < 2 {
                anyhow::bail!("a question needs its text and at least one answer");
            }
            let question = positional.remove(0);
            Action::Add {
                question,
                answers: positional,
                correct,
                position,
            }
        }
        "remove" => Action::Remove {
            number: rest
                .first()
                .context("a question number is required")?
                .parse()
                .context("invalid question number")?,
        },
        other => anyhow::bail!("unknown command: {}", other),
    };

    Ok(Config { file, action })
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    let config = match parse_config(env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", USAGE);
            return Err(e);
        }
    };

    match config.action {
        Action::Check => check(&config.file),
        Action::Summary { full } => {
            let document = parse_document(&load_file(&config.file)?)
                .context(format!("cannot load {}", config.file.display()))?;
            println!("Summary [ {} ]:", config.file.display());
            print!("{}", summary(&document, full));
            Ok(())
        }
        Action::New { title, mode } => {
            let draft = QuizDraft::new(&title, mode);
            write_draft(&config.file, &draft, true)?;
            println!("created {BOLD}{}{RESET}", config.file.display());
            Ok(())
        }
        Action::Add {
            question,
            answers,
            correct,
            position,
        } => {
            let mut draft = read_draft(&config.file)?;
            let mut answers = answers.iter();
            let first = answers.next().context("missing first answer")?;
            let mut entry = QuestionDraft::new(&question, first);
            for answer in answers {
                entry.insert_answer(usize::MAX, answer);
            }
            if !entry.set_correct(correct) {
                anyhow::bail!(
                    "correct answer {} does not exist, the question has {} answers",
                    correct,
                    entry.answers.len()
                );
            }
            let at = draft.insert_question(position.unwrap_or(usize::MAX), entry);
            write_draft(&config.file, &draft, false)?;
            println!("added question #{} to {BOLD}{}{RESET}", at, config.file.display());
            Ok(())
        }
        Action::Remove { number } => {
            let mut draft = read_draft(&config.file)?;
            let removed = draft
                .remove_question(number)
                .context(format!("there is no question #{}", number))?;
            write_draft(&config.file, &draft, false)?;
            println!("==> Deleted question #{} \"{}\"", number, removed.question);
            Ok(())
        }
    }
}

fn check(file: &Path) -> anyhow::Result<()> {
    let raw = load_file(file)?;
    match parse_document(&raw) {
        Ok(document) => {
            println!(
                "{BOLD}{}{RESET}: \"{}\" is valid ({} questions, {} groups)",
                file.display(),
                document.title(),
                document.len(),
                document.mode()
            );
            Ok(())
        }
        Err(e @ LoadError::Invalid(_)) => {
            for reason in e.reasons() {
                eprintln!("Error: {}", reason);
            }
            Err(e).context(format!("{} is not a valid quiz", file.display()))
        }
        Err(e) => Err(e).context(format!("cannot load {}", file.display())),
    }
}

fn read_draft(file: &Path) -> anyhow::Result<QuizDraft> {
    let raw = fs::read_to_string(file).context(format!("failed to read {}", file.display()))?;
    serde_json::from_str(&raw).context(format!("{} is not a quiz file", file.display()))
}

fn write_draft(file: &Path, draft: &QuizDraft, create: bool) -> anyhow::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true);
    if create {
        options.create_new(true);
    } else {
        options.truncate(true);
    }

    let mut out = options
        .open(file)
        .context(format!("failed to open {}", file.display()))?;
    let content = draft.to_json().context("failed to serialize quiz")?;
    writeln!(out, "{}", content).context(format!("failed to write {}", file.display()))?;
    Ok(())
}
