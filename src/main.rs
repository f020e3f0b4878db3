use anyhow::{Context, Result};
use serde::Serialize;
use std::env;
use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use jsquiz::quiz::{dispatch, load_file, Command, Controller, Event, Key, Phase, ScoreRow};
use terminal::Terminal;

mod terminal;

const USAGE: &str = "Usage: cargo run [quiz_file] [--results <file>] [--raw]";

pub struct Config {
    /// quiz to load on startup, falls back to `QUIZ_FILE`
    pub quiz_file: Option<PathBuf>,

    /// where to write the score table as YAML when a quiz finishes
    pub results: Option<PathBuf>,

    /// print question markup verbatim
    pub raw: bool,
}

fn parse_config(mut args: impl Iterator<Item = String>) -> Result<Config> {
    let mut quiz_file = None;
    let mut results = None;
    let mut raw = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--results" => {
                let path = args.next().context("--results requires a path")?;
                results = Some(PathBuf::from(path));
            }
            "--raw" => raw = true,
            flag if flag.starts_with("--") => anyhow::bail!("unknown argument: {}", flag),
            _ if quiz_file.is_none() => quiz_file = Some(PathBuf::from(&arg)),
            _ => anyhow::bail!("unexpected argument: {}", arg),
        }
    }

    let quiz_file = quiz_file.or_else(|| env::var_os("QUIZ_FILE").map(PathBuf::from));

    Ok(Config {
        quiz_file,
        results,
        raw,
    })
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    let config = match parse_config(env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", USAGE);
            return Err(e);
        }
    };

    let mut terminal = Terminal::new(config.raw)?;
    let mut controller = Controller::new();

    if let Some(path) = &config.quiz_file {
        open_quiz(&mut controller, path);
    }
    render_events(&mut controller, &mut terminal, &config)?;

    let mut awaiting_path = false;
    terminal.prompt(controller.phase(), controller.can_start())?;

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read input")?;

        if awaiting_path {
            awaiting_path = false;
            let path = line.trim();
            if !path.is_empty() {
                open_quiz(&mut controller, Path::new(path));
            }
        } else {
            match Key::from_line(&line) {
                Some(Key::Escape) if controller.phase() == Phase::Intro => break,
                Some(key) => match key.command(controller.phase()) {
                    Some(Command::Open) => {
                        awaiting_path = true;
                        terminal.ask_path()?;
                        continue;
                    }
                    Some(command) => {
                        if let Err(reason) = dispatch(&mut controller, command) {
                            terminal.refused(reason);
                        }
                    }
                    None => log::debug!("no command for {:?}", key),
                },
                None => log::debug!("ignoring input {:?}", line),
            }
        }

        render_events(&mut controller, &mut terminal, &config)?;
        terminal.prompt(controller.phase(), controller.can_start())?;
    }

    println!();
    Ok(())
}

/// Reads a quiz file and hands it to the controller. Failures are reported
/// through the controller's events.
fn open_quiz(controller: &mut Controller, path: &Path) {
    let ticket = controller.request_load();
    if let Err(e) = controller.deliver(ticket, load_file(path)) {
        log::debug!("load of {} failed: {}", path.display(), e);
    }
}

fn render_events(controller: &mut Controller, terminal: &mut Terminal, config: &Config) -> Result<()> {
    for event in controller.take_events() {
        terminal.render(&event).context("failed to write to terminal")?;

        if let (Event::Finished(rows), Some(path)) = (&event, &config.results) {
            let title = controller
                .session()
                .map(|s| s.document().title().to_string())
                .unwrap_or_default();
            write_results(path, &title, rows).context("failed to write results")?;
            println!("results written to {}", path.display());
        }
    }
    Ok(())
}

#[derive(Serialize, Debug)]
struct ResultSheet<'a> {
    title: &'a str,
    scores: &'a [ScoreRow],
}

fn write_results(path: &Path, title: &str, rows: &[ScoreRow]) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)
        .context(format!("failed to open {}", path.display()))?;

    let content = serde_yaml_ng::to_string(&ResultSheet {
        title,
        scores: rows,
    })
    .context("failed to serialize results")?;
    write!(file, "{}", content).context("failed to write results")?;

    Ok(())
}
