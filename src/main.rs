/**
 * Generate multiple-choice quizzes and take them from the command line.
 *
 * Author:  mcq contributors
 * Version: October 2026
 */
#[macro_use]
mod iohelper;
mod common;
mod generator;
mod history;
mod model;
mod persistence;
mod remote;
mod session;
mod source;
mod ui;

use std::fs;
use std::path::Path;

use colored::*;
use log::{debug, warn};
use structopt::StructOpt;

use common::{Command, HistoryOptions, Options, QuizError, Result, RetakeOptions, TakeOptions};
use generator::RandomShuffle;
use history::{Candidate, SystemClock};
use model::{Question, QuizConfig};
use persistence::LastQuiz;
use remote::ApiClient;
use session::Session;
use source::Origin;
use ui::CmdUI;

fn main() {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    let options = Options::from_args();
    if options.no_color {
        colored::control::set_override(false);
    }

    let result = persistence::require_app_dir_path(options.directory.as_deref())
        .and_then(|dir| run(&options, &dir));

    if let Err(e) = result {
        if !common::is_broken_pipe(&e) {
            eprintln!("{}: {}", "Error".red(), e);
            ::std::process::exit(2);
        }
    }
}

fn run(options: &Options, dir: &Path) -> Result<()> {
    match &options.cmd {
        Command::Take(take) => main_take(options, dir, take),
        Command::History(history) => main_history(options, dir, history),
        Command::Retake(retake) => main_retake(dir, retake),
        Command::Last => main_last(dir),
    }
}

/// The main function for the `take` subcommand.
fn main_take(options: &Options, dir: &Path, take: &TakeOptions) -> Result<()> {
    let config = QuizConfig::new(&take.topic, &take.subtopics, take.difficulty, take.count)?;
    let text = if let Some(text) = &take.text {
        Some(text.clone())
    } else if let Some(path) = &take.text_file {
        Some(fs::read_to_string(path).map_err(QuizError::Io)?)
    } else {
        None
    };

    let mut shuffler = match options.seed {
        Some(seed) => RandomShuffle::seeded(seed),
        None => RandomShuffle::new(),
    };
    let client = api_client(options);
    let (mut questions, origin) =
        source::fetch_questions(client.as_ref(), &config, text.as_deref(), &mut shuffler);
    if !take.in_order {
        questions = generator::shuffle_questions(&questions, &mut shuffler);
    }

    record(dir, &config, &questions);
    save_last(dir, &config, &questions);

    let heading = match origin {
        Origin::Remote => format!("Quiz on {} ({})", config.topic, config.difficulty),
        Origin::Local => format!(
            "Quiz on {} ({}, generated offline)",
            config.topic, config.difficulty
        ),
    };
    take_quiz(&heading, config, questions)
}

/// The main function for the `history` subcommand.
fn main_history(options: &Options, dir: &Path, opts: &HistoryOptions) -> Result<()> {
    let mut history = None;
    if opts.remote {
        match api_client(options) {
            Some(client) => match client.history() {
                Ok(remote) => history = Some(remote),
                Err(e) => warn!("{}; showing local history", e),
            },
            None => warn!("no generation service configured; showing local history"),
        }
    }

    let mut history = match history {
        Some(history) => history,
        None => persistence::load_history(dir)?,
    };
    if let Some(n) = opts.num_to_show {
        history.truncate(n);
    }

    CmdUI::new().history(&history)
}

/// The main function for the `retake` subcommand. The entry is promoted to the front of
/// the history, as if it had just been generated.
fn main_retake(dir: &Path, opts: &RetakeOptions) -> Result<()> {
    let history = persistence::load_history(dir)?;
    let entry = history::find(&history, opts.id)
        .cloned()
        .ok_or(QuizError::EntryNotFound(opts.id))?;

    let config = entry.config();
    let candidate = Candidate {
        config: config.clone(),
        questions: entry.questions.clone(),
    };
    let updated = history::merge(&history, &candidate, &SystemClock);
    if let Err(e) = persistence::save_history(dir, &updated) {
        warn!("could not save history: {}", e);
    }
    save_last(dir, &config, &entry.questions);

    let heading = format!("Quiz on {} ({})", config.topic, config.difficulty);
    take_quiz(&heading, config, entry.questions)
}

/// The main function for the `last` subcommand.
fn main_last(dir: &Path) -> Result<()> {
    let last = persistence::load_last(dir)?.ok_or(QuizError::NoLastQuiz)?;
    let heading = format!("Quiz on {} ({})", last.config.topic, last.config.difficulty);
    take_quiz(&heading, last.config, last.questions)
}

fn take_quiz(heading: &str, config: QuizConfig, questions: Vec<Question>) -> Result<()> {
    let mut ui = CmdUI::new();
    ui.instructions(heading)?;
    let mut session = Session::new(config, questions);
    let result = session.take(&mut ui)?;
    debug!(
        "{}: {} of {} answered correctly at {}",
        session.config.topic, result.total_correct, result.total, result.time_finished
    );
    Ok(())
}

/// Build a client for the generation service, unless `--local` was given or no service
/// is configured.
fn api_client(options: &Options) -> Option<ApiClient> {
    if options.local {
        return None;
    }

    let base = options.api_base.as_ref()?;
    match ApiClient::new(base) {
        Ok(client) => Some(client),
        Err(e) => {
            warn!("{}; generating locally", e);
            None
        }
    }
}

/// Add the quiz to the history. Failing to do so does not stop the quiz.
fn record(dir: &Path, config: &QuizConfig, questions: &[Question]) {
    let history = match persistence::load_history(dir) {
        Ok(history) => history,
        Err(e) => {
            // Leave an unreadable file alone rather than overwrite it.
            warn!("could not load history, not recording this quiz: {}", e);
            return;
        }
    };

    let candidate = Candidate {
        config: config.clone(),
        questions: questions.to_vec(),
    };
    let updated = history::merge(&history, &candidate, &SystemClock);
    if let Err(e) = persistence::save_history(dir, &updated) {
        warn!("could not save history: {}", e);
    }
}

fn save_last(dir: &Path, config: &QuizConfig, questions: &[Question]) {
    let last = LastQuiz {
        config: config.clone(),
        questions: questions.to_vec(),
    };
    if let Err(e) = persistence::save_last(dir, &last) {
        warn!("could not save the last quiz: {}", e);
    }
}
