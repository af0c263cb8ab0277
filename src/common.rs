/**
 * Definitions of data structures used by several modules, such as `QuizError` and the
 * various structs that hold command-line arguments.
 *
 * Author:  mcq contributors
 * Version: October 2026
 */
use std::io;
use std::path::PathBuf;

use structopt::StructOpt;
use thiserror::Error;

use super::model::Difficulty;

pub type Result<T> = ::std::result::Result<T, QuizError>;

#[derive(Debug, Error)]
pub enum QuizError {
    /// For an empty topic, or a question count outside the accepted range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// For transport failures and non-success responses from the generation service.
    #[error("remote service unavailable ({0})")]
    RemoteUnavailable(String),
    /// For JSON errors.
    #[error("could not parse JSON ({0})")]
    Json(serde_json::Error),
    /// For files that exist but cannot be read, e.g. for lack of permission.
    #[error("cannot read file '{}' ({})", .0.to_string_lossy(), .1)]
    CannotReadFile(PathBuf, io::Error),
    #[error("cannot write to file '{}'", .0.to_string_lossy())]
    CannotWriteToFile(PathBuf),
    #[error("unable to create application directory at {}", .0.to_string_lossy())]
    CannotMakeAppDir(PathBuf),
    #[error("IO error ({0})")]
    Io(io::Error),
    #[error("could not find history entry with id {0}")]
    EntryNotFound(u64),
    #[error("no previous quiz has been saved")]
    NoLastQuiz,
    #[error("no questions found")]
    EmptyQuiz,
    #[error("")]
    ReadlineInterrupted,
}

pub fn is_broken_pipe(e: &QuizError) -> bool {
    if let QuizError::Io(e) = e {
        if let io::ErrorKind::BrokenPipe = e.kind() {
            return true;
        }
    }
    false
}

/// Holds the command-line configuration for the application.
#[derive(StructOpt)]
#[structopt(name = "mcq", about = "Generate and take multiple-choice quizzes.")]
pub struct Options {
    /// Keep history and the last quiz in a particular directory.
    #[structopt(short = "d", long = "directory", parse(from_os_str))]
    pub directory: Option<PathBuf>,
    /// Do not emit colorized output.
    #[structopt(long = "no-color")]
    pub no_color: bool,
    /// Base URL of the question generation service, e.g. https://example.com/api
    #[structopt(long = "api", env = "MCQ_API_BASE")]
    pub api_base: Option<String>,
    /// Never contact the generation service.
    #[structopt(long = "local")]
    pub local: bool,
    /// Seed the random number generator, for reproducible quizzes.
    #[structopt(long = "seed")]
    pub seed: Option<u64>,
    #[structopt(subcommand)]
    pub cmd: Command,
}

#[derive(StructOpt)]
pub enum Command {
    /// Generate a new quiz and take it.
    #[structopt(name = "take")]
    Take(TakeOptions),
    /// List previously generated quizzes.
    #[structopt(name = "history")]
    History(HistoryOptions),
    /// Take a quiz from the history again.
    #[structopt(name = "retake")]
    Retake(RetakeOptions),
    /// Take the most recent quiz again.
    #[structopt(name = "last")]
    Last,
}

#[derive(StructOpt)]
pub struct TakeOptions {
    /// The topic of the quiz.
    #[structopt(default_value = "python")]
    pub topic: String,
    /// Narrow the topic down, e.g. "decorators, generators".
    #[structopt(long = "subtopics", default_value = "")]
    pub subtopics: String,
    /// One of 'easy', 'medium', 'hard' or 'mixed'.
    #[structopt(long = "difficulty", default_value = "mixed")]
    pub difficulty: Difficulty,
    /// Number of questions to generate.
    #[structopt(short = "n", default_value = "5", allow_hyphen_values = true)]
    pub count: i64,
    /// Generate questions from this source text instead of the topic.
    #[structopt(long = "text")]
    pub text: Option<String>,
    /// Generate questions from the contents of a file instead of the topic.
    #[structopt(long = "text-file", parse(from_os_str), conflicts_with = "text")]
    pub text_file: Option<PathBuf>,
    /// Ask the questions in the order they were generated.
    #[structopt(long = "in-order")]
    pub in_order: bool,
}

#[derive(StructOpt)]
pub struct HistoryOptions {
    /// Only show the first `n` entries.
    #[structopt(short = "n")]
    pub num_to_show: Option<usize>,
    /// Ask the generation service for its history instead of reading the local file.
    #[structopt(long = "remote")]
    pub remote: bool,
}

#[derive(StructOpt)]
pub struct RetakeOptions {
    /// The id of the history entry, as printed by `mcq history`.
    pub id: u64,
}
