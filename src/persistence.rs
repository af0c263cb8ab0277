/**
 * Functions and data structures for reading and writing the history and the last quiz
 * in the application's data directory.
 *
 * Author:  mcq contributors
 * Version: October 2026
 */
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::common::{QuizError, Result};
use super::history::{HistoryEntry, MAX_HISTORY};
use super::model::{Question, QuizConfig};

const HISTORY_FILE: &str = "history.json";
const LAST_QUIZ_FILE: &str = "last_quiz.json";

/// A snapshot of the most recently generated quiz.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LastQuiz {
    #[serde(flatten)]
    pub config: QuizConfig,
    pub questions: Vec<Question>,
}

/// Return the data directory, creating it if it does not exist. `directory` overrides
/// the platform's default location.
pub fn require_app_dir_path(directory: Option<&Path>) -> Result<PathBuf> {
    let path = get_app_dir_path(directory);
    if !path.exists() {
        fs::create_dir_all(&path).or(Err(QuizError::CannotMakeAppDir(path.clone())))?;
    }
    Ok(path)
}

pub fn get_app_dir_path(directory: Option<&Path>) -> PathBuf {
    if let Some(directory) = directory {
        return directory.to_path_buf();
    }

    let mut dirpath = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    dirpath.push("mcq");
    dirpath
}

/// Load the history, most recent entry first. A missing file is an empty history; a file
/// that cannot be read or parsed is an error.
///
/// The file may have been edited by hand, so entries holding a question that cannot be
/// asked are dropped with a warning, and at most `MAX_HISTORY` entries are kept.
pub fn load_history(dir: &Path) -> Result<Vec<HistoryEntry>> {
    let mut history: Vec<HistoryEntry> = match read_json(&dir.join(HISTORY_FILE))? {
        Some(history) => history,
        None => return Ok(Vec::new()),
    };

    history.retain(|entry| {
        for q in entry.questions.iter() {
            if let Err(e) = q.validate() {
                warn!("dropping history entry {}: question {:?}: {}", entry.id, q.prompt, e);
                return false;
            }
        }
        true
    });
    history.truncate(MAX_HISTORY);
    Ok(history)
}

pub fn save_history(dir: &Path, history: &[HistoryEntry]) -> Result<()> {
    write_json(&dir.join(HISTORY_FILE), &history)
}

/// Load the last quiz, or `None` if no quiz has been saved yet. Questions that cannot be
/// asked are dropped with a warning.
pub fn load_last(dir: &Path) -> Result<Option<LastQuiz>> {
    let mut last: LastQuiz = match read_json(&dir.join(LAST_QUIZ_FILE))? {
        Some(last) => last,
        None => return Ok(None),
    };

    last.questions.retain(|q| match q.validate() {
        Ok(()) => true,
        Err(e) => {
            warn!("dropping question {:?} from the last quiz: {}", q.prompt, e);
            false
        }
    });
    Ok(Some(last))
}

pub fn save_last(dir: &Path, last: &LastQuiz) -> Result<()> {
    write_json(&dir.join(LAST_QUIZ_FILE), last)
}

/// `None` if `path` does not exist.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(ref e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(QuizError::CannotReadFile(path.to_path_buf(), e)),
    };
    serde_json::from_str(&data).map(Some).map_err(QuizError::Json)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let serialized = serde_json::to_string_pretty(value).map_err(QuizError::Json)?;
    fs::write(path, serialized).or(Err(QuizError::CannotWriteToFile(path.to_path_buf())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{merge, Candidate, SystemClock};
    use crate::model::Difficulty;
    use std::env;

    #[test]
    fn missing_files_are_empty() {
        let dir = scratch_dir("missing");
        assert_eq!(load_history(&dir).unwrap(), Vec::new());
        assert_eq!(load_last(&dir).unwrap(), None);
    }

    #[test]
    fn history_survives_a_round_trip_through_disk() {
        let dir = scratch_dir("history");
        let history = merge(&[], &candidate(), &SystemClock);
        save_history(&dir, &history).unwrap();
        assert_eq!(load_history(&dir).unwrap(), history);
    }

    #[test]
    fn last_quiz_is_stored_flat() {
        let dir = scratch_dir("last");
        let candidate = candidate();
        let last = LastQuiz {
            config: candidate.config.clone(),
            questions: candidate.questions.clone(),
        };
        save_last(&dir, &last).unwrap();

        let raw = fs::read_to_string(dir.join(LAST_QUIZ_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["topic"], "python");
        assert_eq!(value["count"], 1);

        assert_eq!(load_last(&dir).unwrap(), Some(last));
    }

    #[test]
    fn corrupt_history_is_an_error() {
        let dir = scratch_dir("corrupt");
        fs::write(dir.join(HISTORY_FILE), "not json").unwrap();
        assert!(matches!(load_history(&dir), Err(QuizError::Json(_))));
    }

    #[test]
    fn unreadable_history_is_an_error() {
        let dir = scratch_dir("unreadable");
        // Not valid UTF-8.
        fs::write(dir.join(HISTORY_FILE), &[b'[', 0xff, 0xfe, b']']).unwrap();
        assert!(matches!(load_history(&dir), Err(QuizError::CannotReadFile(_, _))));

        fs::write(dir.join(LAST_QUIZ_FILE), &[0xff]).unwrap();
        assert!(matches!(load_last(&dir), Err(QuizError::CannotReadFile(_, _))));
    }

    #[test]
    fn a_directory_in_place_of_the_history_is_an_error() {
        let dir = scratch_dir("directory");
        fs::create_dir_all(dir.join(HISTORY_FILE)).unwrap();
        assert!(matches!(load_history(&dir), Err(QuizError::CannotReadFile(_, _))));
    }

    #[test]
    fn entries_with_unaskable_questions_are_dropped() {
        let dir = scratch_dir("unaskable");
        let mut history = merge(&[], &candidate(), &SystemClock);
        let good = history[0].clone();

        let mut too_many_options = good.clone();
        too_many_options.id = good.id + 1;
        too_many_options.questions[0].options = (0..30).map(|i| format!("o{}", i)).collect();
        let mut answer_out_of_range = good.clone();
        answer_out_of_range.id = good.id + 2;
        answer_out_of_range.questions[0].answer = 'Q';
        history.insert(0, too_many_options);
        history.insert(0, answer_out_of_range);
        save_history(&dir, &history).unwrap();

        assert_eq!(load_history(&dir).unwrap(), vec![good]);
    }

    #[test]
    fn unaskable_questions_are_dropped_from_the_last_quiz() {
        let dir = scratch_dir("unaskable_last");
        let candidate = candidate();
        let mut bad = candidate.questions[0].clone();
        bad.answer = 'Q';
        let last = LastQuiz {
            config: candidate.config.clone(),
            questions: vec![bad, candidate.questions[0].clone()],
        };
        save_last(&dir, &last).unwrap();

        let loaded = load_last(&dir).unwrap().unwrap();
        assert_eq!(loaded.questions, candidate.questions);
    }

    #[test]
    fn app_dir_is_created_on_demand() {
        let dir = scratch_dir("create").join("nested");
        assert!(!dir.exists());
        let path = require_app_dir_path(Some(&dir)).unwrap();
        assert_eq!(path, dir);
        assert!(dir.exists());
    }

    fn candidate() -> Candidate {
        Candidate {
            config: QuizConfig::new("python", "", Difficulty::Medium, 1).unwrap(),
            questions: vec![Question {
                prompt: String::from("Which keyword is used to create a function in Python?"),
                options: vec![String::from("lambda"), String::from("def")],
                answer: 'B',
                explanation: Some(String::from("Use def to define functions.")),
            }],
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let mut dir = env::temp_dir();
        dir.push(format!("mcq-persistence-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }
}
