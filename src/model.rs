/**
 * The data model shared by the generator, the history and the quiz session: questions,
 * quiz configurations and the letter labels that tie answers to options.
 *
 * Author:  mcq contributors
 * Version: October 2026
 */
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::common::{QuizError, Result};

/// The largest number of questions a single quiz may ask for.
pub const MAX_COUNT: i64 = 50;
/// Options are labelled `A` through `Z`.
pub const MAX_OPTIONS: usize = 26;

/// Represents a multiple-choice question.
///
/// The field order is significant: history entries are compared by their serialized
/// questions, so it must stay fixed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// The text of the question. It may contain simple markup, which is shown verbatim.
    pub prompt: String,
    /// Candidate answers, labelled by position.
    pub options: Vec<String>,
    /// The label of the correct option, e.g. `'C'` for `options[2]`.
    pub answer: char,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Mixed,
}

/// The parameters that a quiz is generated from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    pub topic: String,
    #[serde(default)]
    pub subtopics: String,
    pub difficulty: Difficulty,
    pub count: usize,
}

impl QuizConfig {
    /// Validate the raw parameters of a quiz. The topic is trimmed and must not be empty;
    /// `count` must lie between 1 and `MAX_COUNT`.
    pub fn new(topic: &str, subtopics: &str, difficulty: Difficulty, count: i64) -> Result<Self> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(QuizError::InvalidConfiguration(String::from(
                "topic must not be empty",
            )));
        }

        if count < 1 || count > MAX_COUNT {
            return Err(QuizError::InvalidConfiguration(format!(
                "count must be between 1 and {}, got {}",
                MAX_COUNT, count
            )));
        }

        Ok(QuizConfig {
            topic: String::from(topic),
            subtopics: String::from(subtopics.trim()),
            difficulty,
            count: count as usize,
        })
    }
}

impl Question {
    /// Check that the question has between 2 and `MAX_OPTIONS` options and that its
    /// answer label points at one of them.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.options.len() < 2 {
            return Err(format!("expected at least 2 options, got {}", self.options.len()));
        }
        if self.options.len() > MAX_OPTIONS {
            return Err(format!(
                "expected at most {} options, got {}",
                MAX_OPTIONS,
                self.options.len()
            ));
        }
        match index_for(self.answer) {
            Some(i) if i < self.options.len() => Ok(()),
            _ => Err(format!(
                "answer '{}' does not label one of {} options",
                self.answer,
                self.options.len()
            )),
        }
    }

    /// The text of the correct option.
    pub fn correct_option(&self) -> Option<&str> {
        index_for(self.answer)
            .and_then(|i| self.options.get(i))
            .map(|s| s.as_str())
    }
}

/// Return the label of the option at position `index`, e.g. 0 -> 'A'. `None` past the
/// last letter.
pub fn label_for(index: usize) -> Option<char> {
    if index < MAX_OPTIONS {
        Some((b'A' + index as u8) as char)
    } else {
        None
    }
}

/// Return the position labelled by `label`, accepting lower case. `None` if `label` is
/// not a letter.
pub fn index_for(label: char) -> Option<usize> {
    let upper = label.to_ascii_uppercase();
    if upper.is_ascii_uppercase() {
        Some((upper as u8 - b'A') as usize)
    } else {
        None
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "mixed" => Ok(Difficulty::Mixed),
            _ => Err(format!(
                "unknown difficulty '{}' (expected easy, medium, hard or mixed)",
                s
            )),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Mixed => "Mixed",
        };
        write!(f, "{}", name)
    }
}
