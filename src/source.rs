/**
 * Decide where the questions for a new quiz come from: the generation service when one
 * is configured and answers, the local generator otherwise.
 *
 * Author:  mcq contributors
 * Version: October 2026
 */
use log::{debug, warn};

use super::common::Result;
use super::generator::{self, Shuffle};
use super::model::{Question, QuizConfig};
use super::remote::ApiClient;

/// A remote source of questions.
pub trait RemoteSource {
    fn generate(&self, config: &QuizConfig) -> Result<Vec<Question>>;

    fn generate_from_text(&self, text: &str, count: usize) -> Result<Vec<Question>>;
}

impl RemoteSource for ApiClient {
    fn generate(&self, config: &QuizConfig) -> Result<Vec<Question>> {
        ApiClient::generate(self, config)
    }

    fn generate_from_text(&self, text: &str, count: usize) -> Result<Vec<Question>> {
        ApiClient::generate_from_text(self, text, count)
    }
}

/// Where the questions of a quiz came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Remote,
    Local,
}

/// Return questions for `config`, asking `remote` first if it is given. When `text` is
/// given, the service is asked for questions about the text instead of the topic.
///
/// Any failure of the service, including an answer without a single usable question,
/// falls back to the local generator with the same parameters.
pub fn fetch_questions<R: RemoteSource, S: Shuffle>(
    remote: Option<&R>,
    config: &QuizConfig,
    text: Option<&str>,
    shuffler: &mut S,
) -> (Vec<Question>, Origin) {
    if let Some(remote) = remote {
        let result = match text {
            Some(text) => remote.generate_from_text(text, config.count),
            None => remote.generate(config),
        };

        match result {
            Ok(questions) if !questions.is_empty() => {
                debug!("received {} questions from the generation service", questions.len());
                return (questions, Origin::Remote);
            }
            Ok(_) => {
                warn!("generation service returned no usable questions; generating locally");
            }
            Err(e) => {
                warn!("{}; generating locally", e);
            }
        }
    }

    (generator::generate(config, shuffler), Origin::Local)
}
