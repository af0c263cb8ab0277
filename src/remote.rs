/**
 * Client for the question generation service.
 *
 * The service is optional: every failure is reported as `RemoteUnavailable` so that the
 * caller can fall back to the local generator.
 *
 * Author:  mcq contributors
 * Version: October 2026
 */
use std::time::{Duration, UNIX_EPOCH};

use chrono::{DateTime, TimeZone, Utc};
use log::{debug, warn};
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use super::common::{QuizError, Result};
use super::history::HistoryEntry;
use super::model::{index_for, label_for, Difficulty, Question, QuizConfig, MAX_OPTIONS};

const TIMEOUT: Duration = Duration::from_secs(15);

pub struct ApiClient {
    base: String,
    client: Client,
}

#[derive(Serialize, Debug)]
struct GenerateRequest<'a> {
    topic: &'a str,
    count: usize,
    subtopics: &'a str,
    difficulty: Difficulty,
}

#[derive(Serialize, Debug)]
struct GenerateFromTextRequest<'a> {
    text: &'a str,
    count: usize,
}

#[derive(Deserialize, Debug)]
struct QuestionsResponse {
    #[serde(default)]
    questions: Vec<RemoteQuestion>,
}

#[derive(Deserialize, Debug)]
struct HistoryResponse {
    #[serde(default)]
    history: Vec<RemoteHistoryEntry>,
}

/// A question as the service sends it. Older versions of the service call the prompt
/// `question` and give the answer as the text of the correct option instead of its
/// label.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct RemoteQuestion {
    #[serde(alias = "question")]
    pub prompt: Option<String>,
    pub options: Option<Vec<String>>,
    pub answer: Option<String>,
    pub explanation: Option<String>,
}

/// A history entry as the service sends it. Entries generated from source text or an
/// uploaded file have no topic.
#[derive(Deserialize, Debug, Clone, Default)]
struct RemoteHistoryEntry {
    id: Option<u64>,
    topic: Option<String>,
    text: Option<String>,
    file: Option<String>,
    #[serde(default)]
    subtopics: String,
    difficulty: Option<String>,
    #[serde(default)]
    questions: Vec<RemoteQuestion>,
    #[serde(alias = "createdAt")]
    created_at: Option<DateTime<Utc>>,
    /// Seconds since the epoch.
    timestamp: Option<f64>,
}

impl ApiClient {
    /// `base` is the URL that the endpoint paths are appended to, e.g.
    /// `https://example.com/api`.
    pub fn new(base: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(TIMEOUT)
            .build()
            .map_err(|e| QuizError::RemoteUnavailable(e.to_string()))?;
        Ok(ApiClient {
            base: String::from(base.trim_end_matches('/')),
            client,
        })
    }

    /// Ask the service for questions on `config.topic`.
    pub fn generate(&self, config: &QuizConfig) -> Result<Vec<Question>> {
        let request = GenerateRequest {
            topic: &config.topic,
            count: config.count,
            subtopics: &config.subtopics,
            difficulty: config.difficulty,
        };
        let response: QuestionsResponse = self.post("/generate", &request)?;
        Ok(normalize_questions(response.questions))
    }

    /// Ask the service for questions about a piece of source text.
    pub fn generate_from_text(&self, text: &str, count: usize) -> Result<Vec<Question>> {
        let request = GenerateFromTextRequest { text, count };
        let response: QuestionsResponse = self.post("/generate-from-text", &request)?;
        Ok(normalize_questions(response.questions))
    }

    /// Fetch the history the service keeps of the quizzes it generated.
    pub fn history(&self) -> Result<Vec<HistoryEntry>> {
        let url = self.url("/history");
        debug!("GET {}", url);
        let response = self.client.get(&url).send().map_err(unavailable)?;
        let response: HistoryResponse = parse(response)?;
        Ok(response
            .history
            .into_iter()
            .enumerate()
            .map(|(i, entry)| entry.into_history_entry(i))
            .collect())
    }

    fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.url(path);
        debug!("POST {}", url);
        let response = self.client.post(&url).json(body).send().map_err(unavailable)?;
        parse(response)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(QuizError::RemoteUnavailable(format!(
            "response failed with status {}",
            status
        )));
    }
    response.json().map_err(unavailable)
}

fn unavailable(e: reqwest::Error) -> QuizError {
    QuizError::RemoteUnavailable(e.to_string())
}

/// Convert questions from the service into well-formed `Question`s, dropping any that
/// are incomplete or whose answer does not point at one of their options.
pub fn normalize_questions(questions: Vec<RemoteQuestion>) -> Vec<Question> {
    let mut normalized = Vec::new();
    for (i, q) in questions.into_iter().enumerate() {
        match normalize_question(q) {
            Some(q) => normalized.push(q),
            None => warn!("dropping malformed question {} from the generation service", i + 1),
        }
    }
    normalized
}

fn normalize_question(q: RemoteQuestion) -> Option<Question> {
    let prompt = clean(&q.prompt?);
    let options: Vec<String> = q.options?.iter().map(|o| clean(o)).collect();
    let answer = clean(&q.answer?);
    if prompt.is_empty() || answer.is_empty() || options.len() > MAX_OPTIONS {
        return None;
    }

    let label = resolve_answer(&answer, &options)?;
    let question = Question {
        prompt,
        options,
        answer: label,
        explanation: q.explanation.map(|e| clean(&e)).filter(|e| !e.is_empty()),
    };
    question.validate().ok().map(|_| question)
}

/// Map an answer to the label of an option. A single letter is taken as a label; any
/// other answer is matched against the option texts and the first match wins.
fn resolve_answer(answer: &str, options: &[String]) -> Option<char> {
    let mut chars = answer.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if let Some(i) = index_for(c) {
            if i < options.len() {
                return Some(c.to_ascii_uppercase());
            }
        }
    }

    let matches: Vec<usize> = options
        .iter()
        .enumerate()
        .filter(|(_, o)| o.as_str() == answer)
        .map(|(i, _)| i)
        .collect();
    if matches.len() > 1 {
        warn!(
            "answer {:?} matches {} options; using the first one",
            answer,
            matches.len()
        );
    }
    matches.first().and_then(|i| label_for(*i))
}

fn clean(text: &str) -> String {
    text.trim().nfc().collect::<String>()
}

impl RemoteHistoryEntry {
    fn into_history_entry(self, position: usize) -> HistoryEntry {
        let RemoteHistoryEntry {
            id,
            topic,
            text,
            file,
            subtopics,
            difficulty,
            questions,
            created_at,
            timestamp,
        } = self;

        let created_at = created_at
            .or_else(|| timestamp.and_then(|t| Utc.timestamp_opt(t as i64, 0).single()))
            .unwrap_or_else(|| DateTime::<Utc>::from(UNIX_EPOCH));
        let topic = topic
            .or(file)
            .or_else(|| text.map(|t| excerpt(&t)))
            .unwrap_or_default();
        let questions = normalize_questions(questions);

        HistoryEntry {
            id: id.unwrap_or(position as u64),
            topic,
            subtopics,
            difficulty: difficulty
                .and_then(|d| d.parse().ok())
                .unwrap_or(Difficulty::Mixed),
            count: questions.len(),
            questions,
            created_at,
        }
    }
}

fn excerpt(text: &str) -> String {
    let mut excerpt: String = text.chars().take(30).collect();
    if excerpt.len() < text.len() {
        excerpt.push_str("...");
    }
    excerpt
}
