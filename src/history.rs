/**
 * The quiz history: a bounded, most-recent-first list of generated quizzes.
 *
 * Generating a quiz that is already in the history (same topic, same questions)
 * promotes the existing entry to the front instead of recording a duplicate.
 *
 * Author:  mcq contributors
 * Version: October 2026
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::{Difficulty, Question, QuizConfig};

/// The maximum number of entries kept in the history.
pub const MAX_HISTORY: usize = 50;

/// Represents a quiz as it was recorded in the history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: u64,
    pub topic: String,
    #[serde(default)]
    pub subtopics: String,
    pub difficulty: Difficulty,
    pub count: usize,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
}

/// A freshly generated quiz that has not been recorded yet.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub config: QuizConfig,
    pub questions: Vec<Question>,
}

/// A source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl HistoryEntry {
    pub fn config(&self) -> QuizConfig {
        QuizConfig {
            topic: self.topic.clone(),
            subtopics: self.subtopics.clone(),
            difficulty: self.difficulty,
            count: self.count,
        }
    }

    fn key(&self) -> (&str, String) {
        (&self.topic, canonical_json(&self.questions))
    }
}

/// Record `candidate` in `history` and return the new history.
///
/// If an entry with the same topic and questions exists, it is moved to the front and
/// its timestamp is refreshed. Otherwise a new entry is put at the front. Either way the
/// result holds at most `MAX_HISTORY` entries.
pub fn merge<C: Clock>(history: &[HistoryEntry], candidate: &Candidate, clock: &C) -> Vec<HistoryEntry> {
    let now = clock.now();
    let key = (
        candidate.config.topic.as_str(),
        canonical_json(&candidate.questions),
    );

    let mut merged = history.to_vec();
    let entry = if let Some(index) = merged.iter().position(|h| h.key() == key) {
        let mut existing = merged.remove(index);
        existing.created_at = now;
        existing
    } else {
        HistoryEntry {
            id: next_id(history, now),
            topic: candidate.config.topic.clone(),
            subtopics: candidate.config.subtopics.clone(),
            difficulty: candidate.config.difficulty,
            count: candidate.config.count,
            questions: candidate.questions.clone(),
            created_at: now,
        }
    };

    merged.insert(0, entry);
    merged.truncate(MAX_HISTORY);
    merged
}

/// Return the entry with the given id.
pub fn find(history: &[HistoryEntry], id: u64) -> Option<&HistoryEntry> {
    history.iter().find(|h| h.id == id)
}

/// Ids are creation times in milliseconds, bumped past every existing id so that two
/// entries created within the same millisecond still get distinct ids.
fn next_id(history: &[HistoryEntry], now: DateTime<Utc>) -> u64 {
    let millis = now.timestamp_millis().max(0) as u64;
    let largest = match history.iter().map(|h| h.id).max() {
        Some(largest) if largest >= millis => largest,
        _ => return millis,
    };

    largest.checked_add(1).unwrap_or_else(|| {
        // A hand-edited file holds the largest possible id; take the first free one.
        (millis..u64::MAX)
            .find(|id| history.iter().all(|h| h.id != *id))
            .unwrap_or(millis)
    })
}

/// Serialize questions in a stable form for comparison. Field order follows the
/// declaration order of `Question`, so equal questions always give equal strings.
fn canonical_json(questions: &[Question]) -> String {
    serde_json::to_string(questions).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::cell::Cell;

    /// A clock that advances by one second every time it is read.
    struct FakeClock {
        seconds: Cell<i64>,
    }

    impl FakeClock {
        fn new() -> Self {
            FakeClock { seconds: Cell::new(1_700_000_000) }
        }

        fn last(&self) -> DateTime<Utc> {
            Utc.timestamp_opt(self.seconds.get() - 1, 0).unwrap()
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> DateTime<Utc> {
            let now = Utc.timestamp_opt(self.seconds.get(), 0).unwrap();
            self.seconds.set(self.seconds.get() + 1);
            now
        }
    }

    /// A clock that never moves.
    struct StoppedClock(DateTime<Utc>);

    impl Clock for StoppedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[test]
    fn novel_quiz_goes_to_the_front() {
        let clock = FakeClock::new();
        let history = merge(&[], &candidate("python", "first"), &clock);
        let history = merge(&history, &candidate("python", "second"), &clock);

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].questions[0].prompt, "second");
        assert_eq!(history[1].questions[0].prompt, "first");
        assert!(history[0].id > history[1].id);
    }

    #[test]
    fn repeated_quiz_is_promoted_not_duplicated() {
        let clock = FakeClock::new();
        let mut history = merge(&[], &candidate("python", "same"), &clock);
        let original_id = history[0].id;
        history = merge(&history, &candidate("python", "other"), &clock);

        history = merge(&history, &candidate("python", "same"), &clock);
        history = merge(&history, &candidate("python", "same"), &clock);

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].questions[0].prompt, "same");
        assert_eq!(history[0].id, original_id);
        assert_eq!(history[0].created_at, clock.last());
        assert_eq!(history[1].questions[0].prompt, "other");
    }

    #[test]
    fn same_questions_under_another_topic_are_distinct() {
        let clock = FakeClock::new();
        let history = merge(&[], &candidate("python", "same"), &clock);
        let history = merge(&history, &candidate("rust", "same"), &clock);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].topic, "rust");
    }

    #[test]
    fn history_is_bounded() {
        let clock = FakeClock::new();
        let mut history = Vec::new();
        for i in 0..(MAX_HISTORY + 10) {
            history = merge(&history, &candidate("python", &format!("q{}", i)), &clock);
            assert!(history.len() <= MAX_HISTORY);
        }

        assert_eq!(history.len(), MAX_HISTORY);
        assert_eq!(history[0].questions[0].prompt, format!("q{}", MAX_HISTORY + 9));
        // The oldest entries were evicted.
        assert!(history.iter().all(|h| h.questions[0].prompt != "q0"));
    }

    #[test]
    fn merge_does_not_modify_its_input() {
        let clock = FakeClock::new();
        let history = merge(&[], &candidate("python", "a"), &clock);
        let history = merge(&history, &candidate("python", "b"), &clock);
        let before = history.clone();

        merge(&history, &candidate("python", "a"), &clock);
        assert_eq!(history, before);
    }

    #[test]
    fn ids_are_unique_when_the_clock_stands_still() {
        let clock = StoppedClock(Utc.timestamp_opt(1_700_000_000, 0).unwrap());
        let mut history = Vec::new();
        for i in 0..5 {
            history = merge(&history, &candidate("python", &format!("q{}", i)), &clock);
        }

        let mut ids: Vec<u64> = history.iter().map(|h| h.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
        assert_eq!(history[4].id, 1_700_000_000_000);
        assert_eq!(history[0].id, 1_700_000_000_004);
    }

    #[test]
    fn largest_possible_id_does_not_overflow() {
        let clock = StoppedClock(Utc.timestamp_opt(1_700_000_000, 0).unwrap());
        let mut history = merge(&[], &candidate("python", "a"), &clock);
        history[0].id = u64::MAX;

        let history = merge(&history, &candidate("python", "b"), &clock);
        assert_eq!(history[0].id, 1_700_000_000_000);

        let history = merge(&history, &candidate("python", "c"), &clock);
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].id, 1_700_000_000_001);
        assert_eq!(history[1].id, 1_700_000_000_000);
        assert_eq!(history[2].id, u64::MAX);
    }

    #[test]
    fn find_looks_up_by_id() {
        let clock = StoppedClock(Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::milliseconds(5));
        let history = merge(&[], &candidate("python", "a"), &clock);
        assert!(find(&history, 1_700_000_000_005).is_some());
        assert!(find(&history, 1).is_none());
    }

    fn candidate(topic: &str, prompt: &str) -> Candidate {
        Candidate {
            config: QuizConfig::new(topic, "", Difficulty::Mixed, 1).unwrap(),
            questions: vec![Question {
                prompt: String::from(prompt),
                options: vec![String::from("yes"), String::from("no")],
                answer: 'A',
                explanation: None,
            }],
        }
    }
}
