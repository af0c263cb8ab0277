/**
 * An active quiz: the questions being asked, the answers given so far, and the final
 * tally.
 *
 * Author:  mcq contributors
 * Version: October 2026
 */
use std::collections::BTreeMap;

use super::common::{QuizError, Result};
use super::model::{index_for, Question, QuizConfig};
use super::ui::CmdUI;

/// Maps the position of a question to the label the user chose. Questions without an
/// entry have not been answered.
pub type AnswerMap = BTreeMap<usize, char>;

pub struct Session {
    pub config: QuizConfig,
    pub questions: Vec<Question>,
    answers: AnswerMap,
}

/// Represents the result of answering a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionResult {
    pub index: usize,
    pub response: Option<char>,
    pub answer: char,
}

/// Represents the results of taking a quiz on a particular occasion.
#[derive(Debug)]
pub struct QuizResult {
    pub time_finished: chrono::DateTime<chrono::Utc>,
    pub total: usize,
    pub total_correct: usize,
    pub total_incorrect: usize,
    pub total_unanswered: usize,
    pub per_question: Vec<QuestionResult>,
}

impl Session {
    /// Start a quiz with no answers recorded.
    pub fn new(config: QuizConfig, questions: Vec<Question>) -> Self {
        Session {
            config,
            questions,
            answers: AnswerMap::new(),
        }
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    /// Record `label` as the answer to question `index` and return whether it was
    /// correct. `None` if there is no such question or `label` names none of its
    /// options, in which case nothing is recorded.
    pub fn answer(&mut self, index: usize, label: char) -> Option<bool> {
        let question = self.questions.get(index)?;
        let position = index_for(label)?;
        if position >= question.options.len() {
            return None;
        }

        let label = label.to_ascii_uppercase();
        self.answers.insert(index, label);
        Some(label == question.answer)
    }

    /// Tally the answers recorded so far.
    pub fn result(&self) -> QuizResult {
        let per_question: Vec<QuestionResult> = self
            .questions
            .iter()
            .enumerate()
            .map(|(index, q)| QuestionResult {
                index,
                response: self.answers.get(&index).cloned(),
                answer: q.answer,
            })
            .collect();

        let total = per_question.len();
        let total_correct = per_question
            .iter()
            .filter(|r| r.response == Some(r.answer))
            .count();
        let total_unanswered = per_question.iter().filter(|r| r.response.is_none()).count();

        QuizResult {
            time_finished: chrono::Utc::now(),
            total,
            total_correct,
            total_incorrect: total - total_correct - total_unanswered,
            total_unanswered,
            per_question,
        }
    }

    /// Ask every question in turn and return the results. Pressing Ctrl+C ends the quiz
    /// early; the remaining questions count as unanswered.
    pub fn take(&mut self, ui: &mut CmdUI) -> Result<QuizResult> {
        if self.questions.is_empty() {
            return Err(QuizError::EmptyQuiz);
        }

        for index in 0..self.questions.len() {
            ui.next();
            ui.question(&self.questions[index])?;
            match self.ask(ui, index) {
                Ok(()) => {}
                Err(QuizError::ReadlineInterrupted) => {
                    break;
                }
                Err(e) => {
                    return Err(e);
                }
            }
        }

        let result = self.result();
        ui.results(&result, &self.questions)?;
        Ok(result)
    }

    fn ask(&mut self, ui: &mut CmdUI, index: usize) -> Result<()> {
        let label = match ui.prompt(&self.questions[index])? {
            Some(label) => label,
            None => return ui.unanswered(&self.questions[index]),
        };

        // The prompt only returns labels of this question's options.
        if self.answer(index, label) == Some(true) {
            ui.correct(&self.questions[index])
        } else {
            ui.incorrect(&self.questions[index])
        }
    }
}
