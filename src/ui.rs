/**
 * The command-line user interface for taking quizzes.
 *
 * Author:  mcq contributors
 * Version: October 2026
 */
use std::io::Write;

use colored::*;

use super::common::{QuizError, Result};
use super::history::HistoryEntry;
use super::iohelper::{prettyprint, print_wrapped, prompt_label, Palette};
use super::model::{label_for, Question};
use super::session::QuizResult;

pub struct CmdUI {
    number: usize,
}

impl CmdUI {
    pub fn new() -> Self {
        Self { number: 0 }
    }

    pub fn next(&mut self) {
        self.number += 1;
    }

    /// Print a heading naming the topic of the quiz and where it came from.
    pub fn instructions(&mut self, text: &str) -> Result<()> {
        my_print!("\n")?;
        let palette = Palette {
            text: Some(Color::BrightBlue),
            prefix: None,
        };
        print_wrapped(text, "  ", palette)?;
        Ok(())
    }

    pub fn question(&mut self, question: &Question) -> Result<()> {
        my_print!("\n")?;
        let prefix = format!("  ({}) ", self.number);
        let palette = Palette {
            text: None,
            prefix: Some(Color::Cyan),
        };
        print_wrapped(&question.prompt, &prefix, palette)?;
        for (i, option) in question.options.iter().enumerate() {
            if let Some(label) = label_for(i) {
                prettyprint(option, &format!("     ({}) ", label))?;
            }
        }
        my_print!("\n")
    }

    /// Read the label the user picks for `question`; `None` at the end of input.
    pub fn prompt(&mut self, question: &Question) -> Result<Option<char>> {
        prompt_label("Enter a letter: ", question.options.len())
    }

    pub fn correct(&mut self, question: &Question) -> Result<()> {
        prettyprint(&format!("{}", "Correct!".green()), "")?;
        self.explanation(question)
    }

    pub fn incorrect(&mut self, question: &Question) -> Result<()> {
        let message = format!(
            "{} The correct answer was {}.",
            "Incorrect.".red(),
            question.answer.to_string().green(),
        );
        prettyprint(&message, "")?;
        self.explanation(question)
    }

    pub fn unanswered(&mut self, question: &Question) -> Result<()> {
        let message = format!(
            "{} The correct answer was {}.",
            "No answer.".red(),
            question.answer.to_string().green(),
        );
        prettyprint(&message, "")?;
        self.explanation(question)
    }

    fn explanation(&mut self, question: &Question) -> Result<()> {
        if let Some(explanation) = &question.explanation {
            let palette = Palette {
                text: Some(Color::White),
                prefix: None,
            };
            print_wrapped(explanation, "  ", palette)?;
        }
        Ok(())
    }

    pub fn results(&mut self, results: &QuizResult, questions: &[Question]) -> Result<()> {
        if results.total == 0 {
            return Ok(());
        }

        my_print!("\n\n")?;
        my_print!("Score: ")?;
        my_print!("{}", format!("{}", results.total_correct).cyan())?;
        my_print!(" out of ")?;
        my_print!("{}", format!("{}", results.total).cyan())?;
        if results.total == 1 {
            my_println!(" question")?;
        } else {
            my_println!(" questions")?;
        }
        my_print!("  {}", format!("{}", results.total_correct).green())?;
        my_print!(" correct\n")?;
        my_print!("  {}", format!("{}", results.total_incorrect).red())?;
        my_print!(" incorrect\n")?;
        if results.total_unanswered > 0 {
            my_print!("  {}", format!("{}", results.total_unanswered).yellow())?;
            my_print!(" unanswered\n")?;
        }

        let missed: Vec<_> = results
            .per_question
            .iter()
            .filter(|r| r.response != Some(r.answer))
            .collect();
        if !missed.is_empty() {
            my_println!("\nReview:")?;
            for r in missed {
                let prefix = format!("  ({}) ", r.index + 1);
                prettyprint(&questions[r.index].prompt, &prefix)?;
                let response = r
                    .response
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| String::from("-"));
                let indent = " ".repeat(prefix.len());
                my_println!("{}Your answer: {}. Correct: {}.", indent, response, r.answer)?;
            }
        }
        Ok(())
    }

    pub fn history(&mut self, history: &[HistoryEntry]) -> Result<()> {
        if history.is_empty() {
            return my_println!("No quizzes have been recorded yet.");
        }

        for entry in history.iter() {
            let id = format!("[{}]", entry.id);
            let when = entry.created_at.format("%Y-%m-%d %H:%M");
            let questions = if entry.questions.len() == 1 {
                String::from("1 question")
            } else {
                format!("{} questions", entry.questions.len())
            };
            my_println!(
                "{}  {}  {} ({}, {})",
                id.cyan(),
                when,
                entry.topic,
                entry.difficulty,
                questions
            )?;
        }
        Ok(())
    }
}
