/**
 * Reading answers from the terminal and printing wrapped, colored text.
 *
 * Author:  mcq contributors
 * Version: October 2026
 */
use colored::*;
use std::io::Write;

use rustyline::error::ReadlineError;
use rustyline::Editor;

use super::common::{QuizError, Result};
use super::model::index_for;

#[macro_export]
macro_rules! my_println {
    ($($arg:tt)*) => (
        writeln!(std::io::stdout(), $($arg)*).map_err(QuizError::Io)
    );
}

#[macro_export]
macro_rules! my_print {
    ($($arg:tt)*) => (
        write!(std::io::stdout(), $($arg)*).map_err(QuizError::Io)
    );
}

/// Ask for the label of one of `num_options` options until the user gives one, and
/// return it in upper case. Blank lines are ignored; anything else that is not a label
/// gets "Please enter a letter." and another prompt.
///
/// `Ok(None)` means the input ended (Ctrl+D) before a label was given. Ctrl+C gives
/// `Err(QuizError::ReadlineInterrupted)`.
pub fn prompt_label(message: &str, num_options: usize) -> Result<Option<char>> {
    let mut rl = Editor::<()>::new();
    loop {
        match rl.readline(message) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match parse_label(line, num_options) {
                    Some(label) => return Ok(Some(label)),
                    None => my_println!("Please enter a letter.")?,
                }
            }
            Err(ReadlineError::Interrupted) => return Err(QuizError::ReadlineInterrupted),
            Err(ReadlineError::Io(e)) => return Err(QuizError::Io(e)),
            Err(_) => return Ok(None),
        }
    }
}

/// A single letter naming one of the first `num_options` options, in either case.
pub fn parse_label(input: &str, num_options: usize) -> Option<char> {
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => match index_for(c) {
            Some(i) if i < num_options => Some(c.to_ascii_uppercase()),
            _ => None,
        },
        _ => None,
    }
}

/// Colors for a block of wrapped text and the prefix of its first line.
#[derive(Debug, Default, Clone, Copy)]
pub struct Palette {
    pub text: Option<Color>,
    pub prefix: Option<Color>,
}

/// Print `message` to standard output, broken into lines that fit the terminal. The first
/// line starts with `prefix`; later lines are indented to match.
pub fn prettyprint(message: &str, prefix: &str) -> Result<()> {
    print_wrapped(message, prefix, Palette::default())
}

pub fn print_wrapped(message: &str, prefix: &str, palette: Palette) -> Result<()> {
    let width = textwrap::termwidth().saturating_sub(prefix.len()).max(20);
    let indent = " ".repeat(prefix.len());
    for (i, line) in textwrap::wrap_iter(message, width).enumerate() {
        let lead = if i == 0 {
            paint(prefix, palette.prefix)
        } else {
            paint(&indent, None)
        };
        my_println!("{}{}", lead, paint(&line, palette.text))?;
    }
    Ok(())
}

fn paint(text: &str, color: Option<Color>) -> ColoredString {
    match color {
        Some(color) => text.color(color),
        None => text.normal(),
    }
}
