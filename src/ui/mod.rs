//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::{GitBumpError, Result};

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_command_output, display_dry_run_summary, display_error, display_plan,
    display_remediation, display_status, display_success, display_warning,
};

/// Source of interactive answers.
///
/// The terminal implementation reads stdin; tests use [ScriptedPrompter].
pub trait Prompter {
    /// Ask a yes/no question; anything but an affirmative answer is "no"
    fn confirm(&self, prompt: &str) -> Result<bool>;

    /// Ask for a line of free text, returned trimmed
    fn input(&self, prompt: &str) -> Result<String>;
}

/// Returns true for the accepted affirmative answers (case-insensitive).
///
/// Besides `y`/`yes`, the Spanish `s`/`si`/`sí` are accepted.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "s" | "si" | "sí"
    )
}

/// Prompts on the controlling terminal.
pub struct TerminalPrompter;

impl TerminalPrompter {
    fn read_line(prompt: &str) -> Result<String> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut input = String::new();
        let read = io::stdin().lock().read_line(&mut input)?;
        if read == 0 {
            // EOF counts as an empty answer, which declines confirmations
            return Ok(String::new());
        }
        Ok(input.trim().to_string())
    }
}

impl Prompter for TerminalPrompter {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        let answer = Self::read_line(&format!("\n{} (y/N): ", prompt))?;
        Ok(is_affirmative(&answer))
    }

    fn input(&self, prompt: &str) -> Result<String> {
        Self::read_line(&format!("{}: ", prompt))
    }
}

/// Replays prepared answers in order. Running out of answers is an error.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<String>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedPrompter {
            answers: RefCell::new(answers.into_iter().map(Into::into).collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    /// Prompts shown so far
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }

    fn next(&self, prompt: &str) -> Result<String> {
        self.asked.borrow_mut().push(prompt.to_string());
        self.answers.borrow_mut().pop_front().ok_or_else(|| {
            GitBumpError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no scripted answer for '{}'", prompt),
            ))
        })
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        Ok(is_affirmative(&self.next(prompt)?))
    }

    fn input(&self, prompt: &str) -> Result<String> {
        Ok(self.next(prompt)?.trim().to_string())
    }
}

/// Builds the commit message, optionally asking for custom text.
///
/// The default is `Bump version to <tag>`. When the user opts in and enters
/// text, the message becomes `<text> - <tag>`.
pub fn prompt_commit_message<P: Prompter + ?Sized>(
    prompter: &P,
    tag: &str,
    auto_confirm: bool,
) -> Result<String> {
    let default = default_commit_message(tag);
    if auto_confirm {
        return Ok(default);
    }

    if !prompter.confirm("Add a custom message to the commit?")? {
        return Ok(default);
    }

    let custom = prompter.input("Enter your message (the version is appended)")?;
    if custom.is_empty() {
        Ok(default)
    } else {
        Ok(format!("{} - {}", custom, tag))
    }
}

pub fn default_commit_message(tag: &str) -> String {
    format!("Bump version to {}", tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_answers() {
        for answer in ["y", "Y", "yes", "YES", " s ", "si", "Sí"] {
            assert!(is_affirmative(answer), "{:?}", answer);
        }
        for answer in ["", "n", "no", "nope", "yess"] {
            assert!(!is_affirmative(answer), "{:?}", answer);
        }
    }

    #[test]
    fn test_commit_message_auto_confirm_never_prompts() {
        let prompter = ScriptedPrompter::default();
        let msg = prompt_commit_message(&prompter, "v1.2.4", true).unwrap();
        assert_eq!(msg, "Bump version to v1.2.4");
        assert!(prompter.asked().is_empty());
    }

    #[test]
    fn test_commit_message_declined() {
        let prompter = ScriptedPrompter::new(["n"]);
        let msg = prompt_commit_message(&prompter, "v1.2.4", false).unwrap();
        assert_eq!(msg, "Bump version to v1.2.4");
    }

    #[test]
    fn test_commit_message_custom_text() {
        let prompter = ScriptedPrompter::new(["y", "  Release login fixes  "]);
        let msg = prompt_commit_message(&prompter, "v1.3.0", false).unwrap();
        assert_eq!(msg, "Release login fixes - v1.3.0");
    }

    #[test]
    fn test_commit_message_empty_custom_text() {
        let prompter = ScriptedPrompter::new(["yes", ""]);
        let msg = prompt_commit_message(&prompter, "v2.0.0", false).unwrap();
        assert_eq!(msg, "Bump version to v2.0.0");
    }

    #[test]
    fn test_scripted_prompter_runs_out() {
        let prompter = ScriptedPrompter::default();
        assert!(prompter.confirm("Continue?").is_err());
    }
}
