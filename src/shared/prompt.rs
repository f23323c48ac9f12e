//! Interactive prompting behind a capability trait.
//!
//! Workflows only talk to [`Prompter`]; the terminal implementation reads
//! stdin, tests use a scripted one.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::shared::ui;

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Input closed before an answer was given")]
    Closed,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// One entry of a pick-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub description: Option<String>,
}

impl Choice {
    pub fn new(label: impl Into<String>, description: Option<&str>) -> Self {
        Self {
            label: label.into(),
            description: description.map(str::to_string),
        }
    }
}

pub trait Prompter {
    /// Free-text answer; an empty answer returns `default` (or "" without one).
    fn input(&self, label: &str, default: Option<&str>) -> anyhow::Result<String>;

    /// Pick one of `choices`, returning its index.
    fn select(&self, label: &str, choices: &[Choice]) -> anyhow::Result<usize>;

    fn confirm(&self, question: &str, default: bool) -> anyhow::Result<bool>;
}

/// Prompts on stderr and reads answers line by line from stdin.
pub struct TerminalPrompter;

impl TerminalPrompter {
    fn read_answer(&self, prompt: &str) -> anyhow::Result<String> {
        let mut stderr = io::stderr();
        write!(stderr, "{prompt}")?;
        stderr.flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(PromptError::Closed.into());
        }
        Ok(line.trim().to_string())
    }
}

impl Prompter for TerminalPrompter {
    fn input(&self, label: &str, default: Option<&str>) -> anyhow::Result<String> {
        let prompt = match default {
            Some(d) if !d.is_empty() => format!("{} [{d}]: ", ui::bold(label)),
            _ => format!("{}: ", ui::bold(label)),
        };
        let answer = self.read_answer(&prompt)?;
        if answer.is_empty() {
            Ok(default.unwrap_or_default().to_string())
        } else {
            Ok(answer)
        }
    }

    fn select(&self, label: &str, choices: &[Choice]) -> anyhow::Result<usize> {
        eprintln!("{}", ui::bold(label));
        let width = choices.iter().map(|c| c.label.len()).max().unwrap_or(0);
        for (i, choice) in choices.iter().enumerate() {
            match &choice.description {
                Some(desc) => eprintln!("  {:>2}) {:<width$}  {desc}", i + 1, choice.label),
                None => eprintln!("  {:>2}) {}", i + 1, choice.label),
            }
        }

        loop {
            let answer = self.read_answer("> ")?;
            if let Some(index) = parse_selection(&answer, choices) {
                return Ok(index);
            }
            ui::warn(&format!(
                "enter a number between 1 and {} or one of the names",
                choices.len()
            ));
        }
    }

    fn confirm(&self, question: &str, default: bool) -> anyhow::Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            let answer = self.read_answer(&format!("{question} {hint} "))?;
            if let Some(value) = parse_yes_no(&answer, default) {
                return Ok(value);
            }
        }
    }
}

/// Accept a 1-based number or an exact label.
pub(crate) fn parse_selection(answer: &str, choices: &[Choice]) -> Option<usize> {
    let answer = answer.trim();
    if let Ok(n) = answer.parse::<usize>() {
        return (1..=choices.len()).contains(&n).then(|| n - 1);
    }
    choices.iter().position(|c| c.label == answer)
}

pub(crate) fn parse_yes_no(answer: &str, default: bool) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
pub use scripted::ScriptedPrompter;
