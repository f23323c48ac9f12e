//! Human-facing progress output on stderr.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::shared::env_var::EnvVars;

pub mod color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const RED: &str = "\x1b[31m";
    pub const CYAN: &str = "\x1b[36m";
}

fn colors_enabled() -> bool {
    std::io::stderr().is_terminal() && !EnvVars::load().no_color
}

fn paint(code: &str, text: &str) -> String {
    if colors_enabled() {
        format!("{code}{text}{}", color::RESET)
    } else {
        text.to_string()
    }
}

/// A workflow step is starting.
pub fn step(message: &str) {
    eprintln!("{} {message}", paint(color::CYAN, "==>"));
}

/// Secondary detail under a step.
pub fn detail(message: &str) {
    eprintln!("    {}", paint(color::DIM, message));
}

pub fn success(message: &str) {
    eprintln!("{} {message}", paint(color::GREEN, "✓"));
}

pub fn warn(message: &str) {
    eprintln!("{} {message}", paint(color::YELLOW, "warning:"));
}

/// Final error line, prefixed with the failing command's name.
pub fn error(command: &str, message: &str) {
    eprintln!("{} {message}", paint(color::RED, &format!("{command}:")));
}

/// Emphasized text for prompts.
pub fn bold(text: &str) -> String {
    paint(color::BOLD, text)
}

/// Spinner for slow network calls; hidden when stderr is not a terminal.
pub fn spinner(message: &str) -> ProgressBar {
    if !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
        .template("{spinner} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
