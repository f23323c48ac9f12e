//! Commit Preparer: stage everything and commit with a conventional message.

use std::fmt;
use std::str::FromStr;

use lazy_regex::regex_is_match;

use super::context::FlowContext;
use super::error::{FlowError, Result};
use crate::shared::prompt::{Choice, Prompter};
use crate::shared::repo_config::ScopeEntry;
use crate::shared::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitType {
    Feat,
    Fix,
    To,
    Docs,
    Style,
    Refactor,
    Perf,
    Test,
    Chore,
    Revert,
    Merge,
    Sync,
}

impl CommitType {
    pub const ALL: [CommitType; 12] = [
        Self::Feat,
        Self::Fix,
        Self::To,
        Self::Docs,
        Self::Style,
        Self::Refactor,
        Self::Perf,
        Self::Test,
        Self::Chore,
        Self::Revert,
        Self::Merge,
        Self::Sync,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Feat => "feat",
            Self::Fix => "fix",
            Self::To => "to",
            Self::Docs => "docs",
            Self::Style => "style",
            Self::Refactor => "refactor",
            Self::Perf => "perf",
            Self::Test => "test",
            Self::Chore => "chore",
            Self::Revert => "revert",
            Self::Merge => "merge",
            Self::Sync => "sync",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Feat => "A new feature",
            Self::Fix => "A bug fix that produces the final fix",
            Self::To => "Work towards a fix; the final fix uses `fix`",
            Self::Docs => "Documentation only",
            Self::Style => "Formatting, whitespace, no code change",
            Self::Refactor => "Code change that neither fixes a bug nor adds a feature",
            Self::Perf => "Performance improvement",
            Self::Test => "Adding or correcting tests",
            Self::Chore => "Build process, tooling or dependencies",
            Self::Revert => "Revert an earlier commit",
            Self::Merge => "Merge branches",
            Self::Sync => "Sync with the main line or upstream",
        }
    }

    fn expected_list() -> String {
        Self::ALL.map(Self::as_str).join(", ")
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommitType {
    type Err = FlowError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let value = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == value)
            .ok_or_else(|| FlowError::UnknownCommitType {
                given: value.to_string(),
                expected: Self::expected_list(),
            })
    }
}

/// `type: subject` or `type(scope): subject`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIntent {
    pub commit_type: CommitType,
    pub scope: Option<String>,
    pub subject: String,
}

impl fmt::Display for CommitIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope.as_deref().filter(|s| !s.is_empty()) {
            Some(scope) => write!(f, "{}({scope}): {}", self.commit_type, self.subject),
            None => write!(f, "{}: {}", self.commit_type, self.subject),
        }
    }
}

/// Whether `message` already starts with `type:` / `type(scope):` / `type!:`.
pub fn has_conventional_prefix(message: &str) -> bool {
    regex_is_match!(r"^[a-z]+(\([^()\s]+\))?!?:\s+", message)
}

/// Scopes may be empty; otherwise they cannot contain whitespace or parentheses.
pub fn validate_scope(scope: &str) -> Result<()> {
    if scope.chars().any(|c| c.is_whitespace() || c == '(' || c == ')') {
        return Err(FlowError::InvalidScope(scope.to_string()).into());
    }
    Ok(())
}

/// Final message for a subject. A subject that already carries a prefix is
/// returned unchanged, as is any subject without a type.
pub fn compose_message(commit_type: Option<CommitType>, scope: Option<&str>, subject: &str) -> String {
    match commit_type {
        Some(commit_type) if !has_conventional_prefix(subject) => CommitIntent {
            commit_type,
            scope: scope.map(str::to_string),
            subject: subject.to_string(),
        }
        .to_string(),
        _ => subject.to_string(),
    }
}

/// Commit metadata supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitOptions {
    pub message: Option<String>,
    pub commit_type: Option<String>,
    pub scope: Option<String>,
}

/// Message derivable from the options alone, without prompting.
fn preset_message(options: &CommitOptions, commit_type: Option<CommitType>) -> Option<String> {
    let message = options.message.as_deref().map(str::trim)?;
    if message.is_empty() {
        return None;
    }
    if has_conventional_prefix(message) {
        return Some(message.to_string());
    }
    commit_type.map(|t| compose_message(Some(t), options.scope.as_deref(), message))
}

/// Commit pending changes, if any. Returns the committed message.
///
/// A clean tree, or one whose changes stage to nothing, is a no-op.
pub fn commit_if_dirty(ctx: &FlowContext<'_>, options: &CommitOptions) -> Result<Option<String>> {
    let commit_type = options
        .commit_type
        .as_deref()
        .map(str::parse::<CommitType>)
        .transpose()?;
    if let Some(scope) = options.scope.as_deref() {
        validate_scope(scope)?;
    }

    let git = ctx.git();
    if !git.working_tree_status()?.is_dirty() {
        ui::detail("Working tree clean, nothing to commit");
        return Ok(None);
    }

    let preset = preset_message(options, commit_type);
    if preset.is_none() && !ctx.interactive {
        return Err(FlowError::MissingCommitMetadata.into());
    }

    ui::step("Staging all changes");
    git.add_all()?;
    if !git.has_staged_changes()? {
        ui::detail("Nothing staged after `git add --all`, skipping commit");
        return Ok(None);
    }

    let message = match preset {
        Some(message) => message,
        None => prompt_message(ctx, options, commit_type)?,
    };

    git.commit(&message)?;
    tracing::info!(message = %message, "committed");
    ui::success(&format!("Committed: {message}"));
    Ok(Some(message))
}

fn prompt_message(
    ctx: &FlowContext<'_>,
    options: &CommitOptions,
    commit_type: Option<CommitType>,
) -> Result<String> {
    let prompts = CommitPrompts::new(ctx.prompter);

    let subject = match options.message.as_deref().map(str::trim) {
        Some(message) if !message.is_empty() => message.to_string(),
        _ => prompts.ask_subject()?,
    };
    if has_conventional_prefix(&subject) {
        return Ok(subject);
    }

    let commit_type = match commit_type {
        Some(commit_type) => commit_type,
        None => prompts.ask_type()?,
    };
    let scope = match options.scope.clone() {
        Some(scope) => scope,
        None => prompts.ask_scope(&ctx.scopes())?,
    };
    Ok(compose_message(Some(commit_type), Some(&scope), &subject))
}

/// The commit questions, asked in a fixed order over a [`Prompter`].
pub struct CommitPrompts<'a> {
    prompter: &'a dyn Prompter,
}

impl<'a> CommitPrompts<'a> {
    pub fn new(prompter: &'a dyn Prompter) -> Self {
        Self { prompter }
    }

    pub fn ask_subject(&self) -> Result<String> {
        loop {
            let subject = self.prompter.input("Commit subject", None)?;
            let subject = subject.trim();
            if !subject.is_empty() {
                return Ok(subject.to_string());
            }
            ui::warn("the subject cannot be empty");
        }
    }

    pub fn ask_type(&self) -> Result<CommitType> {
        let choices: Vec<Choice> = CommitType::ALL
            .iter()
            .map(|t| Choice::new(t.as_str(), Some(t.description())))
            .collect();
        let index = self.prompter.select("Commit type", &choices)?;
        Ok(CommitType::ALL[index])
    }

    /// Pick from `scopes` when there are any, otherwise free text.
    /// An empty answer means no scope.
    pub fn ask_scope(&self, scopes: &[ScopeEntry]) -> Result<String> {
        loop {
            let scope = if scopes.is_empty() {
                self.prompter.input("Scope (optional)", None)?
            } else {
                let mut choices = vec![Choice::new("(none)", Some("No scope"))];
                choices.extend(scopes.iter().map(|s| Choice::new(s.name(), s.description())));
                match self.prompter.select("Scope", &choices)? {
                    0 => String::new(),
                    index => scopes[index - 1].name().to_string(),
                }
            };

            let scope = scope.trim().to_string();
            match validate_scope(&scope) {
                Ok(()) => return Ok(scope),
                Err(e) => ui::warn(&e.to_string()),
            }
        }
    }
}
