use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use crate::infra::git::Git;
use crate::shared::command::{CommandRunner, SystemRunner};
use crate::shared::prompt::{Prompter, TerminalPrompter};
use crate::shared::repo_config::{ScopeEntry, load_scopes};

/// Everything a workflow needs from its surroundings, passed explicitly.
pub struct FlowContext<'a> {
    pub cwd: &'a Path,
    /// Whether prompts may be shown. False when stdin is not a terminal.
    pub interactive: bool,
    pub runner: &'a dyn CommandRunner,
    pub prompter: &'a dyn Prompter,
}

impl<'a> FlowContext<'a> {
    pub fn git(&self) -> Git<'a> {
        Git::new(self.runner, self.cwd)
    }

    /// Scopes from the repository config, if any.
    pub fn scopes(&self) -> Vec<ScopeEntry> {
        let root = self
            .git()
            .toplevel()
            .ok()
            .filter(|root| !root.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| self.cwd.to_path_buf());
        load_scopes(&root)
    }
}

/// Resolve `-C <dir>` against the process working directory.
pub fn resolve_dir(dir: Option<&Path>) -> anyhow::Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => Ok(std::env::current_dir()?),
    }
}

/// Run `f` with the real process runner and terminal prompter.
pub fn with_system_context<T>(
    dir: Option<&Path>,
    f: impl FnOnce(&FlowContext<'_>) -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    let cwd = resolve_dir(dir)?;
    let ctx = FlowContext {
        cwd: &cwd,
        interactive: std::io::stdin().is_terminal(),
        runner: &SystemRunner,
        prompter: &TerminalPrompter,
    };
    f(&ctx)
}
