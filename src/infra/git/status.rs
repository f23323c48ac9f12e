//! Working tree status.

use super::error::{GitError, Result};
use super::repo::Git;

/// State of a path on one side (index or worktree) of `git status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Unmodified,
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    TypeChanged,
    Untracked,
    Ignored,
    Conflicted,
}

impl FileState {
    fn from_code(code: char) -> Self {
        match code {
            'A' => Self::Added,
            'M' => Self::Modified,
            'D' => Self::Deleted,
            'R' => Self::Renamed,
            'C' => Self::Copied,
            'T' => Self::TypeChanged,
            '?' => Self::Untracked,
            '!' => Self::Ignored,
            'U' => Self::Conflicted,
            _ => Self::Unmodified,
        }
    }
}

/// One entry of `git status --porcelain=v1 -z`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: String,
    /// Original path for renames and copies.
    pub orig_path: Option<String>,
    pub index: FileState,
    pub worktree: FileState,
    conflicted: bool,
}

impl FileChange {
    pub fn is_conflicted(&self) -> bool {
        self.conflicted
    }
}

/// Snapshot of changed paths. Never cached; re-read on every inspection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingTreeStatus {
    pub changes: Vec<FileChange>,
}

impl WorkingTreeStatus {
    pub fn is_dirty(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn conflicted_paths(&self) -> Vec<String> {
        self.changes
            .iter()
            .filter(|c| c.is_conflicted())
            .map(|c| c.path.clone())
            .collect()
    }

    /// Parse `git status --porcelain=v1 -z` output.
    ///
    /// Records are NUL-terminated and paths are verbatim. A rename or copy
    /// record is followed by one more field holding the original path.
    pub fn parse(porcelain: &str) -> Self {
        let mut fields = porcelain.split('\0').filter(|f| !f.is_empty());
        let mut changes = Vec::new();
        while let Some(record) = fields.next() {
            let Some(mut change) = parse_record(record) else {
                continue;
            };
            if matches!(change.index, FileState::Renamed | FileState::Copied) {
                change.orig_path = fields.next().map(str::to_string);
            }
            changes.push(change);
        }
        Self { changes }
    }
}

/// Unmerged XY pairs as documented in git-status(1).
const CONFLICT_CODES: &[&str] = &["DD", "AU", "UD", "UA", "DU", "AA", "UU"];

fn parse_record(record: &str) -> Option<FileChange> {
    let xy = record.get(..2)?;
    let path = record.get(3..).filter(|p| !p.is_empty())?;
    let mut codes = xy.chars();
    let x = codes.next()?;
    let y = codes.next()?;

    let conflicted = CONFLICT_CODES.contains(&xy);
    let (index, worktree) = if conflicted {
        (FileState::Conflicted, FileState::Conflicted)
    } else {
        (FileState::from_code(x), FileState::from_code(y))
    };

    Some(FileChange {
        path: path.to_string(),
        orig_path: None,
        index,
        worktree,
        conflicted,
    })
}

impl Git<'_> {
    pub fn working_tree_status(&self) -> Result<WorkingTreeStatus> {
        let porcelain = self.run_raw_stdout(&["status", "--porcelain=v1", "-z"])?;
        Ok(WorkingTreeStatus::parse(&porcelain))
    }

    /// Like [`Git::run`] but without trimming, since porcelain lines start with spaces.
    fn run_raw_stdout(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;
        if !output.success() {
            return Err(GitError::CommandFailed {
                command: args.join(" "),
                message: output.failure_message(),
            }
            .into());
        }
        Ok(output.stdout)
    }
}
