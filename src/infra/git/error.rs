//! Git error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not in a git repository")]
    NotInRepo,

    #[error("HEAD is detached; check out a branch first")]
    DetachedHead,

    #[error("No git remote configured")]
    NoRemoteConfigured,

    #[error("`git {command}` failed: {message}")]
    CommandFailed { command: String, message: String },

    #[error("Failed to run git: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type Result<T> = anyhow::Result<T>;
