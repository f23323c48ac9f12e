//! Git workflow orchestration shared by `ship push`, `ship test` and `ship main`.

mod commit;
mod context;
mod error;
mod merge;
mod request;
mod sync;

pub use commit::{CommitOptions, commit_if_dirty};
pub use context::{FlowContext, resolve_dir, with_system_context};
pub use error::FlowError;
pub use merge::merge_into;
pub use request::request_into;
pub use sync::sync_and_push;

use std::path::PathBuf;

use clap::Args;

/// Flags shared by every workflow command.
#[derive(Args, Clone, Debug, Default, PartialEq, Eq)]
pub struct CommitArgs {
    /// Run as if started in this directory
    #[arg(short = 'C', long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Commit message; used verbatim when it already has a conventional prefix
    #[arg(short, long)]
    pub message: Option<String>,

    /// Commit type (feat, fix, to, docs, style, refactor, perf, test, chore, revert, merge, sync)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub commit_type: Option<String>,

    /// Commit scope, e.g. `api` in `feat(api): ...`
    #[arg(short, long)]
    pub scope: Option<String>,
}

impl CommitArgs {
    pub fn commit_options(&self) -> CommitOptions {
        CommitOptions {
            message: self.message.clone(),
            commit_type: self.commit_type.clone(),
            scope: self.scope.clone(),
        }
    }
}
