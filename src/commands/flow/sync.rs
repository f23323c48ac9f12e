//! Sync-and-Push: bring a branch up to date with its remote, then push it.

use super::context::FlowContext;
use super::error::{FlowError, Result};
use crate::infra::git::{Git, UpstreamRef};
use crate::shared::command::CommandOutput;
use crate::shared::ui;

/// Pull the checked-out `branch` (when the remote has it), then push it.
pub fn sync_and_push(ctx: &FlowContext<'_>, remote: &str, branch: &str) -> Result<()> {
    let git = ctx.git();
    let upstream = git.upstream_ref()?;
    pull_branch(git, remote, branch, upstream.as_ref())?;
    push_branch(git, remote, branch, upstream.is_none())
}

/// Pull `branch` into the checked-out branch.
///
/// Returns `false` when there was nothing to pull from: no upstream and no
/// same-named branch on `remote`.
pub(super) fn pull_branch(
    git: Git<'_>,
    remote: &str,
    branch: &str,
    upstream: Option<&UpstreamRef>,
) -> Result<bool> {
    let output = match upstream {
        Some(upstream) => {
            ui::step(&format!("Pulling '{branch}' from '{upstream}'"));
            let spinner = ui::spinner("git pull");
            let output = git.pull(None);
            spinner.finish_and_clear();
            output?
        }
        None if git.remote_branch_exists(remote, branch) => {
            ui::step(&format!("Pulling '{branch}' from '{remote}'"));
            let spinner = ui::spinner("git pull");
            let output = git.pull(Some((remote, branch)));
            spinner.finish_and_clear();
            output?
        }
        None => {
            ui::warn(&format!(
                "'{branch}' does not exist on '{remote}' yet, skipping pull"
            ));
            return Ok(false);
        }
    };

    if !output.success() {
        return Err(conflict_or_failure(
            git,
            branch,
            &format!("pulling '{branch}'"),
            &output,
        ));
    }
    Ok(true)
}

pub(super) fn push_branch(git: Git<'_>, remote: &str, branch: &str, set_upstream: bool) -> Result<()> {
    ui::step(&format!("Pushing '{branch}' to '{remote}'"));
    let spinner = ui::spinner("git push");
    let output = git.push(remote, branch, set_upstream);
    spinner.finish_and_clear();
    let output = output?;

    if !output.success() {
        return Err(FlowError::SyncFailed {
            branch: branch.to_string(),
            message: output.failure_message(),
        }
        .into());
    }
    if set_upstream {
        ui::detail(&format!("'{branch}' now tracks '{remote}/{branch}'"));
    }
    ui::success(&format!("Pushed '{branch}' to '{remote}'"));
    Ok(())
}

/// Classify a failed pull or merge. Conflicted paths are left in place for
/// the user to resolve.
pub(super) fn conflict_or_failure(
    git: Git<'_>,
    branch: &str,
    action: &str,
    output: &CommandOutput,
) -> anyhow::Error {
    match git.working_tree_status() {
        Ok(status) => {
            let paths = status.conflicted_paths();
            if !paths.is_empty() {
                tracing::warn!(?paths, "conflicts left in the working tree");
                return FlowError::MergeConflict {
                    action: action.to_string(),
                    paths,
                }
                .into();
            }
        }
        Err(e) => tracing::warn!(error = %e, "could not inspect status after failure"),
    }
    FlowError::SyncFailed {
        branch: branch.to_string(),
        message: output.failure_message(),
    }
    .into()
}
