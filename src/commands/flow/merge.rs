//! Branch Merge Flow: merge the current branch into a shared integration branch.

use super::commit::{CommitOptions, commit_if_dirty};
use super::context::FlowContext;
use super::error::Result;
use super::sync::{conflict_or_failure, pull_branch, push_branch, sync_and_push};
use crate::infra::git::Git;
use crate::shared::ui;

/// Switches back to the source branch when dropped, whatever happened in between.
struct RestoreBranch<'a> {
    git: Git<'a>,
    branch: String,
}

impl<'a> RestoreBranch<'a> {
    fn new(git: Git<'a>, branch: &str) -> Self {
        Self {
            git,
            branch: branch.to_string(),
        }
    }
}

impl Drop for RestoreBranch<'_> {
    fn drop(&mut self) {
        if matches!(self.git.current_branch(), Ok(current) if current == self.branch) {
            return;
        }
        match self.git.checkout(&self.branch) {
            Ok(()) => ui::detail(&format!("Switched back to '{}'", self.branch)),
            Err(e) => {
                tracing::warn!(branch = %self.branch, error = %e, "could not restore branch");
                ui::warn(&format!("could not switch back to '{}': {e:#}", self.branch));
            }
        }
    }
}

/// Commit, sync the current branch, then merge it into `target` and push.
/// On `target` itself this reduces to commit, pull and push.
pub fn merge_into(ctx: &FlowContext<'_>, target: &str, options: &CommitOptions) -> Result<()> {
    let git = ctx.git();
    git.ensure_repository()?;
    let source = git.current_branch()?;
    let remote = git.preferred_remote()?;

    commit_if_dirty(ctx, options)?;

    if source == target {
        sync_and_push(ctx, &remote, target)?;
        ui::success(&format!("'{target}' is up to date on '{remote}'"));
        return Ok(());
    }

    sync_and_push(ctx, &remote, &source)?;

    let _restore = RestoreBranch::new(git, &source);
    switch_to_target(git, &remote, &source, target)?;

    let upstream = git.upstream_ref()?;
    pull_branch(git, &remote, target, upstream.as_ref())?;
    merge_source(git, &remote, &source, target)?;
    push_branch(git, &remote, target, upstream.is_none())?;

    ui::success(&format!("Merged '{source}' into '{target}'"));
    Ok(())
}

/// Prefer the local branch, then a new one tracking the remote, then a fresh
/// branch from HEAD.
fn switch_to_target(git: Git<'_>, remote: &str, source: &str, target: &str) -> Result<()> {
    if git.local_branch_exists(target) {
        ui::step(&format!("Switching to '{target}'"));
        return git.checkout(target);
    }
    if git.remote_branch_exists(remote, target) {
        ui::step(&format!("Creating '{target}' tracking '{remote}/{target}'"));
        git.fetch(remote, target)?;
        return git.checkout_tracking(remote, target);
    }
    ui::warn(&format!(
        "'{target}' exists neither locally nor on '{remote}', creating it from '{source}'"
    ));
    git.checkout_new(target)
}

fn merge_source(git: Git<'_>, remote: &str, source: &str, target: &str) -> Result<()> {
    let rev = format!("{remote}/{source}");
    ui::step(&format!("Merging '{rev}' into '{target}'"));
    git.fetch(remote, source)?;

    let output = git.merge(&rev)?;
    if !output.success() {
        return Err(conflict_or_failure(
            git,
            target,
            &format!("merging '{rev}' into '{target}'"),
            &output,
        ));
    }
    Ok(())
}
