//! Branch operations.

use std::fmt;

use super::error::Result;
use super::repo::Git;
use crate::shared::command::CommandOutput;

/// Remote-tracking branch a local branch pulls from by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRef {
    pub remote: String,
    pub branch: String,
}

impl UpstreamRef {
    /// Parse `remote/branch`.
    ///
    /// Remote and branch names may both contain slashes, so the longest
    /// configured remote that prefixes `value` wins. Without a match the
    /// value is split at its first slash.
    pub fn parse(value: &str, remotes: &[String]) -> Option<Self> {
        let value = value.trim();
        let (remote, branch) = remotes
            .iter()
            .filter_map(|remote| {
                let branch = value.strip_prefix(remote.as_str())?.strip_prefix('/')?;
                Some((remote.as_str(), branch))
            })
            .max_by_key(|(remote, _)| remote.len())
            .or_else(|| value.split_once('/'))?;
        if remote.is_empty() || branch.is_empty() {
            return None;
        }
        Some(Self {
            remote: remote.to_string(),
            branch: branch.to_string(),
        })
    }
}

impl fmt::Display for UpstreamRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.remote, self.branch)
    }
}

impl Git<'_> {
    /// Upstream of the checked-out branch. No upstream is a valid state, not an error.
    pub fn upstream_ref(&self) -> Result<Option<UpstreamRef>> {
        let output = self.output(&["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{u}"])?;
        if !output.success() {
            return Ok(None);
        }
        let remotes = self.remotes()?;
        Ok(UpstreamRef::parse(output.stdout_trimmed(), &remotes))
    }

    pub fn local_branch_exists(&self, branch: &str) -> bool {
        let reference = format!("refs/heads/{branch}");
        self.output(&["show-ref", "--verify", "--quiet", &reference])
            .map(|o| o.success())
            .unwrap_or(false)
    }

    /// Whether `remote` hosts `branch`.
    ///
    /// Any failure (network, auth, missing remote) reads as "does not exist",
    /// so callers skip the pull instead of aborting.
    pub fn remote_branch_exists(&self, remote: &str, branch: &str) -> bool {
        let reference = format!("refs/heads/{branch}");
        match self.output(&["ls-remote", "--exit-code", "--heads", remote, &reference]) {
            Ok(output) if output.success() => output
                .stdout
                .lines()
                .any(|line| line.split_whitespace().nth(1) == Some(reference.as_str())),
            Ok(output) => {
                if output.code != Some(2) {
                    tracing::warn!(
                        remote,
                        branch,
                        error = %output.failure_message(),
                        "remote branch lookup failed; treating as absent"
                    );
                }
                false
            }
            Err(e) => {
                tracing::warn!(remote, branch, error = %e, "remote branch lookup failed");
                false
            }
        }
    }

    pub fn fetch(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["fetch", remote, branch])?;
        Ok(())
    }

    /// Create `branch` tracking `remote/branch` and switch to it.
    pub fn checkout_tracking(&self, remote: &str, branch: &str) -> Result<()> {
        let start = format!("{remote}/{branch}");
        self.run(&["checkout", "-b", branch, "--track", &start])?;
        Ok(())
    }

    /// Create `branch` from HEAD and switch to it.
    pub fn checkout_new(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", "-b", branch])?;
        Ok(())
    }

    /// `git pull`, either along the configured upstream or from an explicit
    /// `remote branch`. The raw output is returned so the caller can tell a
    /// conflict from other failures.
    pub fn pull(&self, explicit: Option<(&str, &str)>) -> Result<CommandOutput> {
        let mut args = vec!["pull", "--no-rebase", "--no-edit"];
        if let Some((remote, branch)) = explicit {
            args.push(remote);
            args.push(branch);
        }
        self.output(&args)
    }

    /// `git push`, adding `-u` when the branch has no upstream yet.
    pub fn push(&self, remote: &str, branch: &str, set_upstream: bool) -> Result<CommandOutput> {
        let mut args = vec!["push"];
        if set_upstream {
            args.push("-u");
        }
        args.push(remote);
        args.push(branch);
        self.output(&args)
    }

    /// `git merge --no-edit <rev>`, output returned raw like [`Git::pull`].
    pub fn merge(&self, rev: &str) -> Result<CommandOutput> {
        self.output(&["merge", "--no-edit", rev])
    }
}
