//! Remote resolution.

use super::branch::UpstreamRef;
use super::error::{GitError, Result};
use super::repo::Git;

/// Pick the remote to operate against.
///
/// Order: the upstream's remote, then `origin`, then the first listed remote.
pub fn select_remote(upstream: Option<&UpstreamRef>, remotes: &[String]) -> Option<String> {
    if let Some(upstream) = upstream
        && remotes.iter().any(|r| r == &upstream.remote)
    {
        return Some(upstream.remote.clone());
    }
    if remotes.iter().any(|r| r == "origin") {
        return Some("origin".to_string());
    }
    remotes.first().cloned()
}

impl Git<'_> {
    /// Configured remotes in `git remote` listing order.
    pub fn remotes(&self) -> Result<Vec<String>> {
        let output = self.run(&["remote"])?;
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Fetch URL of `remote`.
    pub fn remote_url(&self, remote: &str) -> Result<String> {
        self.run(&["remote", "get-url", remote])
    }

    /// Remote for the checked-out branch. Fails only when no remote exists.
    pub fn preferred_remote(&self) -> Result<String> {
        let upstream = self.upstream_ref()?;
        let remotes = self.remotes()?;
        select_remote(upstream.as_ref(), &remotes).ok_or_else(|| GitError::NoRemoteConfigured.into())
    }
}
