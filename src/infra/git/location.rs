//! Hosting-provider view of a remote URL.

use lazy_regex::regex_captures;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    GitHub,
    GitLab,
    Unknown,
}

impl Provider {
    fn from_host(host: &str) -> Self {
        let host = host.to_ascii_lowercase();
        if host.contains("github") {
            Self::GitHub
        } else if host.contains("gitlab") {
            Self::GitLab
        } else {
            Self::Unknown
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GitHub => "github",
            Self::GitLab => "gitlab",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Host, owner path and repository name of a remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRemoteLocation {
    pub host: String,
    /// Owner path, possibly nested (`group/sub`).
    pub owner: String,
    pub repo: String,
    pub provider: Provider,
}

impl ParsedRemoteLocation {
    /// Parse a remote URL. Returns `None` for anything without a host and at
    /// least an owner and a repository segment (e.g. local paths).
    pub fn parse(url: &str) -> Option<Self> {
        let url = url.trim();
        let (host, path) = if url.contains("://") {
            // https://host/owner/repo.git, ssh://git@host:22/owner/repo.git
            let (_, host, path) =
                regex_captures!(r"^[a-z][a-z0-9+.-]*://(?:[^@/]+@)?([^/:]+)(?::\d+)?/(.+)$", url)?;
            (host, path)
        } else {
            // git@host:owner/repo.git
            let (_, host, path) = regex_captures!(r"^(?:[^@/:]+@)?([^:/]+):(.+)$", url)?;
            (host, path)
        };

        let path = path.trim_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);
        let (owner, repo) = path.rsplit_once('/')?;
        if owner.is_empty() || repo.is_empty() || host.is_empty() {
            return None;
        }

        Some(Self {
            host: host.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            provider: Provider::from_host(host),
        })
    }

    /// `https://{host}/{owner}/{repo}`
    pub fn web_url(&self) -> String {
        format!("https://{}/{}/{}", self.host, self.owner, self.repo)
    }
}
