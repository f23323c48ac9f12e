use std::path::{Path, PathBuf};
use std::process::Command;

/// A temporary git repository cloned from a temporary bare remote.
///
/// Used by the end-to-end workflow tests, which drive the real `git` CLI.
pub struct TestRepo {
    _remote_dir: tempfile::TempDir,
    work_dir: tempfile::TempDir,
}

impl TestRepo {
    /// Create a git Command with isolated config (ignores global/system settings).
    fn git_command(dir: &Path) -> Command {
        let mut cmd = Command::new("git");
        cmd.current_dir(dir);
        cmd.env("GIT_CONFIG_GLOBAL", "/dev/null");
        cmd.env("GIT_CONFIG_SYSTEM", "/dev/null");
        cmd
    }

    fn git_in(dir: &Path, args: &[&str]) -> String {
        let output = Self::git_command(dir)
            .args(args)
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Create a bare `origin` with a `main` branch holding one commit, and a
    /// working clone of it checked out on `main`.
    pub fn new() -> Self {
        let remote_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let work_dir = tempfile::tempdir().expect("Failed to create temp dir");

        Self::git_in(remote_dir.path(), &["init", "--bare"]);
        Self::git_in(remote_dir.path(), &["symbolic-ref", "HEAD", "refs/heads/main"]);

        Self::git_in(work_dir.path(), &["init"]);
        Self::git_in(work_dir.path(), &["symbolic-ref", "HEAD", "refs/heads/main"]);
        Self::git_in(work_dir.path(), &["config", "user.email", "test@example.com"]);
        Self::git_in(work_dir.path(), &["config", "user.name", "Test User"]);
        Self::git_in(work_dir.path(), &["config", "commit.gpgsign", "false"]);
        let remote_url = remote_dir.path().to_string_lossy().to_string();
        Self::git_in(work_dir.path(), &["remote", "add", "origin", &remote_url]);
        Self::git_in(work_dir.path(), &["commit", "--allow-empty", "-m", "Initial commit"]);
        Self::git_in(work_dir.path(), &["push", "-u", "origin", "main"]);

        Self {
            _remote_dir: remote_dir,
            work_dir,
        }
    }

    /// Get the canonicalized path to the working clone.
    /// This resolves symlinks (e.g., /var -> /private/var on macOS).
    pub fn path(&self) -> PathBuf {
        self.work_dir
            .path()
            .canonicalize()
            .expect("Failed to canonicalize path")
    }

    /// Run git in the working clone and return trimmed stdout.
    pub fn git(&self, args: &[&str]) -> String {
        Self::git_in(&self.path(), args)
    }

    /// Write a file relative to the working clone.
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Subject line of the latest commit on `rev`.
    pub fn subject(&self, rev: &str) -> String {
        self.git(&["log", "-1", "--format=%s", rev])
    }

    /// Whether the remote has `branch`.
    pub fn remote_has(&self, branch: &str) -> bool {
        !self
            .git(&["ls-remote", "--heads", "origin", &format!("refs/heads/{branch}")])
            .is_empty()
    }
}
