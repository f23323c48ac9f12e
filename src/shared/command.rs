//! External process invocation.
//!
//! Every `git`, `gh` and `glab` call goes through [`CommandRunner`] so the
//! workflows can be driven by a scripted fake in tests.

use std::path::Path;
use std::process::Command;

/// Captured result of one external process run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Trimmed stdout.
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }

    /// Best human-readable failure text: stderr if present, else stdout.
    pub fn failure_message(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }
}

/// Capability for running external programs.
pub trait CommandRunner {
    /// Run `program` with `args` in `cwd`, capturing stdout and stderr.
    ///
    /// A non-zero exit is not an error here; only a failure to spawn is.
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> std::io::Result<CommandOutput>;

    /// Whether `program` can be found on `PATH`.
    fn is_available(&self, program: &str) -> bool;
}

/// Runs real processes.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> std::io::Result<CommandOutput> {
        tracing::debug!(program, args = ?args, cwd = %cwd.display(), "running command");

        let output = Command::new(program).args(args).current_dir(cwd).output()?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::debug!(program, code = ?result.code, "command finished");
        Ok(result)
    }

    fn is_available(&self, program: &str) -> bool {
        let Some(path_var) = std::env::var_os("PATH") else {
            return false;
        };
        std::env::split_paths(&path_var).any(|dir| is_executable(&dir.join(program)))
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
