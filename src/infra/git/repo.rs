//! Repository operations.

use std::path::Path;

use super::error::{GitError, Result};
use crate::shared::command::{CommandOutput, CommandRunner};

/// A git working directory driven through a [`CommandRunner`].
#[derive(Clone, Copy)]
pub struct Git<'a> {
    runner: &'a dyn CommandRunner,
    cwd: &'a Path,
}

impl<'a> Git<'a> {
    pub fn new(runner: &'a dyn CommandRunner, cwd: &'a Path) -> Self {
        Self { runner, cwd }
    }

    /// Run git and return the raw output, whatever the exit status.
    pub fn output(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = self
            .runner
            .run("git", args, self.cwd)
            .map_err(GitError::Spawn)?;
        Ok(output)
    }

    /// Run git and return trimmed stdout, failing on a non-zero exit.
    pub fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;
        if !output.success() {
            return Err(GitError::CommandFailed {
                command: args.join(" "),
                message: output.failure_message(),
            }
            .into());
        }
        Ok(output.stdout_trimmed().to_string())
    }

    pub fn is_inside_repository(&self) -> bool {
        self.output(&["rev-parse", "--is-inside-work-tree"])
            .map(|o| o.success() && o.stdout_trimmed() == "true")
            .unwrap_or(false)
    }

    /// Fail with [`GitError::NotInRepo`] unless the directory is inside a work tree.
    pub fn ensure_repository(&self) -> Result<()> {
        if self.is_inside_repository() {
            Ok(())
        } else {
            Err(GitError::NotInRepo.into())
        }
    }

    /// Get the current branch name. A detached HEAD is an error.
    pub fn current_branch(&self) -> Result<String> {
        let output = self.output(&["symbolic-ref", "--quiet", "--short", "HEAD"])?;
        let branch = output.stdout_trimmed();
        if !output.success() || branch.is_empty() {
            return Err(GitError::DetachedHead.into());
        }
        Ok(branch.to_string())
    }

    /// Absolute path of the work tree root.
    pub fn toplevel(&self) -> Result<String> {
        self.run(&["rev-parse", "--show-toplevel"])
    }

    /// Stage every change, including deletions and untracked files.
    pub fn add_all(&self) -> Result<()> {
        self.run(&["add", "--all"])?;
        Ok(())
    }

    /// Whether the index differs from HEAD.
    pub fn has_staged_changes(&self) -> Result<bool> {
        let output = self.output(&["diff", "--cached", "--quiet"])?;
        match output.code {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(GitError::CommandFailed {
                command: "diff --cached --quiet".to_string(),
                message: output.failure_message(),
            }
            .into()),
        }
    }

    pub fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "-m", message])?;
        Ok(())
    }

    pub fn checkout(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", branch])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::testing::{FakeRunner, TestRepo, fail, ok};
    use rstest::rstest;

    fn cwd() -> &'static Path {
        Path::new("/work")
    }

    #[rstest]
    #[case::inside(ok("true\n"), true)]
    #[case::bare_or_gitdir(ok("false\n"), false)]
    #[case::outside(fail(128, "fatal: not a git repository"), false)]
    fn is_inside_repository_reads_rev_parse(#[case] output: CommandOutput, #[case] expected: bool) {
        let runner = FakeRunner::new().on("git rev-parse --is-inside-work-tree", output);
        assert_eq!(Git::new(&runner, cwd()).is_inside_repository(), expected);
    }

    #[test]
    fn ensure_repository_fails_outside() {
        let runner = FakeRunner::new().on(
            "git rev-parse --is-inside-work-tree",
            fail(128, "fatal: not a git repository"),
        );
        let err = Git::new(&runner, cwd()).ensure_repository().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GitError>(),
            Some(GitError::NotInRepo)
        ));
    }

    #[test]
    fn current_branch_returns_short_name() {
        let runner = FakeRunner::on_branch("feat/login");
        assert_eq!(
            Git::new(&runner, cwd()).current_branch().unwrap(),
            "feat/login"
        );
    }

    #[test]
    fn current_branch_detached_is_error() {
        let runner = FakeRunner::new().on("git symbolic-ref --quiet --short HEAD", fail(1, ""));
        let err = Git::new(&runner, cwd()).current_branch().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GitError>(),
            Some(GitError::DetachedHead)
        ));
    }

    #[rstest]
    #[case::no_diff(0, Some(false))]
    #[case::diff(1, Some(true))]
    #[case::error(128, None)]
    fn has_staged_changes_maps_exit_code(#[case] code: i32, #[case] expected: Option<bool>) {
        let runner = FakeRunner::new().on("git diff --cached --quiet", fail(code, ""));
        let result = Git::new(&runner, cwd()).has_staged_changes();
        match expected {
            Some(value) => assert_eq!(result.unwrap(), value),
            None => assert!(result.is_err()),
        }
    }

    #[test]
    fn run_reports_command_and_stderr_on_failure() {
        let runner = FakeRunner::new().on("git checkout nope", fail(1, "error: pathspec 'nope'"));
        let err = Git::new(&runner, cwd()).checkout("nope").unwrap_err();
        match err.downcast_ref::<GitError>() {
            Some(GitError::CommandFailed { command, message }) => {
                assert_eq!(command, "checkout nope");
                assert!(message.contains("pathspec"));
            }
            other => panic!("expected CommandFailed, got: {other:?}"),
        }
    }

    #[test]
    fn real_repository_branch_and_staging() {
        let repo = TestRepo::new();
        let path = repo.path();
        let runner = crate::shared::command::SystemRunner;
        let git = Git::new(&runner, &path);

        assert!(git.is_inside_repository());
        assert_eq!(git.current_branch().unwrap(), "main");
        assert!(!git.has_staged_changes().unwrap());

        repo.write("hello.txt", "hi\n");
        git.add_all().unwrap();
        assert!(git.has_staged_changes().unwrap());

        git.commit("feat: say hi").unwrap();
        assert_eq!(repo.subject("HEAD"), "feat: say hi");
    }

    #[test]
    fn real_directory_outside_repository() {
        let dir = tempfile::tempdir().unwrap();
        let runner = crate::shared::command::SystemRunner;
        assert!(!Git::new(&runner, dir.path()).is_inside_repository());
    }
}
