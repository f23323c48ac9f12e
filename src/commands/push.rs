use clap::Args;

use crate::commands::flow::{CommitArgs, FlowContext, commit_if_dirty, sync_and_push, with_system_context};
use crate::shared::ui;

#[derive(Args, Clone, Debug, PartialEq, Eq)]
pub struct PushArgs {
    #[command(flatten)]
    pub commit: CommitArgs,
}

impl PushArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        with_system_context(self.commit.dir.as_deref(), |ctx| self.run_with(ctx))
    }

    /// Commit pending changes, then pull and push the current branch.
    pub fn run_with(&self, ctx: &FlowContext<'_>) -> anyhow::Result<()> {
        let git = ctx.git();
        git.ensure_repository()?;
        let branch = git.current_branch()?;
        let remote = git.preferred_remote()?;

        commit_if_dirty(ctx, &self.commit.commit_options())?;
        sync_and_push(ctx, &remote, &branch)?;
        ui::success(&format!("'{branch}' is in sync with '{remote}'"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::flow::FlowError;
    use crate::infra::git::GitError;
    use crate::shared::command::SystemRunner;
    use crate::shared::prompt::ScriptedPrompter;
    use crate::shared::testing::{FakeRunner, TestRepo, fail, ok};
    use std::path::Path;

    fn args(message: Option<&str>, commit_type: Option<&str>) -> PushArgs {
        PushArgs {
            commit: CommitArgs {
                message: message.map(str::to_string),
                commit_type: commit_type.map(str::to_string),
                ..Default::default()
            },
        }
    }

    #[test]
    fn outside_repository_fails() {
        let runner = FakeRunner::new().on(
            "git rev-parse --is-inside-work-tree",
            fail(128, "fatal: not a git repository"),
        );
        let prompter = ScriptedPrompter::new(&[]);
        let ctx = FlowContext {
            cwd: Path::new("/tmp"),
            interactive: false,
            runner: &runner,
            prompter: &prompter,
        };

        let err = args(None, None).run_with(&ctx).unwrap_err();

        assert!(matches!(err.downcast_ref::<GitError>(), Some(GitError::NotInRepo)));
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn dirty_tree_without_metadata_fails_non_interactively() {
        let runner =
            FakeRunner::on_branch("feat").on("git status --porcelain=v1 -z", ok("?? new.rs\0"));
        let prompter = ScriptedPrompter::new(&[]);
        let ctx = FlowContext {
            cwd: Path::new("/work"),
            interactive: false,
            runner: &runner,
            prompter: &prompter,
        };

        let err = args(None, None).run_with(&ctx).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<FlowError>(),
            Some(FlowError::MissingCommitMetadata)
        ));
        assert!(!runner.was_called_with_prefix("git push"));
    }

    #[test]
    fn end_to_end_commits_and_pushes_new_branch() {
        let repo = TestRepo::new();
        repo.git(&["checkout", "-b", "feat/notes"]);
        repo.write("docs/notes.md", "# Notes\n");
        let path = repo.path();
        let prompter = ScriptedPrompter::new(&[]);
        let ctx = FlowContext {
            cwd: &path,
            interactive: false,
            runner: &SystemRunner,
            prompter: &prompter,
        };

        args(Some("docs(notes): add notes page"), None).run_with(&ctx).unwrap();

        assert!(repo.remote_has("feat/notes"));
        assert_eq!(repo.subject("origin/feat/notes"), "docs(notes): add notes page");
        assert_eq!(
            repo.git(&["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{u}"]),
            "origin/feat/notes"
        );
    }

    #[test]
    fn end_to_end_clean_tree_pulls_and_pushes() {
        let repo = TestRepo::new();
        let path = repo.path();
        let prompter = ScriptedPrompter::new(&[]);
        let ctx = FlowContext {
            cwd: &path,
            interactive: false,
            runner: &SystemRunner,
            prompter: &prompter,
        };

        args(None, None).run_with(&ctx).unwrap();

        assert_eq!(repo.subject("HEAD"), "Initial commit");
    }
}
