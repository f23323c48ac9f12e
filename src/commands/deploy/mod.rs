//! `ship deploy`: run the deploy pipeline with hooks from `.shipkit.yaml`.

mod error;
mod pipeline;
mod shell;

pub use error::{DeployError, Result};
pub use pipeline::{DeployContext, DeployResult, run_pipeline};
pub use shell::ShellHooks;

use std::path::{Path, PathBuf};

use clap::Args;

use crate::commands::flow::resolve_dir;
use crate::infra::git::Git;
use crate::shared::command::{CommandRunner, SystemRunner};
use crate::shared::repo_config::load_repo_config;
use crate::shared::ui;

#[derive(Args, Clone, Debug, PartialEq, Eq)]
pub struct DeployArgs {
    /// Run as if started in this directory
    #[arg(short = 'C', long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Target environment (default: `deploy.environment`, else "production")
    #[arg(short, long)]
    pub environment: Option<String>,

    /// Print the commands each stage would run without running them
    #[arg(long)]
    pub dry_run: bool,
}

impl DeployArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        let cwd = resolve_dir(self.dir.as_deref())?;
        self.run_with(&SystemRunner, &cwd)?;
        Ok(())
    }

    pub fn run_with(&self, runner: &dyn CommandRunner, cwd: &Path) -> Result<DeployResult> {
        let git = Git::new(runner, cwd);
        let root = git
            .toplevel()
            .ok()
            .filter(|root| !root.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| cwd.to_path_buf());

        let config = load_repo_config(&root)?
            .and_then(|c| c.deploy)
            .ok_or(DeployError::NotConfigured)?;
        let hooks = ShellHooks::new(&config, runner)?;

        let environment = self.environment.as_deref().unwrap_or(&config.environment);
        let version = git.run(&["rev-parse", "--short", "HEAD"]).ok();
        let ctx = DeployContext::new(environment, version, root, self.dry_run);

        let result = run_pipeline(&hooks, &ctx)?;
        if self.dry_run {
            ui::success(&format!("Dry run for '{}' finished", ctx.environment));
        } else {
            ui::success(&format!(
                "Deployed {} to '{}' ({})",
                result.version, result.environment, result.id
            ));
        }
        Ok(result)
    }
}
