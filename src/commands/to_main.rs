use clap::Args;

use crate::commands::flow::{CommitArgs, FlowContext, request_into, with_system_context};
use crate::shared::config::load_config;

#[derive(Args, Clone, Debug, PartialEq, Eq)]
pub struct MainArgs {
    /// Branch the request targets (default: `branches.main` from the config, else "main")
    #[arg(short = 'b', long = "branch", value_name = "BRANCH")]
    pub target: Option<String>,

    #[command(flatten)]
    pub commit: CommitArgs,
}

impl MainArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        let target = match &self.target {
            Some(target) => target.clone(),
            None => load_config()?.branches.main,
        };
        with_system_context(self.commit.dir.as_deref(), |ctx| self.run_with(ctx, &target))
    }

    pub fn run_with(&self, ctx: &FlowContext<'_>, target: &str) -> anyhow::Result<()> {
        request_into(ctx, target, &self.commit.commit_options())?;
        Ok(())
    }
}
