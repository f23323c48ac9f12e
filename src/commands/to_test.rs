use clap::Args;

use crate::commands::flow::{CommitArgs, FlowContext, merge_into, with_system_context};
use crate::shared::config::load_config;

#[derive(Args, Clone, Debug, PartialEq, Eq)]
pub struct TestArgs {
    /// Branch to merge into (default: `branches.test` from the config, else "test")
    #[arg(short = 'b', long = "branch", value_name = "BRANCH")]
    pub target: Option<String>,

    #[command(flatten)]
    pub commit: CommitArgs,
}

impl TestArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        let target = match &self.target {
            Some(target) => target.clone(),
            None => load_config()?.branches.test,
        };
        with_system_context(self.commit.dir.as_deref(), |ctx| self.run_with(ctx, &target))
    }

    pub fn run_with(&self, ctx: &FlowContext<'_>, target: &str) -> anyhow::Result<()> {
        merge_into(ctx, target, &self.commit.commit_options())
    }
}
