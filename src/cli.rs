use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::commands::ci_init::CiInitArgs;
use crate::commands::config::ConfigCommands;
use crate::commands::deploy::DeployArgs;
use crate::commands::push::PushArgs;
use crate::commands::to_main::MainArgs;
use crate::commands::to_test::TestArgs;

#[derive(Parser)]
#[command(
    name = "shipkit",
    bin_name = "ship",
    version,
    about,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Commit pending changes, then pull and push the current branch
    Push(PushArgs),

    /// Merge the current branch into the shared test branch and push it
    Test(TestArgs),

    /// Push the current branch and open a merge/pull request into main
    Main(MainArgs),

    /// Write starter CI configuration
    CiInit(CiInitArgs),

    /// Run the deploy pipeline configured in .shipkit.yaml
    Deploy(DeployArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    /// Name shown in front of error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Push(_) => "ship push",
            Self::Test(_) => "ship test",
            Self::Main(_) => "ship main",
            Self::CiInit(_) => "ship ci-init",
            Self::Deploy(_) => "ship deploy",
            Self::Config(_) => "ship config",
            Self::Completions { .. } => "ship completions",
        }
    }
}
