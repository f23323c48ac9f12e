mod cli;
mod commands;
mod infra;
mod shared;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use shared::{logging, ui};

fn main() {
    logging::init();
    let Cli { command } = Cli::parse();

    if let Err(e) = run(&command) {
        tracing::debug!(error = ?e, "command failed");
        ui::error(command.display_name(), &format!("{e:#}"));
        std::process::exit(1);
    }
}

fn run(command: &Commands) -> anyhow::Result<()> {
    match command {
        Commands::Push(args) => args.run(),
        Commands::Test(args) => args.run(),
        Commands::Main(args) => args.run(),
        Commands::CiInit(args) => args.run(),
        Commands::Deploy(args) => args.run(),
        Commands::Config(config_cmd) => config_cmd.run(),
        Commands::Completions { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "ship", &mut std::io::stdout());
            Ok(())
        }
    }
}
