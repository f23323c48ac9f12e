pub mod command;
pub mod config;
pub mod dirs;
pub mod env_var;
pub mod logging;
pub mod prompt;
pub mod repo_config;
#[cfg(test)]
pub mod testing;
pub mod ui;
