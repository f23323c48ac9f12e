//! Deploy hooks bound to the shell commands in `.shipkit.yaml`.
//!
//! Commands are split with shell quoting rules and run directly, not through
//! a shell. `{environment}`, `{version}`, `{stage}` and `{outcome}` are
//! replaced inside each word after splitting, so a value never adds or
//! merges arguments. A word left empty by substitution is dropped.

use chrono::Utc;

use super::error::{DeployError, Result};
use super::pipeline::{DeployArtifact, DeployContext, DeployHooks, DeployResult, Outcome, Stage};
use crate::shared::command::{CommandOutput, CommandRunner};
use crate::shared::repo_config::DeployConfig;
use crate::shared::ui;

pub struct ShellHooks<'a> {
    config: &'a DeployConfig,
    runner: &'a dyn CommandRunner,
}

impl<'a> ShellHooks<'a> {
    /// Fails with [`DeployError::NotConfigured`] when no deploy command is set.
    pub fn new(config: &'a DeployConfig, runner: &'a dyn CommandRunner) -> Result<Self> {
        match config.deploy.as_deref() {
            Some(command) if !command.trim().is_empty() => Ok(Self { config, runner }),
            _ => Err(DeployError::NotConfigured.into()),
        }
    }

    fn command(&self, stage: Stage) -> Option<&'a str> {
        let config = self.config;
        let command = match stage {
            Stage::Preflight => &config.preflight,
            Stage::Build => &config.build,
            Stage::Deploy => &config.deploy,
            Stage::Verify => &config.verify,
            Stage::Rollback => &config.rollback,
            Stage::Notify => &config.notify,
        };
        command.as_deref().filter(|c| !c.trim().is_empty())
    }

    /// Run the command bound to `stage`. `Ok(None)` when nothing is bound
    /// or on a dry run.
    fn run(
        &self,
        stage: Stage,
        ctx: &DeployContext,
        vars: &[(&str, &str)],
    ) -> Result<Option<CommandOutput>> {
        let Some(template) = self.command(stage) else {
            ui::detail(&format!("no {stage} command configured, skipping"));
            return Ok(None);
        };

        let words = shlex::split(template).ok_or_else(|| DeployError::StageFailed {
            stage,
            message: format!("cannot parse command: {template}"),
        })?;
        let words: Vec<String> = words
            .iter()
            .map(|word| expand(word, ctx, vars))
            .filter(|word| !word.is_empty())
            .collect();
        let command = display(&words);
        if ctx.dry_run {
            ui::detail(&format!("would run: {command}"));
            return Ok(None);
        }

        let (program, args) = words.split_first().ok_or_else(|| DeployError::StageFailed {
            stage,
            message: "empty command".to_string(),
        })?;
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        ui::detail(&command);
        let output = self
            .runner
            .run(program, &args, &ctx.workdir)
            .map_err(|e| DeployError::StageFailed {
                stage,
                message: format!("cannot run `{program}`: {e}"),
            })?;
        if !output.success() {
            return Err(DeployError::StageFailed {
                stage,
                message: output.failure_message(),
            }
            .into());
        }
        Ok(Some(output))
    }
}

fn expand(word: &str, ctx: &DeployContext, vars: &[(&str, &str)]) -> String {
    let mut word = word
        .replace("{environment}", &ctx.environment)
        .replace("{version}", ctx.version_or_unknown());
    for (key, value) in vars {
        word = word.replace(&format!("{{{key}}}"), value);
    }
    word
}

/// Command line as a shell would need it typed, for logs and dry runs.
fn display(words: &[String]) -> String {
    words
        .iter()
        .map(|word| shlex::try_quote(word).map_or_else(|_| word.clone(), |q| q.into_owned()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn captured(output: Option<CommandOutput>) -> Option<String> {
    output
        .map(|o| o.stdout_trimmed().to_string())
        .filter(|s| !s.is_empty())
}

impl DeployHooks for ShellHooks<'_> {
    fn preflight(&self, ctx: &DeployContext) -> Result<()> {
        self.run(Stage::Preflight, ctx, &[])?;
        Ok(())
    }

    fn build(&self, ctx: &DeployContext) -> Result<Option<DeployArtifact>> {
        if self.command(Stage::Build).is_none() {
            ui::detail("no build command configured, skipping");
            return Ok(None);
        }
        let output = self.run(Stage::Build, ctx, &[])?;
        Ok(Some(DeployArtifact {
            version: ctx.version_or_unknown().to_string(),
            built_at: Utc::now(),
            output: captured(output),
        }))
    }

    fn deploy(&self, ctx: &DeployContext, _artifact: Option<&DeployArtifact>) -> Result<DeployResult> {
        let output = self.run(Stage::Deploy, ctx, &[])?;
        Ok(DeployResult::new(ctx, captured(output)))
    }

    fn verify(&self, ctx: &DeployContext, _result: &DeployResult) -> Result<()> {
        self.run(Stage::Verify, ctx, &[])?;
        Ok(())
    }

    fn rollback(&self, ctx: &DeployContext, failed: Stage, _error: &anyhow::Error) -> Result<()> {
        self.run(Stage::Rollback, ctx, &[("stage", failed.as_str())])?;
        Ok(())
    }

    fn notify(&self, ctx: &DeployContext, outcome: &Outcome<'_>) -> Result<()> {
        let stage = match outcome {
            Outcome::Success(_) => "",
            Outcome::Failure { stage, .. } => stage.as_str(),
        };
        self.run(
            Stage::Notify,
            ctx,
            &[("outcome", outcome.label()), ("stage", stage)],
        )?;
        Ok(())
    }
}
