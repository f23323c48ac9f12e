//! Fixed-order deploy pipeline with user-supplied hooks.
//!
//! Stages run as preflight, build, deploy, verify. A failure in any of them
//! runs rollback then notify before the original error is returned; errors
//! raised by those two while recovering are only warned about.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::Result;
use crate::shared::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Preflight,
    Build,
    Deploy,
    Verify,
    Rollback,
    Notify,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Preflight => "preflight",
            Self::Build => "build",
            Self::Deploy => "deploy",
            Self::Verify => "verify",
            Self::Rollback => "rollback",
            Self::Notify => "notify",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployContext {
    pub environment: String,
    /// Revision being deployed, when known.
    pub version: Option<String>,
    pub workdir: PathBuf,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
}

impl DeployContext {
    pub fn new(environment: &str, version: Option<String>, workdir: PathBuf, dry_run: bool) -> Self {
        Self {
            environment: environment.to_string(),
            version,
            workdir,
            dry_run,
            started_at: Utc::now(),
        }
    }

    pub fn version_or_unknown(&self) -> &str {
        self.version.as_deref().unwrap_or("unknown")
    }
}

/// What the build stage produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployArtifact {
    pub version: String,
    pub built_at: DateTime<Utc>,
    pub output: Option<String>,
}

/// What the deploy stage reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployResult {
    pub id: Uuid,
    pub environment: String,
    pub version: String,
    pub deployed_at: DateTime<Utc>,
    pub output: Option<String>,
}

impl DeployResult {
    pub fn new(ctx: &DeployContext, output: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            environment: ctx.environment.clone(),
            version: ctx.version_or_unknown().to_string(),
            deployed_at: Utc::now(),
            output,
        }
    }
}

/// Passed to the notify hook.
#[derive(Debug)]
pub enum Outcome<'a> {
    Success(&'a DeployResult),
    Failure {
        stage: Stage,
        error: &'a anyhow::Error,
    },
}

impl Outcome<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::Failure { .. } => "failure",
        }
    }
}

/// The stages a deployment can hook into. Only `deploy` is mandatory.
pub trait DeployHooks {
    fn preflight(&self, _ctx: &DeployContext) -> Result<()> {
        Ok(())
    }

    fn build(&self, _ctx: &DeployContext) -> Result<Option<DeployArtifact>> {
        Ok(None)
    }

    fn deploy(&self, ctx: &DeployContext, artifact: Option<&DeployArtifact>) -> Result<DeployResult>;

    fn verify(&self, _ctx: &DeployContext, _result: &DeployResult) -> Result<()> {
        Ok(())
    }

    fn rollback(&self, _ctx: &DeployContext, _failed: Stage, _error: &anyhow::Error) -> Result<()> {
        Ok(())
    }

    fn notify(&self, _ctx: &DeployContext, _outcome: &Outcome<'_>) -> Result<()> {
        Ok(())
    }
}

pub fn run_pipeline(hooks: &dyn DeployHooks, ctx: &DeployContext) -> Result<DeployResult> {
    tracing::info!(environment = %ctx.environment, version = ctx.version_or_unknown(), "deploy started");

    match run_stages(hooks, ctx) {
        Ok(result) => {
            if let Err(e) = hooks.notify(ctx, &Outcome::Success(&result)) {
                warn_hook(Stage::Notify, &e);
            }
            Ok(result)
        }
        Err((stage, error)) => {
            tracing::warn!(stage = %stage, error = %error, "deploy failed, recovering");
            ui::warn(&format!("stage '{stage}' failed, rolling back"));
            if let Err(e) = hooks.rollback(ctx, stage, &error) {
                warn_hook(Stage::Rollback, &e);
            }
            let outcome = Outcome::Failure {
                stage,
                error: &error,
            };
            if let Err(e) = hooks.notify(ctx, &outcome) {
                warn_hook(Stage::Notify, &e);
            }
            Err(error)
        }
    }
}

fn run_stages(
    hooks: &dyn DeployHooks,
    ctx: &DeployContext,
) -> std::result::Result<DeployResult, (Stage, anyhow::Error)> {
    run_stage(Stage::Preflight, || hooks.preflight(ctx))?;
    let artifact = run_stage(Stage::Build, || hooks.build(ctx))?;
    let result = run_stage(Stage::Deploy, || hooks.deploy(ctx, artifact.as_ref()))?;
    run_stage(Stage::Verify, || hooks.verify(ctx, &result))?;
    Ok(result)
}

fn run_stage<T>(
    stage: Stage,
    f: impl FnOnce() -> Result<T>,
) -> std::result::Result<T, (Stage, anyhow::Error)> {
    ui::step(&format!("Stage: {stage}"));
    tracing::debug!(stage = %stage, "running stage");
    f().map_err(|e| (stage, e))
}

fn warn_hook(stage: Stage, error: &anyhow::Error) {
    tracing::warn!(stage = %stage, error = %error, "hook failed during recovery");
    ui::warn(&format!("{stage} hook failed: {error:#}"));
}
