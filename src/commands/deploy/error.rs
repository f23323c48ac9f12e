use thiserror::Error;

use super::pipeline::Stage;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("No deploy command configured: add `deploy.deploy` to .shipkit.yaml")]
    NotConfigured,

    #[error("Deploy stage '{stage}' failed: {message}")]
    StageFailed { stage: Stage, message: String },
}

pub type Result<T> = anyhow::Result<T>;
