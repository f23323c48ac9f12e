use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::Deserialize;

use crate::shared::dirs;

/// Top-level user configuration for shipkit.
#[derive(Debug, Default, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Default branch names used by `ship test` and `ship main`.
    #[serde(default)]
    pub branches: BranchesConfig,
}

/// Branch name defaults. Command-line flags take precedence.
#[derive(Debug, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BranchesConfig {
    /// Shared integration branch `ship test` merges into (default: "test").
    #[serde(default = "default_test_branch")]
    #[schemars(default = "default_test_branch")]
    pub test: String,

    /// Branch `ship main` opens merge requests against (default: "main").
    #[serde(default = "default_main_branch")]
    #[schemars(default = "default_main_branch")]
    pub main: String,
}

impl Default for BranchesConfig {
    fn default() -> Self {
        Self {
            test: default_test_branch(),
            main: default_main_branch(),
        }
    }
}

fn default_test_branch() -> String {
    "test".to_string()
}

fn default_main_branch() -> String {
    "main".to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read config file (permission error, etc.)
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML parse error
    #[error("Invalid config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },
}

/// Load configuration from ~/.config/shipkit/config.ya?ml.
/// Returns Config::default() if no config file exists.
pub fn load_config() -> anyhow::Result<Config> {
    let Some(dir) = dirs::config_dir() else {
        return Ok(Config::default());
    };
    load_config_from_dir(&dir.join("shipkit"))
}

/// Load configuration from a specific directory.
/// Searches for config.yaml, then config.yml in the given directory.
/// Returns Config::default() if neither file exists.
pub fn load_config_from_dir(dir: &Path) -> anyhow::Result<Config> {
    match read_first_existing(dir, &["config.yaml", "config.yml"])? {
        Some((path, content)) => parse_yaml(&content, &path),
        None => Ok(Config::default()),
    }
}

/// Read the first of `filenames` that exists in `dir`.
pub(crate) fn read_first_existing(
    dir: &Path,
    filenames: &[&str],
) -> anyhow::Result<Option<(PathBuf, String)>> {
    for filename in filenames {
        let path = dir.join(filename);
        match std::fs::read_to_string(&path) {
            Ok(content) => return Ok(Some((path, content))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => return Err(ConfigError::ReadError { path, source: e }.into()),
        }
    }
    Ok(None)
}

/// Parse YAML content, attributing errors to `path`.
pub(crate) fn parse_yaml<T: serde::de::DeserializeOwned>(
    content: &str,
    path: &Path,
) -> anyhow::Result<T> {
    serde_yaml::from_str(content)
        .map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
        .map_err(Into::into)
}

/// Generate JSON Schema for the Config struct.
pub fn generate_schema() -> schemars::Schema {
    schemars::schema_for!(Config)
}
