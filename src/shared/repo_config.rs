//! Per-repository `.shipkit.yaml`.
//!
//! Holds the commit scope list for the interactive picker and the shell
//! commands bound to the deploy pipeline hooks.

use std::path::Path;

use schemars::JsonSchema;
use serde::Deserialize;

use crate::shared::config::{parse_yaml, read_first_existing};
use crate::shared::ui;

const FILENAMES: &[&str] = &[".shipkit.yaml", ".shipkit.yml"];

#[derive(Debug, Default, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RepoConfig {
    /// Commit scopes offered by the interactive scope picker.
    #[serde(default)]
    pub scopes: Vec<ScopeEntry>,

    /// Shell commands bound to the deploy pipeline stages.
    #[serde(default)]
    pub deploy: Option<DeployConfig>,
}

/// A scope, either a bare name or a name with a description.
#[derive(Debug, Clone, Deserialize, JsonSchema, PartialEq)]
#[serde(untagged)]
pub enum ScopeEntry {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        description: Option<String>,
    },
}

impl ScopeEntry {
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Detailed { name, .. } => name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Name(_) => None,
            Self::Detailed { description, .. } => description.as_deref(),
        }
    }
}

/// One optional shell command per pipeline stage; only `deploy` is required
/// for `ship deploy` to run.
#[derive(Debug, Default, Clone, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DeployConfig {
    /// Environment name used when `--environment` is not given (default: "production").
    #[serde(default = "default_environment")]
    #[schemars(default = "default_environment")]
    pub environment: String,
    pub preflight: Option<String>,
    pub build: Option<String>,
    pub deploy: Option<String>,
    pub verify: Option<String>,
    pub rollback: Option<String>,
    pub notify: Option<String>,
}

fn default_environment() -> String {
    "production".to_string()
}

/// Load `.shipkit.ya?ml` from the repository root.
/// Returns `Ok(None)` when neither file exists.
pub fn load_repo_config(root: &Path) -> anyhow::Result<Option<RepoConfig>> {
    match read_first_existing(root, FILENAMES)? {
        Some((path, content)) => parse_yaml(&content, &path).map(Some),
        None => Ok(None),
    }
}

/// Scopes for the picker. An absent file yields no scopes silently; an
/// unreadable or malformed one yields no scopes with a warning.
pub fn load_scopes(root: &Path) -> Vec<ScopeEntry> {
    match load_repo_config(root) {
        Ok(Some(config)) => config.scopes,
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring repository config");
            ui::warn(&format!("{e:#}; continuing without scopes"));
            Vec::new()
        }
    }
}

pub fn generate_schema() -> schemars::Schema {
    schemars::schema_for!(RepoConfig)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn absent_file_is_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load_repo_config(dir.path()).unwrap(), None);
        assert!(load_scopes(dir.path()).is_empty());
    }

    #[test]
    fn scopes_accept_plain_and_detailed_entries() {
        let dir = TempDir::new().unwrap();
        let yaml = "\
scopes:
  - api
  - name: ui
    description: Frontend components
";
        fs::write(dir.path().join(".shipkit.yaml"), yaml).unwrap();

        let scopes = load_scopes(dir.path());
        assert_eq!(scopes.len(), 2);
        assert_eq!(scopes[0].name(), "api");
        assert_eq!(scopes[0].description(), None);
        assert_eq!(scopes[1].name(), "ui");
        assert_eq!(scopes[1].description(), Some("Frontend components"));
    }

    #[test]
    fn yml_extension_is_found() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".shipkit.yml"), "scopes: [core]\n").unwrap();
        assert_eq!(load_scopes(dir.path())[0].name(), "core");
    }

    #[test]
    fn malformed_file_yields_no_scopes() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".shipkit.yaml"), "scopes: [unclosed\n").unwrap();

        assert!(load_repo_config(dir.path()).is_err());
        assert!(load_scopes(dir.path()).is_empty());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".shipkit.yaml"), "scopez: [a]\n").unwrap();

        assert!(load_repo_config(dir.path()).is_err());
        assert!(load_scopes(dir.path()).is_empty());
    }

    #[test]
    fn deploy_section_defaults_environment() {
        let dir = TempDir::new().unwrap();
        let yaml = "\
deploy:
  build: make build
  deploy: ./scripts/deploy.sh
";
        fs::write(dir.path().join(".shipkit.yaml"), yaml).unwrap();

        let deploy = load_repo_config(dir.path()).unwrap().unwrap().deploy.unwrap();
        assert_eq!(deploy.environment, "production");
        assert_eq!(deploy.build.as_deref(), Some("make build"));
        assert_eq!(deploy.deploy.as_deref(), Some("./scripts/deploy.sh"));
        assert_eq!(deploy.verify, None);
    }
}
