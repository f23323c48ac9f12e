use clap::Subcommand;

/// Configuration management commands.
#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print JSON Schema for the user configuration file
    Schema {
        /// Print the schema of the repository's .shipkit.yaml instead
        #[arg(long)]
        repo: bool,
    },
}

impl ConfigCommands {
    pub fn run(&self) -> anyhow::Result<()> {
        match self {
            Self::Schema { repo } => {
                let schema = if *repo {
                    crate::shared::repo_config::generate_schema()
                } else {
                    crate::shared::config::generate_schema()
                };
                let json = serde_json::to_string_pretty(&schema)?;
                println!("{json}");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn user_schema_lists_branches() {
        let schema = crate::shared::config::generate_schema();
        let value: serde_json::Value = serde_json::to_value(&schema).unwrap();

        assert_eq!(value["title"], "Config");
        assert_eq!(value["type"], "object");
        let props = value["properties"].as_object().unwrap();
        assert!(props.contains_key("branches"));
    }

    #[test]
    fn repo_schema_lists_scopes_and_deploy() {
        let schema = crate::shared::repo_config::generate_schema();
        let value: serde_json::Value = serde_json::to_value(&schema).unwrap();

        assert_eq!(value["title"], "RepoConfig");
        let props = value["properties"].as_object().unwrap();
        assert!(props.contains_key("scopes"));
        assert!(props.contains_key("deploy"));

        let deploy = value["$defs"]["DeployConfig"]["properties"].as_object().unwrap();
        assert_eq!(deploy["environment"]["default"], "production");
        for stage in ["preflight", "build", "deploy", "verify", "rollback", "notify"] {
            assert!(deploy.contains_key(stage), "missing {stage}");
        }
    }
}
