use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error(
        "No usable commit message: pass --message with a conventional prefix, or --message with --type, when not running in a terminal"
    )]
    MissingCommitMetadata,

    #[error("Unknown commit type '{given}' (expected one of: {expected})")]
    UnknownCommitType { given: String, expected: String },

    #[error("Invalid scope '{0}': scopes cannot contain whitespace or parentheses")]
    InvalidScope(String),

    #[error("Failed to sync '{branch}': {message}")]
    SyncFailed { branch: String, message: String },

    #[error("{}", conflict_message(.action, .paths))]
    MergeConflict { action: String, paths: Vec<String> },

    #[error(
        "Already on '{branch}'; check out the branch you want to merge into '{branch}' and rerun"
    )]
    InvalidSourceBranch { branch: String },

    #[error("{}", no_tool_message(.manual_url.as_deref()))]
    NoMergeRequestToolAvailable { manual_url: Option<String> },
}

fn conflict_message(action: &str, paths: &[String]) -> String {
    let mut message = format!("Conflicts while {action} in {} file(s):", paths.len());
    for path in paths {
        message.push_str("\n  ");
        message.push_str(path);
    }
    message.push_str("\nResolve the conflicts, commit the result, then rerun the same command.");
    message
}

fn no_tool_message(manual_url: Option<&str>) -> String {
    match manual_url {
        Some(url) => format!(
            "Could not open a merge request with `gh` or `glab`; open it manually: {url}"
        ),
        None => "Could not open a merge request with `gh` or `glab`".to_string(),
    }
}

pub type Result<T> = anyhow::Result<T>;
