//! Merge/PR Request Builder: open a request from the current branch into a
//! target branch through `gh` or `glab`, or hand back a web link.

use lazy_regex::regex;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;

use super::commit::{CommitOptions, commit_if_dirty};
use super::context::FlowContext;
use super::error::{FlowError, Result};
use super::sync::sync_and_push;
use crate::infra::git::{ParsedRemoteLocation, Provider};
use crate::shared::ui;

/// Unreserved characters stay as-is; everything else is escaped.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Like [`QUERY_VALUE`] but keeps `/` so branch names read naturally in paths.
const PATH_VALUE: &AsciiSet = &QUERY_VALUE.remove(b'/');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestTool {
    Gh,
    Glab,
}

impl RequestTool {
    pub fn program(self) -> &'static str {
        match self {
            Self::Gh => "gh",
            Self::Glab => "glab",
        }
    }

    fn list_args<'a>(self, source: &'a str, target: &'a str) -> Vec<&'a str> {
        match self {
            Self::Gh => vec![
                "pr", "list", "--head", source, "--base", target, "--state", "open", "--json",
                "url",
            ],
            Self::Glab => vec![
                "mr",
                "list",
                "--source-branch",
                source,
                "--target-branch",
                target,
                "--output",
                "json",
            ],
        }
    }

    fn create_args<'a>(self, source: &'a str, target: &'a str) -> Vec<&'a str> {
        match self {
            Self::Gh => vec!["pr", "create", "--base", target, "--head", source, "--fill"],
            Self::Glab => vec![
                "mr",
                "create",
                "--source-branch",
                source,
                "--target-branch",
                target,
                "--fill",
                "--yes",
            ],
        }
    }
}

/// Only a host recognized as GitHub tries `gh` first.
pub fn tool_order(provider: Option<Provider>) -> [RequestTool; 2] {
    match provider {
        Some(Provider::GitHub) => [RequestTool::Gh, RequestTool::Glab],
        _ => [RequestTool::Glab, RequestTool::Gh],
    }
}

/// `gh pr list --json url` and `glab mr list --output json` entries.
#[derive(Debug, Deserialize)]
struct ExistingRequest {
    #[serde(alias = "web_url")]
    url: String,
}

/// Web page for opening the request by hand.
pub fn manual_request_url(location: &ParsedRemoteLocation, source: &str, target: &str) -> String {
    match location.provider {
        Provider::GitHub => format!(
            "{}/compare/{}...{}?expand=1",
            location.web_url(),
            utf8_percent_encode(target, PATH_VALUE),
            utf8_percent_encode(source, PATH_VALUE),
        ),
        Provider::GitLab | Provider::Unknown => format!(
            "{}/-/merge_requests/new?merge_request%5Bsource_branch%5D={}&merge_request%5Btarget_branch%5D={}",
            location.web_url(),
            utf8_percent_encode(source, QUERY_VALUE),
            utf8_percent_encode(target, QUERY_VALUE),
        ),
    }
}

/// Commit, sync the current branch and open a request into `target`.
/// Returns the request URL.
pub fn request_into(ctx: &FlowContext<'_>, target: &str, options: &CommitOptions) -> Result<String> {
    let git = ctx.git();
    git.ensure_repository()?;
    let source = git.current_branch()?;
    if source == target {
        return Err(FlowError::InvalidSourceBranch {
            branch: source,
        }
        .into());
    }
    let remote = git.preferred_remote()?;

    commit_if_dirty(ctx, options)?;
    sync_and_push(ctx, &remote, &source)?;

    let url = git.remote_url(&remote)?;
    let location = ParsedRemoteLocation::parse(&url);
    if location.is_none() {
        tracing::warn!(remote = %remote, url = %url, "remote URL not recognized");
    }

    let request_url = open_request(ctx, location.as_ref(), &source, target)?;
    println!("{request_url}");
    Ok(request_url)
}

/// Try each usable tool in provider order; fall back to a manual link.
pub fn open_request(
    ctx: &FlowContext<'_>,
    location: Option<&ParsedRemoteLocation>,
    source: &str,
    target: &str,
) -> Result<String> {
    for tool in tool_order(location.map(|l| l.provider)) {
        if !ctx.runner.is_available(tool.program()) {
            tracing::debug!(tool = tool.program(), "not on PATH");
            continue;
        }

        if let Some(url) = find_existing(ctx, tool, source, target) {
            ui::success(&format!("A request from '{source}' into '{target}' is already open"));
            return Ok(url);
        }

        ui::step(&format!(
            "Opening a request from '{source}' into '{target}' with `{}`",
            tool.program()
        ));
        let spinner = ui::spinner(&format!("{} create", tool.program()));
        let output = ctx
            .runner
            .run(tool.program(), &tool.create_args(source, target), ctx.cwd);
        spinner.finish_and_clear();

        match output {
            Ok(output) if output.success() => {
                ui::success(&format!("Opened a request into '{target}'"));
                return Ok(extract_url(&output.stdout));
            }
            Ok(output) => ui::warn(&format!(
                "`{}` could not open the request: {}",
                tool.program(),
                output.failure_message()
            )),
            Err(e) => ui::warn(&format!("could not run `{}`: {e}", tool.program())),
        }
    }

    Err(FlowError::NoMergeRequestToolAvailable {
        manual_url: location.map(|l| manual_request_url(l, source, target)),
    }
    .into())
}

/// URL of an already-open request. Any failure reads as "none".
fn find_existing(ctx: &FlowContext<'_>, tool: RequestTool, source: &str, target: &str) -> Option<String> {
    let output = ctx
        .runner
        .run(tool.program(), &tool.list_args(source, target), ctx.cwd)
        .ok()
        .filter(|o| o.success())?;

    match serde_json::from_str::<Vec<ExistingRequest>>(output.stdout_trimmed()) {
        Ok(requests) => requests.into_iter().next().map(|r| r.url),
        Err(e) => {
            tracing::debug!(tool = tool.program(), error = %e, "unreadable request list");
            None
        }
    }
}

/// Last URL printed by the tool, or its whole output when there is none.
fn extract_url(stdout: &str) -> String {
    regex!(r"https?://\S+")
        .find_iter(stdout)
        .last()
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| stdout.trim().to_string())
}
