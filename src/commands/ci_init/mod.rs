//! `ship ci-init`: write starter CI configuration for GitHub Actions or GitLab CI.

mod template;

pub use template::{Blanks, RenderedFile};

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use thiserror::Error;

use crate::commands::flow::{FlowContext, with_system_context};
use crate::infra::git::{ParsedRemoteLocation, Provider};
use crate::shared::config::{BranchesConfig, load_config};
use crate::shared::prompt::Choice;
use crate::shared::ui;

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CiProvider {
    Github,
    Gitlab,
}

impl CiProvider {
    const ALL: [CiProvider; 2] = [Self::Github, Self::Gitlab];

    fn label(self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Gitlab => "gitlab",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::Github => "GitHub Actions (.github/workflows)",
            Self::Gitlab => "GitLab CI (.gitlab-ci.yml)",
        }
    }

    fn render(self, blanks: &Blanks) -> Vec<RenderedFile> {
        match self {
            Self::Github => template::github(blanks),
            Self::Gitlab => template::gitlab(blanks),
        }
    }
}

#[derive(Args, Clone, Debug, PartialEq, Eq)]
pub struct CiInitArgs {
    /// Run as if started in this directory
    #[arg(short = 'C', long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// CI provider (default: detected from the remote URL, else asked)
    #[arg(long, value_enum)]
    pub provider: Option<CiProvider>,

    /// Overwrite existing files without asking
    #[arg(long)]
    pub force: bool,
}

impl CiInitArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        let config = load_config()?;
        with_system_context(self.dir.as_deref(), |ctx| {
            self.run_with(ctx, &config.branches)?;
            Ok(())
        })
    }

    /// Returns the paths written.
    pub fn run_with(
        &self,
        ctx: &FlowContext<'_>,
        branches: &BranchesConfig,
    ) -> anyhow::Result<Vec<PathBuf>> {
        let root = ctx
            .git()
            .toplevel()
            .ok()
            .filter(|root| !root.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| ctx.cwd.to_path_buf());

        let provider = match self.provider {
            Some(provider) => provider,
            None if ctx.interactive => ask_provider(ctx, detect_provider(ctx))?,
            None => detect_provider(ctx),
        };

        let project = root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "app".to_string());
        let mut blanks = Blanks::defaults(&project, &branches.main, &branches.test);
        if ctx.interactive {
            fill_blanks(ctx, &mut blanks)?;
        }

        let mut written = Vec::new();
        for file in provider.render(&blanks) {
            if let Some(path) = self.write_file(ctx, &root, &file)? {
                written.push(path);
            }
        }

        if written.is_empty() {
            ui::warn("no files written");
        } else {
            ui::success(&format!("Wrote {} {} file(s)", written.len(), provider.label()));
        }
        Ok(written)
    }

    fn write_file(
        &self,
        ctx: &FlowContext<'_>,
        root: &Path,
        file: &RenderedFile,
    ) -> anyhow::Result<Option<PathBuf>> {
        let path = root.join(file.path);
        if path.exists() && !self.force {
            let overwrite = ctx.interactive
                && ctx
                    .prompter
                    .confirm(&format!("{} exists. Overwrite?", file.path), false)?;
            if !overwrite {
                ui::warn(&format!("keeping existing {} (use --force to overwrite)", file.path));
                return Ok(None);
            }
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ScaffoldError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&path, &file.content).map_err(|source| ScaffoldError::Write {
            path: path.clone(),
            source,
        })?;
        ui::detail(&format!("wrote {}", file.path));
        Ok(Some(path))
    }
}

/// GitLab when the remote is recognized as GitLab, GitHub otherwise.
fn detect_provider(ctx: &FlowContext<'_>) -> CiProvider {
    let git = ctx.git();
    let provider = git
        .preferred_remote()
        .and_then(|remote| git.remote_url(&remote))
        .ok()
        .and_then(|url| ParsedRemoteLocation::parse(&url))
        .map(|location| location.provider);
    match provider {
        Some(Provider::GitLab) => CiProvider::Gitlab,
        _ => CiProvider::Github,
    }
}

fn ask_provider(ctx: &FlowContext<'_>, detected: CiProvider) -> anyhow::Result<CiProvider> {
    let mut order = CiProvider::ALL.to_vec();
    order.sort_by_key(|p| *p != detected);
    let choices: Vec<Choice> = order
        .iter()
        .map(|p| Choice::new(p.label(), Some(p.description())))
        .collect();
    let index = ctx.prompter.select("CI provider", &choices)?;
    Ok(order[index])
}

fn fill_blanks(ctx: &FlowContext<'_>, blanks: &mut Blanks) -> anyhow::Result<()> {
    let fields: [(&str, &mut String); 7] = [
        ("Project name", &mut blanks.project),
        ("Main branch", &mut blanks.main_branch),
        ("Test branch", &mut blanks.test_branch),
        ("Install command", &mut blanks.install),
        ("Build command", &mut blanks.build),
        ("Test command", &mut blanks.test),
        ("Deploy command", &mut blanks.deploy),
    ];
    for (label, value) in fields {
        let answer = ctx.prompter.input(label, Some(value.as_str()))?;
        *value = answer.trim().to_string();
    }
    Ok(())
}
