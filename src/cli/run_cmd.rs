//! The `run` command

use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::warn;

use super::output::Output;
use super::report;
use crate::catalog::identity;
use crate::domain::ProjectIdentifier;
use crate::runner::{BatchRunner, RunOptions};
use crate::storage::{list_projects, Config};
use crate::template::TemplateRegistry;

#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// Evaluate every step and report, without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Worker threads (0 = available parallelism)
    #[arg(long, short = 'j', value_name = "N")]
    pub jobs: Option<usize>,

    /// Additional project names to skip
    #[arg(long, value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Only process the named projects
    #[arg(long, value_name = "NAME")]
    pub only: Vec<String>,

    /// Exit with status 1 when a project fails or an anchor is missing
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: RunArgs, config: &Config, output: &Output) -> Result<ExitCode> {
    let catalog = identity();
    let templates = TemplateRegistry::builtin();
    catalog
        .validate(&templates)
        .context("Built-in catalog is invalid")?;

    let mut exclude = config.run.exclude.clone();
    exclude.extend(args.exclude);

    let discovered = list_projects(&config.root, &config.run.marker_dir, &exclude)?;
    let projects = select(discovered, &args.only)?;
    if projects.is_empty() {
        warn!(root = %config.root.display(), "no projects found");
    }

    let options = RunOptions {
        jobs: args.jobs.unwrap_or(config.run.jobs),
        dry_run: args.dry_run,
    };
    let result = BatchRunner::new(&config.root, &catalog, &templates, options).run(&projects)?;

    report::print(&result, output);

    let strict = args.strict || config.run.strict;
    if strict && (result.has_failures() || result.has_anchor_misses()) {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

/// Narrows discovered projects to `only`; every name must have been discovered
fn select(projects: Vec<ProjectIdentifier>, only: &[String]) -> Result<Vec<ProjectIdentifier>> {
    if only.is_empty() {
        return Ok(projects);
    }

    for name in only {
        if !projects.iter().any(|p| p.as_str() == name) {
            bail!("Unknown project: {} (not found under the root, or excluded)", name);
        }
    }

    Ok(projects
        .into_iter()
        .filter(|p| only.iter().any(|name| name == p.as_str()))
        .collect())
}
