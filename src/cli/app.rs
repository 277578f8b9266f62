//! Main CLI application structure

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::{catalog_cmd, projects_cmd, run_cmd};
use crate::storage::Config;

#[derive(Parser)]
#[command(name = "scaffold")]
#[command(author, version, about = "Scaffold identity support into generated application projects")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory containing the projects
    #[arg(long, short = 'r', global = true, env = "SCAFFOLD_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply the identity catalog to every project (default)
    Run(run_cmd::RunArgs),

    /// List the projects a run would touch
    Projects {
        /// Additional project names to skip
        #[arg(long, value_name = "NAME")]
        exclude: Vec<String>,
    },

    /// List the catalog's generation and patch steps
    Catalog,
}

/// Main entry point for the CLI
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(&cli.root)?;
    debug!(root = %cli.root.display(), run = ?config.run, "configuration loaded");

    let format = cli
        .format
        .unwrap_or_else(|| OutputFormat::from(config.global.default_format));
    let output = Output::new(format, cli.verbose);

    match cli.command {
        None => run_cmd::run(run_cmd::RunArgs::default(), &config, &output),
        Some(Commands::Run(args)) => run_cmd::run(args, &config, &output),
        Some(Commands::Projects { exclude }) => {
            projects_cmd::run(&config, &exclude, &output)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Catalog) => {
            catalog_cmd::run(&output)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Installs the stderr subscriber; `RUST_LOG` overrides the default level
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
