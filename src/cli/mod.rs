//! # Command-Line Interface
//!
//! The `scaffold` binary.
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `run` (default) | Apply the identity catalog to every project |
//! | `projects` | List the projects a run would touch |
//! | `catalog` | List the generation and patch steps |
//!
//! ## Output Formats
//!
//! All commands support `--format`:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! The default can be changed with `default_format` in the global config.
//!
//! ## Logging
//!
//! Diagnostics go to stderr through `tracing`. `RUST_LOG` takes precedence;
//! otherwise the level is `warn`, or `debug` with `--verbose`.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod catalog_cmd;
mod output;
mod projects_cmd;
mod report;
mod run_cmd;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
pub use run_cmd::RunArgs;
