//! # Runner
//!
//! Applies a [`Catalog`](crate::catalog::Catalog) to every discovered project.
//!
//! ```text
//! BatchRunner ──┬── ProjectTask(Alpha) ── generate ── patch ── ProjectReport
//!               ├── ProjectTask(Beta)  ── ...
//!               └── ...                                   └──> BatchResult
//! ```
//!
//! Projects run in parallel on a bounded pool; steps within a project run in
//! order. A failing project never affects another one.

mod batch;
mod task;

pub use batch::{BatchRunner, RunnerError};
pub use task::ProjectTask;

/// Options that apply to a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Worker threads; 0 uses the available parallelism
    pub jobs: usize,

    /// Evaluate every step without writing anything
    pub dry_run: bool,
}
