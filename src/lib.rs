//! Identity scaffolder
//!
//! Brings a directory of generated application projects up to date with an
//! identity subsystem: whole files are generated from templates, and existing
//! files are extended by idempotent anchor patches.

pub mod catalog;
pub mod cli;
pub mod domain;
pub mod runner;
pub mod storage;
pub mod template;

pub use catalog::Catalog;
pub use domain::{AnchorPatcher, BatchResult, PatchOutcome, PatchStep, ProjectIdentifier};
