//! Domain models for the scaffolder
//!
//! Contains the patching engine and the step/outcome types without any I/O
//! concerns.

mod generation;
mod identifier;
mod patch;
mod pattern;
mod report;

pub use generation::{GenerationOutcome, GenerationStep};
pub use identifier::{IdentifierError, ProjectIdentifier};
pub use patch::{AnchorPatcher, PatchOutcome, PatchStep, Patched, Position, RenderedPatch};
pub use pattern::{Matcher, Pattern, PatternError, ANCHOR_GROUP};
pub use report::{
    BatchResult, BatchSummary, GenerationRecord, PatchRecord, ProjectReport, ProjectState,
};
