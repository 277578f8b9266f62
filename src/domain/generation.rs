//! Whole-file generation steps

use std::fmt;

use serde::Serialize;

/// Writes one rendered template to a path, replacing whatever is there
///
/// Every generation step overwrites: existing content, edited or not, is
/// replaced wholesale on each run and is never merged or checked for a
/// marker. There is no per-step policy. Files that must keep local edits
/// belong in a [`PatchStep`](super::PatchStep) instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationStep {
    /// Template to render
    pub template: String,

    /// Target path relative to the project root; may contain placeholders
    pub path: String,
}

impl GenerationStep {
    pub fn new(template: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            path: path.into(),
        }
    }
}

/// Result of one generation step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum GenerationOutcome {
    /// No file existed at the target path
    Created,

    /// The previous content differed from the rendered template
    Updated,

    /// Rewritten with byte-identical content
    Identical,

    /// Rendering or writing failed
    Failed(String),
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, GenerationOutcome::Failed(_))
    }

    /// Classifies a write by comparing content digests
    ///
    /// The previous content is compared as raw bytes, so a target that is not
    /// valid UTF-8 is simply `Updated`.
    pub fn classify(previous: Option<&[u8]>, rendered: &str) -> Self {
        match previous {
            None => GenerationOutcome::Created,
            Some(old) if blake3::hash(old) == blake3::hash(rendered.as_bytes()) => {
                GenerationOutcome::Identical
            }
            Some(_) => GenerationOutcome::Updated,
        }
    }
}

impl fmt::Display for GenerationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationOutcome::Created => write!(f, "created"),
            GenerationOutcome::Updated => write!(f, "updated"),
            GenerationOutcome::Identical => write!(f, "identical"),
            GenerationOutcome::Failed(e) => write!(f, "failed: {}", e),
        }
    }
}
