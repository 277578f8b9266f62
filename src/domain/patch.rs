//! Anchor patching
//!
//! A patch step inserts a block of text next to the first occurrence of an
//! anchor pattern, unless an idempotency predicate shows the block is already
//! there. Everything outside the inserted block is left byte for byte as it
//! was, including line endings and trailing whitespace.
//!
//! The predicate is checked before the anchor is searched for: once applied, a
//! patch may legitimately have consumed or moved its own anchor, and that must
//! read as "already applied" rather than "anchor not found".

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::pattern::{Matcher, Pattern, PatternError};
use crate::template::{substitute, Vars};

/// Where the insertion goes relative to the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    BeforeAnchor,
    AfterAnchor,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::BeforeAnchor => write!(f, "before"),
            Position::AfterAnchor => write!(f, "after"),
        }
    }
}

/// Result of one patch step against one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum PatchOutcome {
    /// The predicate matched; nothing was written
    AlreadyApplied,

    /// The insertion was made
    Applied,

    /// Neither the predicate nor the anchor matched
    AnchorNotFound,

    /// The target file does not exist
    FileNotFound,

    /// Reading or writing the target failed
    IoFailure(String),
}

impl PatchOutcome {
    /// Outcomes that leave the file in its intended state
    pub fn is_success(&self) -> bool {
        matches!(self, PatchOutcome::Applied | PatchOutcome::AlreadyApplied)
    }
}

impl fmt::Display for PatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchOutcome::AlreadyApplied => write!(f, "already applied"),
            PatchOutcome::Applied => write!(f, "applied"),
            PatchOutcome::AnchorNotFound => write!(f, "anchor not found"),
            PatchOutcome::FileNotFound => write!(f, "file not found"),
            PatchOutcome::IoFailure(e) => write!(f, "I/O failure: {}", e),
        }
    }
}

/// Definition of one insertion into an existing file
#[derive(Debug, Clone, Serialize)]
pub struct PatchStep {
    /// Stable identifier used in reports (e.g. `seed-data/usings`)
    pub id: String,

    /// Target path relative to the project root; may contain placeholders
    pub path: String,

    /// Marks the insertion point
    pub anchor: Pattern,

    /// Text to insert; may contain placeholders
    pub insertion: String,

    pub position: Position,

    /// Present in the file once this step has been applied
    pub predicate: Pattern,
}

impl PatchStep {
    pub fn new(
        id: impl Into<String>,
        path: impl Into<String>,
        anchor: Pattern,
        position: Position,
        insertion: impl Into<String>,
        predicate: Pattern,
    ) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            anchor,
            insertion: insertion.into(),
            position,
            predicate,
        }
    }

    /// Binds the step to one project's variables
    pub fn render(&self, vars: &Vars) -> Result<RenderedPatch, PatternError> {
        Ok(RenderedPatch {
            path: substitute(&self.path, vars)?,
            anchor: self.anchor.render(vars)?,
            insertion: substitute(&self.insertion, vars)?,
            position: self.position,
            predicate: self.predicate.render(vars)?,
        })
    }
}

/// A patch step with every placeholder resolved and every pattern compiled
#[derive(Debug, Clone)]
pub struct RenderedPatch {
    pub path: String,
    pub anchor: Matcher,
    pub insertion: String,
    pub position: Position,
    pub predicate: Matcher,
}

/// Document returned by [`AnchorPatcher::apply`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patched<'a> {
    pub document: Cow<'a, str>,
    pub outcome: PatchOutcome,

    /// Byte range of the inserted text in `document`, when applied
    pub inserted: Option<Range<usize>>,
}

impl Patched<'_> {
    /// Returns true if the document differs from the input
    pub fn changed(&self) -> bool {
        self.outcome == PatchOutcome::Applied
    }
}

/// Applies rendered patches to document text
pub struct AnchorPatcher;

impl AnchorPatcher {
    /// Inserts `patch.insertion` at the first anchor match, unless already applied
    pub fn apply<'a>(document: &'a str, patch: &RenderedPatch) -> Patched<'a> {
        if patch.predicate.is_match(document) {
            return Patched {
                document: Cow::Borrowed(document),
                outcome: PatchOutcome::AlreadyApplied,
                inserted: None,
            };
        }

        let Some(anchor) = patch.anchor.find_first(document) else {
            return Patched {
                document: Cow::Borrowed(document),
                outcome: PatchOutcome::AnchorNotFound,
                inserted: None,
            };
        };

        let at = match patch.position {
            Position::BeforeAnchor => anchor.start,
            Position::AfterAnchor => anchor.end,
        };

        let mut out = String::with_capacity(document.len() + patch.insertion.len());
        out.push_str(&document[..at]);
        out.push_str(&patch.insertion);
        out.push_str(&document[at..]);

        Patched {
            document: Cow::Owned(out),
            outcome: PatchOutcome::Applied,
            inserted: Some(at..at + patch.insertion.len()),
        }
    }
}
