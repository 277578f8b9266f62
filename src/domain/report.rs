//! Per-project and per-batch results

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::generation::GenerationOutcome;
use super::identifier::ProjectIdentifier;
use super::patch::PatchOutcome;

/// Lifecycle of one project within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectState {
    #[default]
    Pending,
    Generating,
    Patching,
    Done,
    Failed,
}

impl ProjectState {
    /// Checks a transition against the lifecycle
    pub fn can_transition_to(&self, next: ProjectState) -> bool {
        use ProjectState::*;
        matches!(
            (self, next),
            (Pending, Generating)
                | (Generating, Patching)
                | (Generating, Failed)
                | (Patching, Done)
                | (Patching, Failed)
        )
    }
}

impl fmt::Display for ProjectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectState::Pending => write!(f, "pending"),
            ProjectState::Generating => write!(f, "generating"),
            ProjectState::Patching => write!(f, "patching"),
            ProjectState::Done => write!(f, "done"),
            ProjectState::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome of one generation step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRecord {
    pub template: String,
    pub path: String,
    pub outcome: GenerationOutcome,
}

/// Outcome of one patch step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchRecord {
    pub step: String,
    pub path: String,
    pub outcome: PatchOutcome,
}

/// Everything that happened to one project
#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    pub project: ProjectIdentifier,
    pub state: ProjectState,
    pub generation: Vec<GenerationRecord>,
    pub patches: Vec<PatchRecord>,

    /// Patch steps never attempted because the project failed first
    pub skipped_patches: usize,

    /// The error that moved the project to `Failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProjectReport {
    pub fn new(project: ProjectIdentifier) -> Self {
        Self {
            project,
            state: ProjectState::Pending,
            generation: Vec::new(),
            patches: Vec::new(),
            skipped_patches: 0,
            error: None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.state == ProjectState::Done
    }

    pub fn is_failed(&self) -> bool {
        self.state == ProjectState::Failed
    }

    pub fn generated(&self) -> usize {
        self.generation.iter().filter(|r| r.outcome.is_success()).count()
    }

    pub fn count_patches(&self, outcome: &PatchOutcome) -> usize {
        self.patches.iter().filter(|r| &r.outcome == outcome).count()
    }

    /// Patch records that did not leave their file in the intended state
    pub fn patch_problems(&self) -> impl Iterator<Item = &PatchRecord> {
        self.patches.iter().filter(|r| !r.outcome.is_success())
    }
}

/// Aggregate counts across a batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub projects: usize,
    pub done: usize,
    pub failed: usize,
    pub generated: usize,
    pub applied: usize,
    pub already_applied: usize,
    pub anchor_not_found: usize,
    pub file_not_found: usize,
}

/// Results of one run, in project discovery order
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub dry_run: bool,
    pub projects: Vec<ProjectReport>,
}

impl BatchResult {
    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            projects: self.projects.len(),
            ..Default::default()
        };

        for report in &self.projects {
            match report.state {
                ProjectState::Done => summary.done += 1,
                ProjectState::Failed => summary.failed += 1,
                _ => {}
            }
            summary.generated += report.generated();
            summary.applied += report.count_patches(&PatchOutcome::Applied);
            summary.already_applied += report.count_patches(&PatchOutcome::AlreadyApplied);
            summary.anchor_not_found += report.count_patches(&PatchOutcome::AnchorNotFound);
            summary.file_not_found += report.count_patches(&PatchOutcome::FileNotFound);
        }

        summary
    }

    /// Looks up one project's report
    pub fn get(&self, project: &str) -> Option<&ProjectReport> {
        self.projects.iter().find(|r| r.project.as_str() == project)
    }

    pub fn has_failures(&self) -> bool {
        self.projects.iter().any(ProjectReport::is_failed)
    }

    pub fn has_anchor_misses(&self) -> bool {
        self.projects
            .iter()
            .any(|r| r.count_patches(&PatchOutcome::AnchorNotFound) > 0)
    }
}
