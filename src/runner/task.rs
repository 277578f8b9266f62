//! One project's pass through a catalog

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info_span, warn};

use super::RunOptions;
use crate::catalog::Catalog;
use crate::domain::{
    AnchorPatcher, GenerationOutcome, GenerationRecord, PatchOutcome, PatchRecord, ProjectIdentifier,
    ProjectReport, ProjectState,
};
use crate::storage::{FileStore, FileStoreError};
use crate::template::{substitute, TemplateRegistry, Vars};

/// Applies a catalog to a single project
///
/// Steps run strictly in order: every generation step, then every patch
/// step. Failures end up in the returned [`ProjectReport`]; nothing is
/// propagated to the caller.
pub struct ProjectTask<'a> {
    project: ProjectIdentifier,
    catalog: &'a Catalog,
    templates: &'a TemplateRegistry,
    files: Staging,
}

impl<'a> ProjectTask<'a> {
    pub fn new(
        root: &Path,
        project: ProjectIdentifier,
        catalog: &'a Catalog,
        templates: &'a TemplateRegistry,
        options: &RunOptions,
    ) -> Self {
        let store = FileStore::new(root.join(project.as_str()));
        Self {
            project,
            catalog,
            templates,
            files: Staging::new(store, options.dry_run),
        }
    }

    pub fn run(mut self) -> ProjectReport {
        let span = info_span!("project", project = %self.project);
        let _enter = span.enter();

        let mut report = ProjectReport::new(self.project.clone());
        let vars = Vars::for_project(&self.project);

        transition(&mut report, ProjectState::Generating);
        if let Err(error) = self.generate(&vars, &mut report) {
            report.skipped_patches = self.catalog.patches.len();
            fail(&mut report, error);
            return report;
        }

        transition(&mut report, ProjectState::Patching);
        if let Err(error) = self.patch(&vars, &mut report) {
            fail(&mut report, error);
            return report;
        }

        transition(&mut report, ProjectState::Done);
        report
    }

    fn generate(&mut self, vars: &Vars, report: &mut ProjectReport) -> Result<(), String> {
        let catalog = self.catalog;
        for step in &catalog.generation {
            let path = substitute(&step.path, vars)
                .map_err(|e| format!("generation path {}: {}", step.path, e))?;

            let outcome = match self.generate_one(&step.template, &path) {
                Ok(outcome) => outcome,
                Err(e) => GenerationOutcome::Failed(e),
            };
            debug!(template = %step.template, %path, %outcome, "generation step");

            let failed = match &outcome {
                GenerationOutcome::Failed(e) => Some(format!("{}: {}", path, e)),
                _ => None,
            };
            report.generation.push(GenerationRecord {
                template: step.template.clone(),
                path,
                outcome,
            });

            if let Some(error) = failed {
                return Err(error);
            }
        }
        Ok(())
    }

    fn generate_one(&mut self, template: &str, path: &str) -> Result<GenerationOutcome, String> {
        let rendered = self
            .templates
            .render(template, &self.project)
            .map_err(|e| e.to_string())?;
        let previous = self.files.read_bytes_optional(path).map_err(|e| e.to_string())?;
        let outcome = GenerationOutcome::classify(previous.as_deref(), &rendered);

        self.files.write(path, rendered).map_err(|e| e.to_string())?;
        Ok(outcome)
    }

    fn patch(&mut self, vars: &Vars, report: &mut ProjectReport) -> Result<(), String> {
        let catalog = self.catalog;
        let total = catalog.patches.len();

        for (index, step) in catalog.patches.iter().enumerate() {
            let rendered = match step.render(vars) {
                Ok(rendered) => rendered,
                Err(e) => {
                    report.skipped_patches = total - index;
                    return Err(format!("patch step {}: {}", step.id, e));
                }
            };

            let outcome = match self.files.read_optional(&rendered.path) {
                Ok(None) => PatchOutcome::FileNotFound,
                Ok(Some(document)) => {
                    let patched = AnchorPatcher::apply(&document, &rendered);
                    if patched.changed() {
                        let content = patched.document.into_owned();
                        match self.files.write(&rendered.path, content) {
                            Ok(()) => PatchOutcome::Applied,
                            Err(e) => PatchOutcome::IoFailure(e.to_string()),
                        }
                    } else {
                        patched.outcome
                    }
                }
                Err(e) => PatchOutcome::IoFailure(e.to_string()),
            };

            match &outcome {
                PatchOutcome::Applied | PatchOutcome::AlreadyApplied => {
                    debug!(step = %step.id, path = %rendered.path, %outcome, "patch step")
                }
                _ => warn!(step = %step.id, path = %rendered.path, %outcome, "patch step"),
            }

            let fatal = match &outcome {
                PatchOutcome::IoFailure(e) => Some(format!("{} {}: {}", step.id, rendered.path, e)),
                _ => None,
            };
            report.patches.push(PatchRecord {
                step: step.id.clone(),
                path: rendered.path,
                outcome,
            });

            if let Some(error) = fatal {
                report.skipped_patches = total - index - 1;
                return Err(error);
            }
        }
        Ok(())
    }
}

fn transition(report: &mut ProjectReport, next: ProjectState) {
    debug_assert!(
        report.state.can_transition_to(next),
        "invalid transition {} -> {}",
        report.state,
        next
    );
    debug!(from = %report.state, to = %next, "state");
    report.state = next;
}

fn fail(report: &mut ProjectReport, error: String) {
    warn!(%error, "project failed");
    transition(report, ProjectState::Failed);
    report.error = Some(error);
}

/// File access for one project; in dry-run mode writes are held in memory so
/// later steps see earlier ones
struct Staging {
    store: FileStore,
    dry_run: bool,
    staged: HashMap<String, String>,
}

impl Staging {
    fn new(store: FileStore, dry_run: bool) -> Self {
        Self {
            store,
            dry_run,
            staged: HashMap::new(),
        }
    }

    fn read_optional(&self, path: &str) -> Result<Option<String>, FileStoreError> {
        if let Some(content) = self.staged.get(path) {
            return Ok(Some(content.clone()));
        }
        self.store.read_optional(path)
    }

    fn read_bytes_optional(&self, path: &str) -> Result<Option<Vec<u8>>, FileStoreError> {
        if let Some(content) = self.staged.get(path) {
            return Ok(Some(content.clone().into_bytes()));
        }
        self.store.read_bytes_optional(path)
    }

    fn write(&mut self, path: &str, content: String) -> Result<(), FileStoreError> {
        if self.dry_run {
            self.store.resolve(path)?;
            self.staged.insert(path.to_string(), content);
            return Ok(());
        }
        self.store.write(path, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GenerationStep, PatchStep, Pattern, Position};
    use std::fs;
    use tempfile::TempDir;

    fn catalog() -> Catalog {
        Catalog::new("test")
            .generate(GenerationStep::new("model", "src/{{project}}.Core/Model.cs"))
            .patch(PatchStep::new(
                "program/marker",
                "src/Program.cs",
                Pattern::literal("// end"),
                Position::BeforeAnchor,
                "// {{project}} marker\n",
                Pattern::literal("marker"),
            ))
            .patch(PatchStep::new(
                "missing/file",
                "src/Missing.cs",
                Pattern::literal("x"),
                Position::AfterAnchor,
                "y",
                Pattern::literal("y"),
            ))
    }

    fn templates() -> TemplateRegistry {
        TemplateRegistry::new().with("model", "namespace {{project}}.Core;\n")
    }

    fn project(root: &Path, name: &str) -> ProjectIdentifier {
        fs::create_dir_all(root.join(name).join("src")).unwrap();
        fs::write(root.join(name).join("src/Program.cs"), "start\n// end\n").unwrap();
        ProjectIdentifier::new(name).unwrap()
    }

    fn run(root: &Path, id: ProjectIdentifier, catalog: &Catalog, dry_run: bool) -> ProjectReport {
        let templates = templates();
        let options = RunOptions { jobs: 1, dry_run };
        ProjectTask::new(root, id, catalog, &templates, &options).run()
    }

    #[test]
    fn runs_generation_then_patches() {
        let dir = TempDir::new().unwrap();
        let id = project(dir.path(), "Notes");
        let report = run(dir.path(), id, &catalog(), false);

        assert_eq!(report.state, ProjectState::Done);
        assert_eq!(report.generation[0].outcome, GenerationOutcome::Created);
        assert_eq!(report.patches[0].outcome, PatchOutcome::Applied);
        assert_eq!(report.patches[1].outcome, PatchOutcome::FileNotFound);

        let model = fs::read_to_string(dir.path().join("Notes/src/Notes.Core/Model.cs")).unwrap();
        assert_eq!(model, "namespace Notes.Core;\n");
        let program = fs::read_to_string(dir.path().join("Notes/src/Program.cs")).unwrap();
        assert_eq!(program, "start\n// Notes marker\n// end\n");
    }

    #[test]
    fn second_run_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let id = project(dir.path(), "Notes");
        run(dir.path(), id.clone(), &catalog(), false);
        let program = fs::read_to_string(dir.path().join("Notes/src/Program.cs")).unwrap();

        let report = run(dir.path(), id, &catalog(), false);
        assert_eq!(report.generation[0].outcome, GenerationOutcome::Identical);
        assert_eq!(report.patches[0].outcome, PatchOutcome::AlreadyApplied);
        assert_eq!(
            fs::read_to_string(dir.path().join("Notes/src/Program.cs")).unwrap(),
            program
        );
    }

    #[test]
    fn dry_run_reports_without_writing() {
        let dir = TempDir::new().unwrap();
        let id = project(dir.path(), "Notes");
        let report = run(dir.path(), id, &catalog(), true);

        assert!(report.is_done());
        assert_eq!(report.generation[0].outcome, GenerationOutcome::Created);
        assert_eq!(report.patches[0].outcome, PatchOutcome::Applied);
        assert!(!dir.path().join("Notes/src/Notes.Core").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("Notes/src/Program.cs")).unwrap(),
            "start\n// end\n"
        );
    }

    #[test]
    fn generation_failure_skips_patches() {
        let dir = TempDir::new().unwrap();
        let id = project(dir.path(), "Notes");
        // A file where a directory is needed makes the write fail
        fs::write(dir.path().join("Notes/src/Notes.Core"), "").unwrap();

        let report = run(dir.path(), id, &catalog(), false);
        assert_eq!(report.state, ProjectState::Failed);
        assert!(matches!(report.generation[0].outcome, GenerationOutcome::Failed(_)));
        assert!(report.patches.is_empty());
        assert_eq!(report.skipped_patches, 2);
        assert!(report.error.is_some());
    }

    #[test]
    fn unknown_template_fails_project() {
        let dir = TempDir::new().unwrap();
        let id = project(dir.path(), "Notes");
        let catalog = Catalog::new("t")
            .generate(GenerationStep::new("absent", "a.cs"))
            .generate(GenerationStep::new("model", "b.cs"));

        let report = run(dir.path(), id, &catalog, false);
        assert!(report.is_failed());
        assert_eq!(report.generation.len(), 1);
        assert!(!dir.path().join("Notes/b.cs").exists());
    }

    #[test]
    fn anchor_miss_does_not_stop_later_patches() {
        let dir = TempDir::new().unwrap();
        let id = project(dir.path(), "Notes");
        let catalog = Catalog::new("t")
            .patch(PatchStep::new(
                "a",
                "src/Program.cs",
                Pattern::literal("nowhere"),
                Position::AfterAnchor,
                "a",
                Pattern::literal("zzz"),
            ))
            .patch(PatchStep::new(
                "b",
                "src/Program.cs",
                Pattern::literal("start\n"),
                Position::AfterAnchor,
                "b\n",
                Pattern::literal("b\n"),
            ));

        let report = run(dir.path(), id, &catalog, false);
        assert!(report.is_done());
        assert_eq!(report.patches[0].outcome, PatchOutcome::AnchorNotFound);
        assert_eq!(report.patches[1].outcome, PatchOutcome::Applied);
    }

    #[test]
    fn generation_replaces_non_utf8_target() {
        let dir = TempDir::new().unwrap();
        let id = project(dir.path(), "Notes");
        let target = dir.path().join("Notes/src/Notes.Core/Model.cs");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, [0xff, 0xfe, b'x', 0]).unwrap();

        let report = run(dir.path(), id, &catalog(), false);
        assert!(report.is_done());
        assert_eq!(report.generation[0].outcome, GenerationOutcome::Updated);
        assert_eq!(fs::read_to_string(&target).unwrap(), "namespace Notes.Core;\n");
    }

    #[test]
    fn unreadable_patch_target_fails_project_and_skips_rest() {
        let dir = TempDir::new().unwrap();
        let id = project(dir.path(), "Notes");
        fs::write(dir.path().join("Notes/src/Bad.cs"), [0xff, 0xfe]).unwrap();
        let catalog = Catalog::new("t")
            .patch(PatchStep::new(
                "bad",
                "src/Bad.cs",
                Pattern::literal("x"),
                Position::AfterAnchor,
                "y",
                Pattern::literal("y"),
            ))
            .patch(PatchStep::new(
                "program",
                "src/Program.cs",
                Pattern::literal("start\n"),
                Position::AfterAnchor,
                "b\n",
                Pattern::literal("b\n"),
            ));

        let report = run(dir.path(), id, &catalog, false);
        assert_eq!(report.state, ProjectState::Failed);
        assert_eq!(report.patches.len(), 1);
        assert!(matches!(report.patches[0].outcome, PatchOutcome::IoFailure(_)));
        assert_eq!(report.skipped_patches, 1);
        assert!(report.error.as_deref().unwrap().starts_with("bad src/Bad.cs"));
        assert_eq!(
            fs::read_to_string(dir.path().join("Notes/src/Program.cs")).unwrap(),
            "start\n// end\n"
        );
    }
}
