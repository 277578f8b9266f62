//! Parallel execution across projects

use std::path::PathBuf;

use chrono::Utc;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use thiserror::Error;
use tracing::{debug, info};

use super::task::ProjectTask;
use super::RunOptions;
use crate::catalog::Catalog;
use crate::domain::{BatchResult, ProjectIdentifier};
use crate::template::TemplateRegistry;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Failed to start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Runs one catalog over a set of projects under a common root
pub struct BatchRunner<'a> {
    root: PathBuf,
    catalog: &'a Catalog,
    templates: &'a TemplateRegistry,
    options: RunOptions,
}

impl<'a> BatchRunner<'a> {
    pub fn new(
        root: impl Into<PathBuf>,
        catalog: &'a Catalog,
        templates: &'a TemplateRegistry,
        options: RunOptions,
    ) -> Self {
        Self {
            root: root.into(),
            catalog,
            templates,
            options,
        }
    }

    /// Processes every project; reports come back in the order given
    pub fn run(&self, projects: &[ProjectIdentifier]) -> Result<BatchResult, RunnerError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.options.jobs)
            .thread_name(|i| format!("scaffold-worker-{}", i))
            .build()?;

        debug!(
            projects = projects.len(),
            threads = pool.current_num_threads(),
            dry_run = self.options.dry_run,
            "starting batch"
        );

        let started_at = Utc::now();
        let reports = pool.install(|| {
            projects
                .par_iter()
                .map(|project| {
                    ProjectTask::new(
                        &self.root,
                        project.clone(),
                        self.catalog,
                        self.templates,
                        &self.options,
                    )
                    .run()
                })
                .collect::<Vec<_>>()
        });
        let finished_at = Utc::now();

        let result = BatchResult {
            started_at,
            finished_at,
            dry_run: self.options.dry_run,
            projects: reports,
        };

        let summary = result.summary();
        info!(
            done = summary.done,
            failed = summary.failed,
            applied = summary.applied,
            "batch finished"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GenerationStep, PatchOutcome, PatchStep, Pattern, Position, ProjectState};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn catalog() -> Catalog {
        Catalog::new("test")
            .generate(GenerationStep::new("entity", "src/{{project}}.Core/Model/User.cs"))
            .patch(PatchStep::new(
                "startup/usings",
                "src/Startup.cs",
                Pattern::literal("namespace"),
                Position::BeforeAnchor,
                "using {{project}}.Core.Model;\n\n",
                Pattern::literal("using {{project}}.Core.Model;"),
            ))
    }

    fn templates() -> TemplateRegistry {
        TemplateRegistry::new().with("entity", "namespace {{project}}.Core.Model;\n\npublic class User {}\n")
    }

    fn setup(root: &Path, names: &[&str]) -> Vec<ProjectIdentifier> {
        names
            .iter()
            .map(|name| {
                let src = root.join(name).join("src");
                fs::create_dir_all(&src).unwrap();
                fs::write(src.join("Startup.cs"), "namespace Demo;\n").unwrap();
                ProjectIdentifier::new(*name).unwrap()
            })
            .collect()
    }

    #[test]
    fn failing_project_is_isolated() {
        let dir = TempDir::new().unwrap();
        let projects = setup(dir.path(), &["Alpha", "Beta", "Gamma"]);
        // Beta cannot create its Model directory
        fs::create_dir_all(dir.path().join("Beta/src/Beta.Core")).unwrap();
        fs::write(dir.path().join("Beta/src/Beta.Core/Model"), "").unwrap();

        let catalog = catalog();
        let templates = templates();
        let options = RunOptions { jobs: 3, dry_run: false };
        let result = BatchRunner::new(dir.path(), &catalog, &templates, options)
            .run(&projects)
            .unwrap();

        let states: Vec<_> = result.projects.iter().map(|r| r.state).collect();
        assert_eq!(
            states,
            vec![ProjectState::Done, ProjectState::Failed, ProjectState::Done]
        );
        assert_eq!(result.projects[1].project.as_str(), "Beta");
        assert!(result.projects[1].patches.is_empty());
        assert_eq!(
            result.get("Gamma").unwrap().patches[0].outcome,
            PatchOutcome::Applied
        );
        assert!(result.has_failures());

        let summary = result.summary();
        assert_eq!(summary.done, 2);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn reports_keep_input_order() {
        let dir = TempDir::new().unwrap();
        let names = ["A1", "B2", "C3", "D4", "E5", "F6", "G7", "H8"];
        let projects = setup(dir.path(), &names);

        let catalog = catalog();
        let templates = templates();
        let result = BatchRunner::new(dir.path(), &catalog, &templates, RunOptions::default())
            .run(&projects)
            .unwrap();

        let order: Vec<_> = result.projects.iter().map(|r| r.project.as_str()).collect();
        assert_eq!(order, names);
        assert!(result.finished_at >= result.started_at);
    }

    #[test]
    fn dry_run_flag_is_carried_into_result() {
        let dir = TempDir::new().unwrap();
        let projects = setup(dir.path(), &["Alpha"]);

        let catalog = catalog();
        let templates = templates();
        let options = RunOptions { jobs: 1, dry_run: true };
        let result = BatchRunner::new(dir.path(), &catalog, &templates, options)
            .run(&projects)
            .unwrap();

        assert!(result.dry_run);
        assert_eq!(
            fs::read_to_string(dir.path().join("Alpha/src/Startup.cs")).unwrap(),
            "namespace Demo;\n"
        );
    }
}
