//! # Catalog
//!
//! A catalog is the ordered list of generation steps and patch steps that
//! make up one feature. It is plain data: one executor interprets every step.
//!
//! ## Ordering
//!
//! Generation steps always run before patch steps. Patch steps target files
//! that already exist in a project, never files the same catalog generates;
//! [`Catalog::validate`] enforces this.

mod identity;

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use crate::domain::{GenerationStep, IdentifierError, PatchStep, PatternError, ProjectIdentifier};
use crate::template::{substitute, TemplateError, TemplateRegistry, Vars};

pub use identity::identity;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Generation step {path} uses unknown template '{template}'")]
    UnknownTemplate { template: String, path: String },

    #[error("Generation step {path}: {source}")]
    Generation {
        path: String,
        #[source]
        source: TemplateError,
    },

    #[error("Patch step {step}: {source}")]
    Patch {
        step: String,
        #[source]
        source: PatternError,
    },

    #[error(transparent)]
    Probe(#[from] IdentifierError),

    #[error("Duplicate patch step id: {0}")]
    DuplicateStep(String),

    #[error("Patch step {step} targets {path}, which the catalog also generates")]
    PatchesGeneratedFile { step: String, path: String },
}

/// Ordered generation and patch steps for one feature
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    pub name: String,
    pub generation: Vec<GenerationStep>,
    pub patches: Vec<PatchStep>,
}

impl Catalog {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn generate(mut self, step: GenerationStep) -> Self {
        self.generation.push(step);
        self
    }

    pub fn patch(mut self, step: PatchStep) -> Self {
        self.patches.push(step);
        self
    }

    /// Checks the catalog against a registry by rendering every step for a
    /// sample project
    pub fn validate(&self, templates: &TemplateRegistry) -> Result<(), CatalogError> {
        let sample = ProjectIdentifier::new("CatalogSample")?;
        let vars = Vars::for_project(&sample);

        let mut generated = HashSet::new();
        for step in &self.generation {
            if !templates.contains(&step.template) {
                return Err(CatalogError::UnknownTemplate {
                    template: step.template.clone(),
                    path: step.path.clone(),
                });
            }

            templates
                .render(&step.template, &sample)
                .map_err(|source| CatalogError::Generation {
                    path: step.path.clone(),
                    source,
                })?;

            let path = substitute(&step.path, &vars).map_err(|source| CatalogError::Generation {
                path: step.path.clone(),
                source,
            })?;
            generated.insert(path);
        }

        let mut ids = HashSet::new();
        for step in &self.patches {
            if !ids.insert(step.id.as_str()) {
                return Err(CatalogError::DuplicateStep(step.id.clone()));
            }

            let rendered = step.render(&vars).map_err(|source| CatalogError::Patch {
                step: step.id.clone(),
                source,
            })?;

            if generated.contains(&rendered.path) {
                return Err(CatalogError::PatchesGeneratedFile {
                    step: step.id.clone(),
                    path: step.path.clone(),
                });
            }
        }

        Ok(())
    }
}
