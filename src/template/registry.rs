//! Template registry
//!
//! Maps template ids to template text. Rendering is a pure function of
//! (template id, project identifier): no file system access happens here.

use std::collections::BTreeMap;

use crate::domain::ProjectIdentifier;

use super::render::{substitute, Vars};
use super::TemplateError;

/// Renders named templates for a project
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, &'static str>,
}

impl TemplateRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry containing every template embedded in the binary
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (id, text) in super::builtin::TEMPLATES {
            registry.register(*id, *text);
        }
        registry
    }

    /// Adds or replaces a template
    pub fn register(&mut self, id: impl Into<String>, text: &'static str) {
        self.templates.insert(id.into(), text);
    }

    /// Builder-style variant of [`register`](Self::register)
    pub fn with(mut self, id: impl Into<String>, text: &'static str) -> Self {
        self.register(id, text);
        self
    }

    /// Returns true if the id is registered
    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// Registered ids in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Renders a template for a project
    pub fn render(&self, id: &str, project: &ProjectIdentifier) -> Result<String, TemplateError> {
        let text = self
            .templates
            .get(id)
            .ok_or_else(|| TemplateError::UnknownTemplate(id.to_string()))?;

        substitute(text, &Vars::for_project(project)).map_err(|e| match e {
            TemplateError::UnknownPlaceholder(name) => TemplateError::InTemplate {
                template: id.to_string(),
                name,
            },
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> ProjectIdentifier {
        ProjectIdentifier::new("PetCareTracker").unwrap()
    }

    #[test]
    fn renders_registered_template() {
        let registry = TemplateRegistry::new().with("greeting", "namespace {{project}}.Core;\n");
        let out = registry.render("greeting", &project()).unwrap();
        assert_eq!(out, "namespace PetCareTracker.Core;\n");
    }

    #[test]
    fn rendering_is_pure() {
        let registry = TemplateRegistry::builtin();
        let first = registry.render("backend/user", &project()).unwrap();
        let second = registry.render("backend/user", &project()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_template_fails() {
        let registry = TemplateRegistry::new();
        let err = registry.render("missing", &project()).unwrap_err();
        assert_eq!(err, TemplateError::UnknownTemplate("missing".to_string()));
    }

    #[test]
    fn unknown_placeholder_names_the_template() {
        let registry = TemplateRegistry::new().with("broken", "{{tenant}}");
        let err = registry.render("broken", &project()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::InTemplate {
                template: "broken".to_string(),
                name: "tenant".to_string()
            }
        );
    }

    #[test]
    fn every_builtin_template_renders() {
        let registry = TemplateRegistry::builtin();
        assert_eq!(registry.ids().count(), 29);

        for id in registry.ids() {
            let out = registry.render(id, &project()).unwrap();
            assert!(!out.contains("{{"), "{} left a placeholder behind", id);
            assert!(out.contains("PetCareTracker"), "{} never names the project", id);
        }
    }
}
