//! Placeholder substitution
//!
//! Templates use `{{name}}` placeholders. Substitution is a single left-to-right
//! pass: substituted values are never rescanned, and text outside placeholders
//! is copied byte for byte.

use crate::domain::ProjectIdentifier;

use super::TemplateError;

/// Values available to templates for one project
#[derive(Debug, Clone)]
pub struct Vars {
    entries: Vec<(&'static str, String)>,
}

impl Vars {
    /// Builds the variable set for a project identifier
    pub fn for_project(project: &ProjectIdentifier) -> Self {
        Self {
            entries: vec![
                ("project", project.as_str().to_string()),
                ("project_lower", project.lower()),
                ("project_kebab", project.kebab()),
            ],
        }
    }

    /// Looks up a variable by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Substitutes every `{{name}}` in `text`
pub fn substitute(text: &str, vars: &Vars) -> Result<String, TemplateError> {
    substitute_with(text, vars, |value| value.to_string())
}

/// Substitutes every `{{name}}` in a regular expression source, escaping the
/// substituted values so they match literally
pub fn substitute_regex(text: &str, vars: &Vars) -> Result<String, TemplateError> {
    substitute_with(text, vars, regex::escape)
}

fn substitute_with(
    text: &str,
    vars: &Vars,
    encode: impl Fn(&str) -> String,
) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find("{{") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            break;
        };

        let name = after_open[..close].trim();
        let value = vars
            .get(name)
            .ok_or_else(|| TemplateError::UnknownPlaceholder(name.to_string()))?;

        out.push_str(&rest[..open]);
        out.push_str(&encode(value));
        rest = &after_open[close + 2..];
    }

    out.push_str(rest);
    Ok(out)
}
