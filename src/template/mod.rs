//! # Templates
//!
//! Whole-file templates for the identity feature and the `{{placeholder}}`
//! substitution shared with patch steps.
//!
//! | Placeholder | Value for `CampingTripPlanner` |
//! |-------------|--------------------------------|
//! | `{{project}}` | `CampingTripPlanner` |
//! | `{{project_lower}}` | `campingtripplanner` |
//! | `{{project_kebab}}` | `camping-trip-planner` |
//!
//! Template bodies live under `assets/templates/` and are embedded at compile
//! time.

mod builtin;
mod registry;
mod render;

use thiserror::Error;

pub use registry::TemplateRegistry;
pub use render::{substitute, substitute_regex, Vars};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Unknown placeholder '{{{{{0}}}}}'")]
    UnknownPlaceholder(String),

    #[error("Unknown placeholder '{{{{{name}}}}}' in template {template}")]
    InTemplate { template: String, name: String },
}
