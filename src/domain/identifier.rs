//! Project identifiers
//!
//! A project identifier is the directory name of one generated application
//! (e.g. `CampingTripPlanner`). It doubles as the root namespace of the
//! generated code, so templates substitute it verbatim and in a few derived
//! spellings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdentifierError {
    #[error("Project identifier cannot be empty")]
    Empty,

    #[error("Invalid project identifier '{0}': must be a single directory name")]
    NotADirectoryName(String),

    #[error("Invalid project identifier '{0}': contains whitespace")]
    Whitespace(String),
}

/// Name of one target project
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectIdentifier(String);

impl ProjectIdentifier {
    /// Creates an identifier, validating that it names a single directory
    pub fn new(name: impl Into<String>) -> Result<Self, IdentifierError> {
        let name = name.into();

        if name.is_empty() {
            return Err(IdentifierError::Empty);
        }

        if name == "." || name == ".." || name.contains('/') || name.contains('\\') {
            return Err(IdentifierError::NotADirectoryName(name));
        }

        if name.chars().any(char::is_whitespace) {
            return Err(IdentifierError::Whitespace(name));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase spelling, used for e-mail hosts and URLs
    pub fn lower(&self) -> String {
        self.0.to_lowercase()
    }

    /// Kebab-case spelling: `CampingTripPlanner` becomes `camping-trip-planner`
    pub fn kebab(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        let mut out = String::with_capacity(self.0.len() + 8);

        for (i, &c) in chars.iter().enumerate() {
            if c.is_uppercase() && i > 0 {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                // Break before a new word: "aB" or the last capital of "ABc"
                if prev.is_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_uppercase() && next_is_lower)
                {
                    out.push('-');
                }
            }
            out.extend(c.to_lowercase());
        }

        out
    }
}

impl fmt::Display for ProjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProjectIdentifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

impl TryFrom<String> for ProjectIdentifier {
    type Error = IdentifierError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ProjectIdentifier> for String {
    fn from(id: ProjectIdentifier) -> Self {
        id.0
    }
}

impl AsRef<str> for ProjectIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
