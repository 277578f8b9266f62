//! Text patterns for anchors and idempotency predicates
//!
//! A [`Pattern`] is the definition stored in a patch step; it may contain
//! `{{placeholders}}`. Rendering it for a project yields a [`Matcher`] that
//! searches raw document text.

use std::fmt;
use std::ops::Range;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::template::{substitute, substitute_regex, TemplateError, Vars};

/// Name of the capture group that narrows a regex anchor
///
/// Alternatives of one regex may each carry their own group named
/// `anchor_<suffix>`; the first anchor group that took part in the match is
/// used.
pub const ANCHOR_GROUP: &str = "anchor";

fn is_anchor_group(name: &str) -> bool {
    match name.strip_prefix(ANCHOR_GROUP) {
        Some(rest) => rest.is_empty() || rest.starts_with('_'),
        None => false,
    }
}

#[derive(Debug, Error)]
pub enum PatternError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Pattern renders to an empty string")]
    Empty,

    #[error("Invalid regular expression '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A pattern definition, before placeholder substitution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "source", rename_all = "snake_case")]
pub enum Pattern {
    /// Matches the exact text
    Literal(String),

    /// Matches a regular expression; values substituted into it are escaped
    Regex(String),
}

impl Pattern {
    pub fn literal(text: impl Into<String>) -> Self {
        Pattern::Literal(text.into())
    }

    pub fn regex(source: impl Into<String>) -> Self {
        Pattern::Regex(source.into())
    }

    /// Substitutes placeholders and compiles the pattern
    pub fn render(&self, vars: &Vars) -> Result<Matcher, PatternError> {
        match self {
            Pattern::Literal(text) => {
                let text = substitute(text, vars)?;
                if text.is_empty() {
                    return Err(PatternError::Empty);
                }
                Ok(Matcher::Literal(text))
            }
            Pattern::Regex(source) => {
                let source = substitute_regex(source, vars)?;
                if source.is_empty() {
                    return Err(PatternError::Empty);
                }
                let regex = Regex::new(&source).map_err(|e| PatternError::InvalidRegex {
                    pattern: source.clone(),
                    source: e,
                })?;
                Ok(Matcher::Regex(regex))
            }
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Literal(text) => write!(f, "{:?}", text),
            Pattern::Regex(source) => write!(f, "/{}/", source),
        }
    }
}

/// A compiled pattern, ready to search documents
#[derive(Debug, Clone)]
pub enum Matcher {
    Literal(String),
    Regex(Regex),
}

impl Matcher {
    /// Returns true if the pattern occurs anywhere in the document
    pub fn is_match(&self, document: &str) -> bool {
        match self {
            Matcher::Literal(text) => document.contains(text.as_str()),
            Matcher::Regex(regex) => regex.is_match(document),
        }
    }

    /// Byte range of the first match in document order.
    ///
    /// For a regex with anchor groups, the range of the first of them that
    /// participated in the first match; a first match where none did counts
    /// as no match.
    pub fn find_first(&self, document: &str) -> Option<Range<usize>> {
        match self {
            Matcher::Literal(text) => document
                .find(text.as_str())
                .map(|start| start..start + text.len()),
            Matcher::Regex(regex) => {
                let groups: Vec<usize> = regex
                    .capture_names()
                    .enumerate()
                    .filter(|(_, name)| name.is_some_and(is_anchor_group))
                    .map(|(index, _)| index)
                    .collect();
                if groups.is_empty() {
                    return regex.find(document).map(|m| m.range());
                }
                let caps = regex.captures(document)?;
                groups.iter().find_map(|&index| caps.get(index)).map(|m| m.range())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProjectIdentifier;

    fn vars() -> Vars {
        Vars::for_project(&ProjectIdentifier::new("RecipeBox").unwrap())
    }

    #[test]
    fn literal_finds_first_occurrence() {
        let m = Pattern::literal("ab").render(&vars()).unwrap();
        assert_eq!(m.find_first("xxabyyab"), Some(2..4));
        assert!(m.is_match("ab"));
        assert_eq!(m.find_first("ba"), None);
    }

    #[test]
    fn literal_substitutes_placeholders() {
        let m = Pattern::literal("using {{project}}.Core;").render(&vars()).unwrap();
        assert!(m.is_match("using RecipeBox.Core;\n"));
    }

    #[test]
    fn empty_patterns_are_rejected() {
        assert!(matches!(Pattern::literal("").render(&vars()), Err(PatternError::Empty)));
        assert!(matches!(Pattern::regex("").render(&vars()), Err(PatternError::Empty)));
    }

    #[test]
    fn invalid_regex_is_reported() {
        let err = Pattern::regex("(unclosed").render(&vars()).unwrap_err();
        assert!(matches!(err, PatternError::InvalidRegex { .. }));
    }

    #[test]
    fn unknown_placeholder_is_reported() {
        let err = Pattern::literal("{{tenant}}").render(&vars()).unwrap_err();
        assert!(matches!(err, PatternError::Template(_)));
    }

    #[test]
    fn regex_uses_whole_match_without_anchor_group() {
        let m = Pattern::regex(r"return \w+;").render(&vars()).unwrap();
        assert_eq!(m.find_first("  return services;\n"), Some(2..18));
    }

    #[test]
    fn regex_anchor_group_narrows_the_span() {
        let m = Pattern::regex(r"(?P<anchor>using [^;\n]+;\n)\s*namespace")
            .render(&vars())
            .unwrap();
        let doc = "using A;\nusing B;\n\nnamespace X;\n";
        // The first match in document order is the using directly before the namespace
        assert_eq!(m.find_first(doc), Some(9..18));
    }

    #[test]
    fn alternative_anchor_groups_pick_the_one_that_matched() {
        let m = Pattern::regex(r"a(?P<anchor>1)|b(?P<anchor_b>2)|(?P<anchored>3)")
            .render(&vars())
            .unwrap();
        assert_eq!(m.find_first("xa1"), Some(2..3));
        assert_eq!(m.find_first("xxb2"), Some(3..4));
        // Only `anchor` and `anchor_*` narrow; `anchored` is an ordinary group
        assert_eq!(m.find_first("3"), None);
    }

    #[test]
    fn regex_placeholders_match_literally() {
        let project = ProjectIdentifier::new("A.B").unwrap();
        let m = Pattern::regex(r"{{project}}Context")
            .render(&Vars::for_project(&project))
            .unwrap();
        assert!(m.is_match("A.BContext"));
        assert!(!m.is_match("AxBContext"));
    }

    #[test]
    fn display_distinguishes_kinds() {
        assert_eq!(Pattern::literal("x").to_string(), "\"x\"");
        assert_eq!(Pattern::regex("x+").to_string(), "/x+/");
    }
}
