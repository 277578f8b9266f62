//! Project discovery
//!
//! A project is a directory directly under the root that contains the marker
//! subdirectory (by default `src`). Projects are returned sorted by name.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::domain::ProjectIdentifier;

/// Directories that are never projects
pub const BUILTIN_EXCLUDES: &[&str] = &[".git", ".claude", "node_modules", "__pycache__", "target"];

/// Lists the projects under `root`, skipping excluded names
pub fn list_projects(
    root: &Path,
    marker_dir: &str,
    exclude: &BTreeSet<String>,
) -> Result<Vec<ProjectIdentifier>> {
    let entries = fs::read_dir(root)
        .with_context(|| format!("Failed to read projects directory: {}", root.display()))?;

    let mut projects = Vec::new();

    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to read entry in {}", root.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();

        if exclude.contains(&name) || BUILTIN_EXCLUDES.contains(&name.as_str()) {
            debug!(%name, "excluded");
            continue;
        }

        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        if !path.join(marker_dir).is_dir() {
            debug!(%name, marker = marker_dir, "no marker directory");
            continue;
        }

        match ProjectIdentifier::new(name.clone()) {
            Ok(id) => projects.push(id),
            Err(e) => debug!(%name, error = %e, "not a valid project identifier"),
        }
    }

    projects.sort();
    Ok(projects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_project(root: &Path, name: &str) {
        fs::create_dir_all(root.join(name).join("src")).unwrap();
    }

    #[test]
    fn lists_directories_with_marker_sorted() {
        let dir = TempDir::new().unwrap();
        make_project(dir.path(), "Zeta");
        make_project(dir.path(), "Alpha");
        make_project(dir.path(), "Mid");

        let projects = list_projects(dir.path(), "src", &BTreeSet::new()).unwrap();
        let names: Vec<_> = projects.iter().map(|p| p.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Mid", "Zeta"]);
    }

    #[test]
    fn skips_entries_without_marker_and_plain_files() {
        let dir = TempDir::new().unwrap();
        make_project(dir.path(), "Real");
        fs::create_dir_all(dir.path().join("Docs")).unwrap();
        fs::write(dir.path().join("generate.py"), "print()").unwrap();

        let projects = list_projects(dir.path(), "src", &BTreeSet::new()).unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].as_str(), "Real");
    }

    #[test]
    fn applies_exclusions() {
        let dir = TempDir::new().unwrap();
        make_project(dir.path(), "Keep");
        make_project(dir.path(), "Skip");
        make_project(dir.path(), ".git");
        make_project(dir.path(), "node_modules");

        let exclude: BTreeSet<String> = ["Skip".to_string()].into_iter().collect();
        let projects = list_projects(dir.path(), "src", &exclude).unwrap();

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].as_str(), "Keep");
    }

    #[test]
    fn custom_marker_directory() {
        let dir = TempDir::new().unwrap();
        make_project(dir.path(), "OldLayout");
        fs::create_dir_all(dir.path().join("NewLayout").join("app")).unwrap();

        let projects = list_projects(dir.path(), "app", &BTreeSet::new()).unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].as_str(), "NewLayout");
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = list_projects(&dir.path().join("nope"), "src", &BTreeSet::new());
        assert!(result.is_err());
    }
}
