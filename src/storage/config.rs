//! Configuration handling for the scaffolder
//!
//! Run configuration is read from `scaffold.toml` in the projects root;
//! user preferences from `~/.config/identity-scaffold/config.toml` (or the
//! platform equivalent). Both files are optional.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name of the run configuration inside the projects root
pub const CONFIG_FILE: &str = "scaffold.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Settings for a scaffolding run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Subdirectory whose presence marks a project
    pub marker_dir: String,

    /// Project names to skip, in addition to the built-in exclusions
    pub exclude: BTreeSet<String>,

    /// Worker threads; 0 uses the available parallelism
    pub jobs: usize,

    /// Exit non-zero when a project fails or an anchor is missing
    pub strict: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            marker_dir: "src".to_string(),
            exclude: BTreeSet::new(),
            jobs: 0,
            strict: false,
        }
    }
}

impl RunConfig {
    /// Checks values that parse but make no sense
    pub fn validate(&self) -> Result<(), ConfigError> {
        let marker = self.marker_dir.trim();
        if marker.is_empty() {
            return Err(ConfigError::Invalid("marker_dir cannot be empty".to_string()));
        }
        if marker.contains('/') || marker.contains('\\') || marker == ".." {
            return Err(ConfigError::Invalid(format!(
                "marker_dir must be a single directory name, got '{}'",
                self.marker_dir
            )));
        }
        Ok(())
    }
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DefaultFormat {
    #[default]
    Text,
    Json,
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: DefaultFormat,
}

/// Combined configuration (global + run)
#[derive(Debug, Clone)]
pub struct Config {
    pub run: RunConfig,
    pub global: GlobalConfig,
    pub root: PathBuf,
}

impl Config {
    /// Loads configuration for a projects root
    pub fn load(root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let run = Self::load_run_config(root)?;

        Ok(Self {
            run,
            global,
            root: root.to_path_buf(),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "scaffold", "identity-scaffold")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads the run configuration from a projects root
    pub fn load_run_config(root: &Path) -> Result<RunConfig> {
        let config_path = root.join(CONFIG_FILE);

        if !config_path.exists() {
            return Ok(RunConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

        let config: RunConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse config: {}", config_path.display()))?;

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_config_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_run_config(dir.path()).unwrap();

        assert_eq!(config, RunConfig::default());
        assert_eq!(config.marker_dir, "src");
        assert_eq!(config.jobs, 0);
        assert!(!config.strict);
    }

    #[test]
    fn parse_run_config() {
        let toml = r#"
marker_dir = "src"
exclude = ["FamilyCalendarEventPlanner", "AnniversaryBirthdayReminder"]
jobs = 4
strict = true
"#;

        let config: RunConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.jobs, 4);
        assert!(config.strict);
        assert!(config.exclude.contains("AnniversaryBirthdayReminder"));
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: RunConfig = toml::from_str("jobs = 2\n").unwrap();
        assert_eq!(config.jobs, 2);
        assert_eq!(config.marker_dir, "src");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "exclusions = []\n").unwrap();

        assert!(Config::load_run_config(dir.path()).is_err());
    }

    #[test]
    fn invalid_marker_dir_is_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "marker_dir = \"a/b\"\n").unwrap();

        let err = Config::load_run_config(dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("marker_dir"));
    }

    #[test]
    fn parse_global_config() {
        let config: GlobalConfig = toml::from_str("default_format = \"json\"\n").unwrap();
        assert_eq!(config.default_format, DefaultFormat::Json);
    }
}
