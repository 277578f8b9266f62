//! # Storage Layer
//!
//! Everything that touches the file system.
//!
//! | Concern | Type | Location |
//! |---------|------|----------|
//! | Project files | [`FileStore`] | `<root>/<project>/...` |
//! | Discovery | [`list_projects`] | directories under `<root>` |
//! | Run config | [`RunConfig`] | `<root>/scaffold.toml` |
//! | User config | [`GlobalConfig`] | platform config dir |
//!
//! ## Write Safety
//!
//! - Writes go through a locked temp file and an atomic rename
//! - Paths are relative to a project root; `..` and absolute paths are rejected
//! - Concurrent writers to the same path are not detected

mod config;
mod discovery;
mod file_store;

pub use config::{Config, ConfigError, DefaultFormat, GlobalConfig, RunConfig, CONFIG_FILE};
pub use discovery::{list_projects, BUILTIN_EXCLUDES};
pub use file_store::{FileStore, FileStoreError};
