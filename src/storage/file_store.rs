//! File access scoped to one project root
//!
//! Writes go to a locked temp file next to the target and are renamed into
//! place, so a crash mid-write never leaves a half-written file at the target
//! path.

use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Path escapes the project root: {0}")]
    OutsideRoot(PathBuf),

    #[error("File is not valid UTF-8: {0}")]
    InvalidUtf8(PathBuf),

    #[error("{action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileStoreError {
    fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        FileStoreError::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Reads and writes files relative to a root directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves a relative path against the root
    pub fn resolve(&self, relative: impl AsRef<Path>) -> Result<PathBuf, FileStoreError> {
        let relative = relative.as_ref();

        let escapes = relative.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes || relative.as_os_str().is_empty() {
            return Err(FileStoreError::OutsideRoot(relative.to_path_buf()));
        }

        Ok(self.root.join(relative))
    }

    pub fn exists(&self, relative: impl AsRef<Path>) -> bool {
        self.resolve(relative).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Reads a file as UTF-8 text
    pub fn read(&self, relative: impl AsRef<Path>) -> Result<String, FileStoreError> {
        let path = self.resolve(relative)?;

        match fs::read_to_string(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(FileStoreError::NotFound(path)),
            Err(e) if e.kind() == ErrorKind::InvalidData => Err(FileStoreError::InvalidUtf8(path)),
            Err(e) => Err(FileStoreError::io("Failed to read", &path, e)),
        }
    }

    /// Reads a file, mapping a missing file to `None`
    pub fn read_optional(&self, relative: impl AsRef<Path>) -> Result<Option<String>, FileStoreError> {
        match self.read(relative) {
            Ok(content) => Ok(Some(content)),
            Err(FileStoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Reads raw bytes, mapping a missing file to `None`
    pub fn read_bytes_optional(
        &self,
        relative: impl AsRef<Path>,
    ) -> Result<Option<Vec<u8>>, FileStoreError> {
        let path = self.resolve(relative)?;

        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FileStoreError::io("Failed to read", &path, e)),
        }
    }

    /// Atomically replaces a file, creating parent directories as needed
    pub fn write(&self, relative: impl AsRef<Path>, content: &str) -> Result<(), FileStoreError> {
        let path = self.resolve(relative)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| FileStoreError::io("Failed to create directory", parent, e))?;
        }

        let temp_path = temp_path_for(&path);

        if let Err(e) = write_temp(&temp_path, content) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        // Atomic rename
        fs::rename(&temp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            FileStoreError::io("Failed to replace", &path, e)
        })
    }
}

/// Writes content to the temp file while holding an exclusive lock on it
fn write_temp(temp_path: &Path, content: &str) -> Result<(), FileStoreError> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| FileStoreError::io("Failed to create temp file", temp_path, e))?;

    file.lock_exclusive()
        .map_err(|e| FileStoreError::io("Failed to lock", temp_path, e))?;

    {
        let mut writer = BufWriter::new(&file);
        writer
            .write_all(content.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|e| FileStoreError::io("Failed to write", temp_path, e))?;
    }

    // Lock is released when file is dropped
    file.sync_all()
        .map_err(|e| FileStoreError::io("Failed to sync", temp_path, e))
}

/// Hidden sibling of the target, so the rename stays on one file system
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.scaffold.tmp", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        store.write("src/App.Core/Services/X.cs", "class X {}\n").unwrap();

        assert!(store.exists("src/App.Core/Services/X.cs"));
        assert_eq!(store.read("src/App.Core/Services/X.cs").unwrap(), "class X {}\n");
    }

    #[test]
    fn write_replaces_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        store.write("a.txt", "first").unwrap();
        store.write("a.txt", "second").unwrap();

        assert_eq!(store.read("a.txt").unwrap(), "second");
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt".to_string()]);
    }

    #[test]
    fn read_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        assert!(matches!(store.read("missing.cs"), Err(FileStoreError::NotFound(_))));
        assert_eq!(store.read_optional("missing.cs").unwrap(), None);
        assert!(!store.exists("missing.cs"));
    }

    #[test]
    fn read_preserves_bytes() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        let content = "line one\r\n\tline two  \r\n";

        store.write("crlf.cs", content).unwrap();
        assert_eq!(store.read("crlf.cs").unwrap(), content);
    }

    #[test]
    fn invalid_utf8_is_reported() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bin.dat"), [0xff, 0xfe, 0x00]).unwrap();

        let store = FileStore::new(dir.path());
        assert!(matches!(store.read("bin.dat"), Err(FileStoreError::InvalidUtf8(_))));
        assert_eq!(store.read_bytes_optional("bin.dat").unwrap(), Some(vec![0xff, 0xfe]));
        assert_eq!(store.read_bytes_optional("absent.dat").unwrap(), None);
    }

    #[test]
    fn paths_outside_root_are_rejected() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());

        assert!(matches!(store.resolve("../x"), Err(FileStoreError::OutsideRoot(_))));
        assert!(matches!(store.resolve("/etc/passwd"), Err(FileStoreError::OutsideRoot(_))));
        assert!(matches!(store.resolve(""), Err(FileStoreError::OutsideRoot(_))));
        assert!(store.write("a/../../b", "x").is_err());
    }

    #[test]
    fn write_fails_when_parent_is_a_file() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        store.write("blocker", "not a directory").unwrap();

        let err = store.write("blocker/child.cs", "x").unwrap_err();
        assert!(matches!(err, FileStoreError::Io { .. }));
    }
}
