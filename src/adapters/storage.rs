//! Storage abstraction
//!
//! The export job never touches the filesystem directly; it goes through a
//! [`StorageProvider`] so hosts can plug in their own storage and tests can
//! inject failures.

use crate::domain::{ExportError, Result};
use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::Path;
use walkdir::WalkDir;

/// Storage operations consumed by the export job
///
/// Every failure is reported as an [`ExportError`]; the job decides whether
/// it is fatal for the current process, the archive phase or nothing at all.
pub trait StorageProvider: Send + Sync {
    /// Lists the names of the regular files directly inside `dir`
    ///
    /// A directory that does not exist lists as empty.
    fn list(&self, dir: &Path) -> Result<Vec<String>>;

    /// Returns true if something exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Deletes the file at `path`
    fn delete_file(&self, path: &Path) -> Result<()>;

    /// Creates `path` and all missing parents
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Copies the tree below `source` into `target`, overwriting existing files
    ///
    /// Returns the number of files written.
    fn copy_directory(&self, source: &Path, target: &Path) -> Result<usize>;

    /// Opens the file at `path` for reading
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>>;
}

/// [`StorageProvider`] backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

impl StorageProvider for LocalStorage {
    fn list(&self, dir: &Path) -> Result<Vec<String>> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %dir.display(), "Source directory does not exist");
                return Ok(Vec::new());
            }
            Err(e) => return Err(ExportError::storage(dir, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ExportError::storage(dir, e))?;
            // Path::is_file follows symlinks, so linked images count as files.
            if entry.path().is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn delete_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|e| ExportError::storage(path, e))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| ExportError::storage(path, e))
    }

    fn copy_directory(&self, source: &Path, target: &Path) -> Result<usize> {
        self.create_dir_all(target)?;

        let mut copied = 0;
        for entry in WalkDir::new(source).min_depth(1).follow_links(true) {
            let entry = entry?;
            let relative = entry
                .path()
                .strip_prefix(source)
                .map_err(|e| ExportError::storage(entry.path(), e))?;
            let destination = target.join(relative);

            if entry.file_type().is_dir() {
                self.create_dir_all(&destination)?;
            } else if entry.file_type().is_file() {
                fs::copy(entry.path(), &destination)
                    .map_err(|e| ExportError::storage(entry.path(), e))?;
                copied += 1;
            }
        }

        Ok(copied)
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let file = File::open(path).map_err(|e| ExportError::storage(path, e))?;
        Ok(Box::new(file))
    }
}
