//! Zip archive construction
//!
//! Walks a destination tree depth-first in directory-listing order and
//! writes one deflate-compressed entry per regular file. Entry names are the
//! file's path relative to the tree root joined with `/`. Directories get no
//! entries of their own.

use crate::adapters::StorageProvider;
use crate::domain::{ExportError, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Writes the archive at `archive_path` from the tree below `root`
///
/// A missing `root` yields an empty archive. File contents are read through
/// `storage`. Returns the number of entries written.
///
/// # Errors
///
/// Any I/O or zip failure aborts the build; whatever was written so far is
/// left in place.
pub fn build_archive(
    storage: &dyn StorageProvider,
    root: &Path,
    archive_path: &Path,
) -> Result<usize> {
    let file = File::create(archive_path).map_err(|e| ExportError::storage(archive_path, e))?;
    let mut zip = ZipWriter::new(BufWriter::new(file));

    let mut entries = 0;
    if storage.exists(root) {
        for entry in WalkDir::new(root).min_depth(1).follow_links(true) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry_name(root, entry.path())?;
            let options = SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .large_file(entry.metadata()?.len() >= u64::from(u32::MAX));
            let mut reader = storage.open_read(entry.path())?;

            zip.start_file(name.as_str(), options)?;
            io::copy(&mut reader, &mut zip).map_err(|e| ExportError::storage(entry.path(), e))?;
            entries += 1;
            tracing::trace!(entry = %name, "Added archive entry");
        }
    } else {
        tracing::warn!(
            path = %root.display(),
            "Destination tree does not exist, writing empty archive"
        );
    }

    let mut writer = zip.finish()?;
    writer
        .flush()
        .map_err(|e| ExportError::storage(archive_path, e))?;

    Ok(entries)
}

/// Archive entry name of `path` below `root`
pub fn entry_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .map_err(|e| ExportError::storage(path, e))?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LocalStorage;
    use std::collections::BTreeSet;
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;

    fn entry_names(archive_path: &Path) -> BTreeSet<String> {
        let archive = zip::ZipArchive::new(File::open(archive_path).unwrap()).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    #[test]
    fn test_entry_name_joins_with_slash() {
        let root = Path::new("/out/ProjA");
        let path = root.join("proc1").join("ocr").join("a.xml");
        assert_eq!(entry_name(root, &path).unwrap(), "proc1/ocr/a.xml");
    }

    #[test]
    fn test_entry_name_outside_root_fails() {
        let result = entry_name(Path::new("/out/ProjA"), Path::new("/elsewhere/a.tif"));
        assert!(result.is_err());
    }

    #[test]
    fn test_build_archive_adds_files_only() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("ProjA");
        fs::create_dir_all(root.join("proc1").join("ocr")).unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();
        fs::write(root.join("proc1").join("a.tif"), b"image").unwrap();
        fs::write(root.join("proc1").join("ocr").join("a.xml"), b"<xml/>").unwrap();

        let archive_path = temp_dir.path().join("ProjA.zip");
        let entries = build_archive(&LocalStorage::new(), &root, &archive_path).unwrap();

        assert_eq!(entries, 2);
        let expected: BTreeSet<String> = ["proc1/a.tif", "proc1/ocr/a.xml"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(entry_names(&archive_path), expected);
    }

    #[test]
    fn test_build_archive_preserves_content() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("ProjA");
        fs::create_dir_all(root.join("proc1")).unwrap();
        fs::write(root.join("proc1").join("a.tif"), b"pixels").unwrap();

        let archive_path = temp_dir.path().join("ProjA.zip");
        build_archive(&LocalStorage::new(), &root, &archive_path).unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
        let mut contents = Vec::new();
        archive
            .by_name("proc1/a.tif")
            .unwrap()
            .read_to_end(&mut contents)
            .unwrap();
        assert_eq!(contents, b"pixels");
    }

    #[test]
    fn test_build_archive_of_empty_tree() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("ProjA");
        fs::create_dir_all(root.join("nothing-here")).unwrap();

        let archive_path = temp_dir.path().join("ProjA.zip");
        let entries = build_archive(&LocalStorage::new(), &root, &archive_path).unwrap();

        assert_eq!(entries, 0);
        assert!(entry_names(&archive_path).is_empty());
    }

    #[test]
    fn test_build_archive_of_missing_tree() {
        let temp_dir = TempDir::new().unwrap();
        let archive_path = temp_dir.path().join("ProjA.zip");
        let entries =
            build_archive(&LocalStorage::new(), &temp_dir.path().join("ProjA"), &archive_path)
                .unwrap();

        assert_eq!(entries, 0);
        assert!(archive_path.exists());
    }

    #[test]
    fn test_build_archive_into_missing_folder_fails() {
        let temp_dir = TempDir::new().unwrap();
        let archive_path = temp_dir.path().join("missing").join("ProjA.zip");
        let result = build_archive(&LocalStorage::new(), temp_dir.path(), &archive_path);
        assert!(matches!(result, Err(ExportError::Storage { .. })));
    }
}
