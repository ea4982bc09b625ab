//! Filesystem storage implementation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::storage::{NAVTREE_FILE, Storage, StorageError, VersionRef, validate_script_name};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage.
///
/// Walks the documentation root for directories containing
/// `navtreedata.js`. A build directory is not searched further, so the
/// hashed page directories of a build are never visited. Hidden
/// directories are skipped.
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Create storage rooted at the documentation directory.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Documentation root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn scan_directory(&self, dir: &Path, rel: &Path, found: &mut Vec<VersionRef>) {
        if dir.join(NAVTREE_FILE).is_file() {
            found.push(VersionRef::new(rel));
            return;
        }

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Failed to read directory");
                return;
            }
        };

        let mut subdirs: Vec<_> = entries
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
            .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
            .collect();
        subdirs.sort_by_key(fs::DirEntry::file_name);

        for entry in subdirs {
            self.scan_directory(&entry.path(), &rel.join(entry.file_name()), found);
        }
    }

    fn build_file(&self, version: &VersionRef, file: &str) -> PathBuf {
        self.root.join(&version.path).join(file)
    }

    fn io_error(err: std::io::Error, path: PathBuf) -> StorageError {
        StorageError::io(err, Some(path)).with_backend(BACKEND)
    }
}

impl Storage for FsStorage {
    fn scan(&self) -> Result<Vec<VersionRef>, StorageError> {
        if !self.root.is_dir() {
            return Err(StorageError::not_found(&self.root).with_backend(BACKEND));
        }

        let mut found = Vec::new();
        self.scan_directory(&self.root, Path::new(""), &mut found);
        found.sort();
        tracing::debug!(root = %self.root.display(), versions = found.len(), "Scanned documentation root");
        Ok(found)
    }

    fn read(&self, version: &VersionRef) -> Result<String, StorageError> {
        let path = self.build_file(version, NAVTREE_FILE);
        fs::read_to_string(&path).map_err(|e| Self::io_error(e, path))
    }

    fn read_script(&self, version: &VersionRef, name: &str) -> Result<Option<String>, StorageError> {
        validate_script_name(name).map_err(|e| e.with_backend(BACKEND))?;
        let path = self.build_file(version, &format!("{name}.js"));
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(e, path)),
        }
    }

    fn mtime(&self, version: &VersionRef) -> Result<f64, StorageError> {
        let path = self.build_file(version, NAVTREE_FILE);
        let modified = fs::metadata(&path)
            .and_then(|m| m.modified())
            .map_err(|e| Self::io_error(e, path))?;
        Ok(epoch_seconds(modified))
    }

    fn script_mtime(&self, version: &VersionRef, name: &str) -> Result<Option<f64>, StorageError> {
        validate_script_name(name).map_err(|e| e.with_backend(BACKEND))?;
        let path = self.build_file(version, &format!("{name}.js"));
        match fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(modified) => Ok(Some(epoch_seconds(modified))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(e, path)),
        }
    }
}

fn epoch_seconds(time: SystemTime) -> f64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}
