//! Mock storage implementation for testing.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::storage::{Storage, StorageError, VersionRef, validate_script_name};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

#[derive(Debug, Default)]
struct MockBuild {
    navtree: String,
    scripts: HashMap<String, String>,
    script_mtimes: HashMap<String, f64>,
    mtime: f64,
}

/// In-memory storage for testing.
///
/// Builds are keyed by their directory; labels are derived the same way
/// as for [`FsStorage`](crate::FsStorage). Contents and mtimes can be
/// changed after construction to exercise reloading.
///
/// # Example
///
/// ```
/// use doxnav_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_build("ear-5.0", "var NAVTREE = [];")
///     .with_script("ear-5.0", "index", "var index = [];");
///
/// let versions = storage.scan().unwrap();
/// assert_eq!(versions[0].label, "ear-5.0");
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    builds: RwLock<HashMap<VersionRef, MockBuild>>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a build directory with its `navtreedata.js` content.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_build(self, dir: &str, navtree: impl Into<String>) -> Self {
        self.set_navtree(dir, navtree);
        self
    }

    /// Add a sibling script to a build.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_script(self, dir: &str, name: &str, content: impl Into<String>) -> Self {
        self.set_script(dir, name, content);
        self
    }

    /// Replace a sibling script, adding it if new.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_script(&self, dir: &str, name: &str, content: impl Into<String>) {
        self.builds
            .write()
            .unwrap()
            .entry(VersionRef::new(dir))
            .or_default()
            .scripts
            .insert(name.to_owned(), content.into());
    }

    /// Change the modification time of a sibling script.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_script_mtime(&self, dir: &str, name: &str, mtime: f64) {
        self.builds
            .write()
            .unwrap()
            .entry(VersionRef::new(dir))
            .or_default()
            .script_mtimes
            .insert(name.to_owned(), mtime);
    }

    /// Set the modification time of a build.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_mtime(self, dir: &str, mtime: f64) -> Self {
        self.set_mtime(dir, mtime);
        self
    }

    /// Replace the `navtreedata.js` content of a build, adding it if new.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_navtree(&self, dir: &str, navtree: impl Into<String>) {
        self.builds
            .write()
            .unwrap()
            .entry(VersionRef::new(dir))
            .or_default()
            .navtree = navtree.into();
    }

    /// Change the modification time of a build.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_mtime(&self, dir: &str, mtime: f64) {
        self.builds
            .write()
            .unwrap()
            .entry(VersionRef::new(dir))
            .or_default()
            .mtime = mtime;
    }

    /// Remove a build.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn remove_build(&self, dir: &str) {
        self.builds.write().unwrap().remove(&VersionRef::new(dir));
    }

    fn not_found(version: &VersionRef) -> StorageError {
        StorageError::not_found(&version.path).with_backend(BACKEND)
    }
}

impl Storage for MockStorage {
    fn scan(&self) -> Result<Vec<VersionRef>, StorageError> {
        let mut versions: Vec<_> = self.builds.read().unwrap().keys().cloned().collect();
        versions.sort();
        Ok(versions)
    }

    fn read(&self, version: &VersionRef) -> Result<String, StorageError> {
        self.builds
            .read()
            .unwrap()
            .get(version)
            .map(|b| b.navtree.clone())
            .ok_or_else(|| Self::not_found(version))
    }

    fn read_script(&self, version: &VersionRef, name: &str) -> Result<Option<String>, StorageError> {
        validate_script_name(name).map_err(|e| e.with_backend(BACKEND))?;
        let builds = self.builds.read().unwrap();
        let build = builds.get(version).ok_or_else(|| Self::not_found(version))?;
        Ok(build.scripts.get(name).cloned())
    }

    fn mtime(&self, version: &VersionRef) -> Result<f64, StorageError> {
        self.builds
            .read()
            .unwrap()
            .get(version)
            .map(|b| b.mtime)
            .ok_or_else(|| Self::not_found(version))
    }

    fn script_mtime(&self, version: &VersionRef, name: &str) -> Result<Option<f64>, StorageError> {
        validate_script_name(name).map_err(|e| e.with_backend(BACKEND))?;
        let builds = self.builds.read().unwrap();
        let build = builds.get(version).ok_or_else(|| Self::not_found(version))?;
        Ok(build
            .scripts
            .contains_key(name)
            .then(|| build.script_mtimes.get(name).copied().unwrap_or_default()))
    }
}
