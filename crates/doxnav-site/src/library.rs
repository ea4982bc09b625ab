//! Versioned navigation tree library.
//!
//! [`Library`] loads every build a [`Storage`] exposes into an immutable
//! [`LibraryState`] snapshot and swaps in a new snapshot when the builds
//! change on disk.
//!
//! # Thread Safety
//!
//! - `state()` returns `Arc<LibraryState>` with minimal locking (just Arc clone)
//! - `reload_if_needed()` uses double-checked locking, so readers never
//!   wait for parsing
//! - `invalidate()` is lock-free (atomic flag)

use std::collections::{BTreeSet, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use doxnav_script::{decode_deferred, load, parse};
use doxnav_storage::{Storage, VersionRef};
use doxnav_tree::{
    Change, Children, DEFAULT_CHUNK_SIZE, HrefRules, IndexChunks, Node, Position, diff, validate,
};

use crate::state::{LibraryState, LoadFailure, Location, Stamp, Version, VersionSummary};

/// Library loading options.
#[derive(Clone, Debug)]
pub struct LibraryOptions {
    /// Href patterns used for validation.
    pub rules: HrefRules,
    /// Entries per index chunk.
    pub chunk_size: usize,
    /// Replace deferred children with the contents of their scripts.
    pub expand_deferred: bool,
    /// Minimum time between two storage change checks. Zero checks on
    /// every query.
    pub check_interval: Duration,
}

impl Default for LibraryOptions {
    fn default() -> Self {
        Self {
            rules: HrefRules::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            expand_deferred: false,
            check_interval: Duration::ZERO,
        }
    }
}

/// Query error.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// No loaded version has this label.
    #[error("version not found: {0}")]
    VersionNotFound(String),
    /// The href does not resolve to any node of the version.
    #[error("href not found in {version}: {href}")]
    HrefNotFound {
        /// Version label.
        version: String,
        /// Requested href.
        href: String,
    },
    /// The build exists but its navigation tree could not be loaded.
    #[error("version {version} failed to load: {error}")]
    LoadFailed {
        /// Version label.
        version: String,
        /// Load error message.
        error: String,
    },
}

/// Collection of documentation builds loaded from storage.
pub struct Library {
    storage: Arc<dyn Storage>,
    options: LibraryOptions,
    /// Mutex for serializing reload operations.
    reload_lock: Mutex<()>,
    /// Current snapshot (atomically swappable).
    current_state: RwLock<Arc<LibraryState>>,
    /// Cache validity flag.
    cache_valid: AtomicBool,
    /// Time of the last storage change check.
    last_check: Mutex<Option<Instant>>,
}

impl Library {
    /// Create a library over `storage`. Nothing is loaded until the first
    /// query.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, options: LibraryOptions) -> Self {
        Self {
            storage,
            options,
            reload_lock: Mutex::new(()),
            current_state: RwLock::new(Arc::new(LibraryState::default())),
            cache_valid: AtomicBool::new(false),
            last_check: Mutex::new(None),
        }
    }

    /// Current snapshot without checking for changes.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn state(&self) -> Arc<LibraryState> {
        Arc::clone(&self.current_state.read().unwrap())
    }

    /// Reload from storage if invalidated or if any build changed.
    ///
    /// Change detection compares the scanned builds, their mtimes and
    /// the mtimes of expanded deferred scripts with those recorded in the
    /// current snapshot. It runs at most once per `check_interval`.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn reload_if_needed(&self) -> Arc<LibraryState> {
        if self.cache_valid.load(Ordering::Acquire) {
            let state = self.state();
            if !self.check_due() || self.stamps(&state) == state.stamps {
                return state;
            }
            self.cache_valid.store(false, Ordering::Release);
        }

        let _guard = self.reload_lock.lock().unwrap();

        if self.cache_valid.load(Ordering::Acquire) {
            return self.state();
        }

        let state = Arc::new(self.load());
        *self.last_check.lock().unwrap() = Some(Instant::now());
        *self.current_state.write().unwrap() = Arc::clone(&state);
        self.cache_valid.store(true, Ordering::Release);
        state
    }

    /// Mark the snapshot stale. The next query reloads.
    pub fn invalidate(&self) {
        self.cache_valid.store(false, Ordering::Release);
    }

    /// Summaries of every loaded version.
    #[must_use]
    pub fn versions(&self) -> Vec<VersionSummary> {
        self.reload_if_needed()
            .versions()
            .iter()
            .map(|v| v.summary())
            .collect()
    }

    /// Version by label.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::LoadFailed`] for builds whose tree failed to
    /// load and [`LibraryError::VersionNotFound`] for unknown labels.
    pub fn version(&self, label: &str) -> Result<Arc<Version>, LibraryError> {
        let state = self.reload_if_needed();
        if let Some(version) = state.version(label) {
            return Ok(Arc::clone(version));
        }
        Err(match state.failure(label) {
            Some(failure) => LibraryError::LoadFailed {
                version: label.to_owned(),
                error: failure.error.clone(),
            },
            None => LibraryError::VersionNotFound(label.to_owned()),
        })
    }

    /// Resolve a deep link in a version.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError`] if the version or href is unknown.
    pub fn locate(&self, label: &str, href: &str) -> Result<Location, LibraryError> {
        self.version(label)?
            .locate(href)
            .ok_or_else(|| LibraryError::HrefNotFound {
                version: label.to_owned(),
                href: href.to_owned(),
            })
    }

    /// Table-of-contents changes from `old` to `new`.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::VersionNotFound`] if either version is unknown.
    pub fn diff(&self, old: &str, new: &str) -> Result<Vec<Change>, LibraryError> {
        let old = self.version(old)?;
        let new = self.version(new)?;
        Ok(diff(&old.data.tree, &new.data.tree))
    }

    /// Whether `check_interval` has passed since the last change check.
    fn check_due(&self) -> bool {
        let interval = self.options.check_interval;
        if interval.is_zero() {
            return true;
        }
        let mut last = self.last_check.lock().unwrap();
        let now = Instant::now();
        if last.is_some_and(|at| now.duration_since(at) < interval) {
            return false;
        }
        *last = Some(now);
        true
    }

    fn stamps(&self, state: &LibraryState) -> Vec<Stamp> {
        let Ok(refs) = self.storage.scan() else {
            return Vec::new();
        };
        let mut stamps = Vec::with_capacity(refs.len());
        for vref in &refs {
            let scripts = state
                .version(&vref.label)
                .map(|v| v.scripts.as_slice())
                .unwrap_or_default();
            self.push_stamps(&mut stamps, vref, scripts);
        }
        stamps
    }

    fn push_stamps(&self, stamps: &mut Vec<Stamp>, vref: &VersionRef, scripts: &[String]) {
        stamps.push((vref.label.clone(), self.storage.mtime(vref).ok()));
        for name in scripts {
            stamps.push((
                format!("{}/{name}.js", vref.label),
                self.storage.script_mtime(vref, name).ok().flatten(),
            ));
        }
    }

    fn load(&self) -> LibraryState {
        let refs = match self.storage.scan() {
            Ok(refs) => refs,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to scan documentation builds");
                return LibraryState::default();
            }
        };

        let mut versions = Vec::with_capacity(refs.len());
        let mut failures = Vec::new();
        let mut stamps = Vec::with_capacity(refs.len());

        for vref in refs {
            match self.load_version(&vref) {
                Ok(version) => {
                    self.push_stamps(&mut stamps, &vref, &version.scripts);
                    versions.push(Arc::new(version));
                }
                Err(error) => {
                    self.push_stamps(&mut stamps, &vref, &[]);
                    tracing::warn!(version = %vref.label, %error, "Failed to load navigation tree");
                    failures.push(LoadFailure {
                        label: vref.label,
                        error,
                    });
                }
            }
        }

        tracing::info!(
            versions = versions.len(),
            failures = failures.len(),
            "Loaded documentation library"
        );
        LibraryState::new(versions, failures, stamps)
    }

    fn load_version(&self, vref: &VersionRef) -> Result<Version, String> {
        let source = self.storage.read(vref).map_err(|e| e.to_string())?;
        let mut data = load(&source).map_err(|e| e.to_string())?;

        let mut scripts = BTreeSet::new();
        if self.options.expand_deferred {
            let mut seen = HashSet::new();
            self.expand(
                vref,
                data.tree.roots_mut(),
                &mut Vec::new(),
                &mut seen,
                &mut scripts,
            );
        }

        let report = validate(&data, &self.options.rules);
        let chunks = IndexChunks::build(&data.tree, self.options.chunk_size);
        let stats = data.tree.stats();

        tracing::info!(
            version = %vref.label,
            nodes = stats.nodes,
            errors = report.errors().count(),
            warnings = report.warnings().count(),
            "Loaded navigation tree"
        );

        Ok(Version {
            label: vref.label.clone(),
            path: vref.path.clone(),
            data,
            report,
            chunks,
            stats,
            scripts: scripts.into_iter().collect(),
        })
    }

    /// Replace deferred children with decoded nodes, depth first.
    ///
    /// A script already expanded on the current path is left deferred.
    /// Every script name read is added to `scripts`.
    fn expand(
        &self,
        vref: &VersionRef,
        nodes: &mut [Node],
        path: &mut Vec<usize>,
        seen: &mut HashSet<String>,
        scripts: &mut BTreeSet<String>,
    ) {
        for (idx, node) in nodes.iter_mut().enumerate() {
            path.push(idx);
            if let Children::Deferred(name) = &node.children
                && !seen.contains(name)
                && let Some(children) = self.read_deferred(vref, name, path, scripts)
            {
                let name = name.clone();
                node.children = Children::Inline(children);
                seen.insert(name.clone());
                if let Children::Inline(children) = &mut node.children {
                    self.expand(vref, children, path, seen, scripts);
                }
                seen.remove(&name);
            } else if let Children::Inline(children) = &mut node.children {
                self.expand(vref, children, path, seen, scripts);
            }
            path.pop();
        }
    }

    fn read_deferred(
        &self,
        vref: &VersionRef,
        name: &str,
        path: &[usize],
        scripts: &mut BTreeSet<String>,
    ) -> Option<Vec<Node>> {
        scripts.insert(name.to_owned());
        let source = match self.storage.read_script(vref, name) {
            Ok(Some(source)) => source,
            Ok(None) => {
                tracing::debug!(version = %vref.label, script = name, "Deferred script not found");
                return None;
            }
            Err(e) => {
                tracing::warn!(version = %vref.label, script = name, error = %e, "Failed to read deferred script");
                return None;
            }
        };

        let decoded = parse(&source)
            .map_err(|e| e.to_string())
            .and_then(|script| {
                decode_deferred(&script, name, &Position::new(path.to_vec()))
                    .map_err(|e| e.to_string())
            });
        match decoded {
            Ok(nodes) => Some(nodes),
            Err(error) => {
                tracing::warn!(version = %vref.label, script = name, %error, "Failed to decode deferred script");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    static_assertions::assert_impl_all!(super::Library: Send, Sync);

    use doxnav_storage::MockStorage;
    use pretty_assertions::assert_eq;

    use super::*;

    const EAR: &str = "var NAVTREE =\n[\n  [ \"EAR\", \"index.html\", [\n    \
        [ \"Introduction\", \"index.html\", \"index\" ],\n    \
        [ \"User guide\", \"d6/d86/md_User_guide.html\", [\n      \
        [ \"Use cases\", \"d6/d86/md_User_guide.html#use-cases\", null ]\n    ] ],\n    \
        [ \"Known issues\", \"d1/d21/md_Known_issues.html\", null ]\n  ] ]\n];\n\n\
        var NAVTREEINDEX =\n[\n\"d1/d21/md_Known_issues.html\"\n];";

    const EAR_NEXT: &str = "var NAVTREE =\n[\n  [ \"EAR\", \"index.html\", [\n    \
        [ \"User guide\", \"d6/d86/md_User_guide.html\", [\n      \
        [ \"Use cases\", \"d6/d86/md_User_guide.html#autotoc_md1\", null ]\n    ] ],\n    \
        [ \"FAQs\", \"d8/d8a/md_FAQs.html\", null ]\n  ] ]\n];";

    fn library(storage: MockStorage) -> (Arc<MockStorage>, Library) {
        let storage = Arc::new(storage);
        let library = Library::new(Arc::clone(&storage) as Arc<dyn Storage>, LibraryOptions::default());
        (storage, library)
    }

    #[test]
    fn test_versions_lists_summaries() {
        let (_, library) = library(
            MockStorage::new()
                .with_build("ear-5.0", EAR_NEXT)
                .with_build("ear-4.3.1/html", EAR),
        );

        let versions = library.versions();

        assert_eq!(
            versions,
            vec![
                VersionSummary {
                    label: "ear-4.3.1".to_owned(),
                    nodes: 5,
                    errors: 0,
                    warnings: 0,
                },
                VersionSummary {
                    label: "ear-5.0".to_owned(),
                    nodes: 4,
                    errors: 0,
                    warnings: 0,
                },
            ]
        );
    }

    #[test]
    fn test_broken_build_is_recorded_as_failure() {
        let (_, library) = library(
            MockStorage::new()
                .with_build("ear-5.0", EAR)
                .with_build("broken", "var NAVTREE = [ [ \"A\", null ];"),
        );

        let state = library.reload_if_needed();

        assert_eq!(state.versions().len(), 1);
        assert_eq!(state.failures().len(), 1);
        assert_eq!(state.failures()[0].label, "broken");
        assert!(state.failures()[0].error.starts_with("parse error"));
    }

    #[test]
    fn test_broken_version_reports_load_failure() {
        let (_, library) = library(
            MockStorage::new()
                .with_build("ear-5.0", EAR)
                .with_build("broken", "var NAVTREE = [ [ \"A\", null ];"),
        );

        let err = library.version("broken").unwrap_err();

        assert!(matches!(&err, LibraryError::LoadFailed { version, .. } if version == "broken"));
        assert!(err.to_string().starts_with("version broken failed to load: parse error"));
    }

    #[test]
    fn test_version_not_found() {
        let (_, library) = library(MockStorage::new().with_build("ear-5.0", EAR));

        let err = library.version("ear-9.9").unwrap_err();

        assert_eq!(err.to_string(), "version not found: ear-9.9");
    }

    #[test]
    fn test_locate_returns_breadcrumbs() {
        let (_, library) = library(MockStorage::new().with_build("ear-5.0", EAR));

        let location = library
            .locate("ear-5.0", "d6/d86/md_User_guide.html#use-cases")
            .unwrap();

        assert_eq!(location.title, "Use cases");
        assert_eq!(location.position, Position::new(vec![0, 1, 0]));
        let trail: Vec<_> = location.breadcrumbs.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(trail, vec!["EAR", "User guide"]);
    }

    #[test]
    fn test_locate_unknown_anchor_falls_back_to_page() {
        let (_, library) = library(MockStorage::new().with_build("ear-5.0", EAR));

        let location = library
            .locate("ear-5.0", "d1/d21/md_Known_issues.html#autotoc_md9")
            .unwrap();

        assert_eq!(location.key, "d1/d21/md_Known_issues.html");
        assert_eq!(location.title, "Known issues");
    }

    #[test]
    fn test_locate_unknown_href() {
        let (_, library) = library(MockStorage::new().with_build("ear-5.0", EAR));

        let err = library.locate("ear-5.0", "d9/d99/missing.html").unwrap_err();

        assert!(matches!(err, LibraryError::HrefNotFound { .. }));
    }

    #[test]
    fn test_diff_between_versions() {
        let (_, library) = library(
            MockStorage::new()
                .with_build("ear-4.3", EAR)
                .with_build("ear-5.0", EAR_NEXT),
        );

        let changes = library.diff("ear-4.3", "ear-5.0").unwrap();

        let rendered: Vec<_> = changes.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "~ EAR / User guide / Use cases  (d6/d86/md_User_guide.html#use-cases -> d6/d86/md_User_guide.html#autotoc_md1)",
                "+ EAR / FAQs  (d8/d8a/md_FAQs.html)",
                "- EAR / Introduction  (index.html)",
                "- EAR / Known issues  (d1/d21/md_Known_issues.html)",
            ]
        );
    }

    #[test]
    fn test_reload_on_mtime_change() {
        let (storage, library) = library(
            MockStorage::new()
                .with_build("ear-5.0", EAR)
                .with_mtime("ear-5.0", 1.0),
        );
        assert_eq!(library.versions()[0].nodes, 5);

        storage.set_navtree("ear-5.0", EAR_NEXT);
        storage.set_mtime("ear-5.0", 2.0);

        assert_eq!(library.versions()[0].nodes, 4);
    }

    #[test]
    fn test_unchanged_storage_keeps_snapshot() {
        let (storage, library) = library(MockStorage::new().with_build("ear-5.0", EAR));
        let first = library.reload_if_needed();

        // content changes without an mtime change are not noticed
        storage.set_navtree("ear-5.0", EAR_NEXT);
        let second = library.reload_if_needed();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let (storage, library) = library(MockStorage::new().with_build("ear-5.0", EAR));
        let first = library.reload_if_needed();
        storage.set_navtree("ear-5.0", EAR_NEXT);

        library.invalidate();
        let second = library.reload_if_needed();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.versions()[0].stats.nodes, 4);
    }

    #[test]
    fn test_new_build_triggers_reload() {
        let (storage, library) = library(MockStorage::new().with_build("ear-4.3", EAR));
        assert_eq!(library.versions().len(), 1);

        storage.set_navtree("ear-5.0", EAR_NEXT);

        assert_eq!(library.versions().len(), 2);
    }

    #[test]
    fn test_expand_deferred_children() {
        let storage = Arc::new(
            MockStorage::new()
                .with_build("ear-5.0", EAR)
                .with_script(
                    "ear-5.0",
                    "index",
                    "var index =\n[\n  [ \"Overview\", \"index.html#overview\", \"overview\" ]\n];",
                )
                .with_script(
                    "ear-5.0",
                    "overview",
                    "var overview =\n[\n  [ \"Goals\", \"index.html#goals\", null ]\n];",
                ),
        );
        let options = LibraryOptions {
            expand_deferred: true,
            ..Default::default()
        };
        let library = Library::new(storage, options);

        let version = library.version("ear-5.0").unwrap();

        let goals = version.data.tree.get(&Position::new(vec![0, 0, 0, 0])).unwrap();
        assert_eq!(goals.title, "Goals");
        assert_eq!(version.scripts, vec!["index", "overview"]);
        assert_eq!(version.stats.deferred, 0);
        assert_eq!(
            library.locate("ear-5.0", "index.html#goals").unwrap().position,
            Position::new(vec![0, 0, 0, 0])
        );
    }

    #[test]
    fn test_expand_deferred_stops_on_cycle() {
        let storage = Arc::new(
            MockStorage::new()
                .with_build("ear-5.0", EAR)
                .with_script(
                    "ear-5.0",
                    "index",
                    "var index =\n[\n  [ \"Again\", null, \"index\" ]\n];",
                ),
        );
        let options = LibraryOptions {
            expand_deferred: true,
            ..Default::default()
        };
        let library = Library::new(storage, options);

        let version = library.version("ear-5.0").unwrap();

        let again = version.data.tree.get(&Position::new(vec![0, 0, 0])).unwrap();
        assert_eq!(again.children, Children::Deferred("index".to_owned()));
    }

    #[test]
    fn test_missing_deferred_script_stays_deferred() {
        let storage = Arc::new(MockStorage::new().with_build("ear-5.0", EAR));
        let options = LibraryOptions {
            expand_deferred: true,
            ..Default::default()
        };
        let library = Library::new(storage, options);

        let version = library.version("ear-5.0").unwrap();

        assert_eq!(version.stats.deferred, 1);
    }

    #[test]
    fn test_check_interval_throttles_change_detection() {
        let storage = Arc::new(
            MockStorage::new()
                .with_build("ear-5.0", EAR)
                .with_mtime("ear-5.0", 1.0),
        );
        let options = LibraryOptions {
            check_interval: Duration::from_secs(3600),
            ..Default::default()
        };
        let library = Library::new(Arc::clone(&storage) as Arc<dyn Storage>, options);
        assert_eq!(library.versions()[0].nodes, 5);

        storage.set_navtree("ear-5.0", EAR_NEXT);
        storage.set_mtime("ear-5.0", 2.0);
        assert_eq!(library.versions()[0].nodes, 5);

        library.invalidate();
        assert_eq!(library.versions()[0].nodes, 4);
    }

    #[test]
    fn test_deferred_script_change_triggers_reload() {
        let storage = Arc::new(MockStorage::new().with_build("ear-5.0", EAR).with_script(
            "ear-5.0",
            "index",
            "var index =\n[\n  [ \"Overview\", \"index.html#overview\", null ]\n];",
        ));
        let options = LibraryOptions {
            expand_deferred: true,
            ..Default::default()
        };
        let library = Library::new(Arc::clone(&storage) as Arc<dyn Storage>, options);
        let first = library.version("ear-5.0").unwrap();
        assert_eq!(
            first.data.tree.get(&Position::new(vec![0, 0, 0])).unwrap().title,
            "Overview"
        );

        storage.set_script(
            "ear-5.0",
            "index",
            "var index =\n[\n  [ \"Goals\", \"index.html#goals\", null ]\n];",
        );
        storage.set_script_mtime("ear-5.0", "index", 2.0);

        let second = library.version("ear-5.0").unwrap();
        assert_eq!(
            second.data.tree.get(&Position::new(vec![0, 0, 0])).unwrap().title,
            "Goals"
        );
    }
}
