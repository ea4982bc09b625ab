//! Immutable snapshot of every loaded version.

use std::path::PathBuf;
use std::sync::Arc;

use doxnav_tree::{Breadcrumb, IndexChunks, NavTreeData, Position, TreeStats, ValidationReport};
use serde::Serialize;

/// One documentation build with its decoded navigation tree.
#[derive(Debug)]
pub struct Version {
    /// Version label (e.g., "ear-5.0").
    pub label: String,
    /// Build directory relative to the documentation root.
    pub path: PathBuf,
    /// Decoded `navtreedata.js`.
    pub data: NavTreeData,
    /// Validation findings.
    pub report: ValidationReport,
    /// Deep-link index rebuilt from the tree.
    pub chunks: IndexChunks,
    /// Node counts.
    pub stats: TreeStats,
    /// Deferred scripts read while expanding children, sorted.
    pub scripts: Vec<String>,
}

/// Where a deep link lands in a version's tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Location {
    /// Requested href.
    pub href: String,
    /// Indexed href that matched (the page when only the page is indexed).
    pub key: String,
    /// Index chunk holding the key.
    pub chunk: usize,
    /// Position of the matched node.
    pub position: Position,
    /// Title of the matched node.
    pub title: String,
    /// Ancestors of the matched node, root first.
    pub breadcrumbs: Vec<Breadcrumb>,
}

impl Version {
    /// Resolve a deep link the way the viewer does.
    #[must_use]
    pub fn locate(&self, href: &str) -> Option<Location> {
        let located = self.chunks.locate(href)?;
        let node = self.data.tree.get(&located.position)?;
        Some(Location {
            href: href.to_owned(),
            title: node.title.clone(),
            breadcrumbs: self.data.tree.breadcrumbs(&located.position),
            key: located.key,
            chunk: located.chunk,
            position: located.position,
        })
    }

    /// Summary used in version listings.
    #[must_use]
    pub fn summary(&self) -> VersionSummary {
        VersionSummary {
            label: self.label.clone(),
            nodes: self.stats.nodes,
            errors: self.report.errors().count(),
            warnings: self.report.warnings().count(),
        }
    }
}

/// Version listing entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VersionSummary {
    /// Version label.
    pub label: String,
    /// Total number of nodes.
    pub nodes: usize,
    /// Number of validation errors.
    pub errors: usize,
    /// Number of validation warnings.
    pub warnings: usize,
}

/// A build whose navigation tree could not be loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoadFailure {
    /// Version label.
    pub label: String,
    /// Error message.
    pub error: String,
}

/// Storage modification stamp of one build.
pub(crate) type Stamp = (String, Option<f64>);

/// Snapshot of the documentation library.
#[derive(Debug, Default)]
pub struct LibraryState {
    versions: Vec<Arc<Version>>,
    failures: Vec<LoadFailure>,
    pub(crate) stamps: Vec<Stamp>,
}

impl LibraryState {
    pub(crate) fn new(
        versions: Vec<Arc<Version>>,
        failures: Vec<LoadFailure>,
        stamps: Vec<Stamp>,
    ) -> Self {
        Self {
            versions,
            failures,
            stamps,
        }
    }

    /// Loaded versions sorted by label.
    #[must_use]
    pub fn versions(&self) -> &[Arc<Version>] {
        &self.versions
    }

    /// Version by label.
    #[must_use]
    pub fn version(&self, label: &str) -> Option<&Arc<Version>> {
        self.versions
            .binary_search_by(|v| v.label.as_str().cmp(label))
            .ok()
            .map(|i| &self.versions[i])
    }

    /// Builds that failed to load.
    #[must_use]
    pub fn failures(&self) -> &[LoadFailure] {
        &self.failures
    }

    /// Load failure recorded for a label.
    #[must_use]
    pub fn failure(&self, label: &str) -> Option<&LoadFailure> {
        self.failures.iter().find(|f| f.label == label)
    }
}
