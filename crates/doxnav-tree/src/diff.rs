//! Table-of-contents changes between two documentation builds.
//!
//! Nodes are matched by their title path (ancestor titles followed by the
//! node's own title). Repeated title paths are matched by occurrence, so
//! the second "Configuration" under "Architecture" in one build pairs
//! with the second one in the other.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::node::NavTree;

/// A single difference between two trees.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum Change {
    /// Entry present only in the new tree.
    Added {
        /// Title path.
        path: Vec<String>,
        /// Link target in the new tree.
        href: Option<String>,
    },
    /// Entry present only in the old tree.
    Removed {
        /// Title path.
        path: Vec<String>,
        /// Link target in the old tree.
        href: Option<String>,
    },
    /// Entry present in both trees with a different link target.
    Relinked {
        /// Title path.
        path: Vec<String>,
        /// Link target in the old tree.
        old: Option<String>,
        /// Link target in the new tree.
        new: Option<String>,
    },
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let href = |h: &Option<String>| h.clone().unwrap_or_else(|| "-".to_owned());
        match self {
            Self::Added { path, href: h } => write!(f, "+ {}  ({})", path.join(" / "), href(h)),
            Self::Removed { path, href: h } => write!(f, "- {}  ({})", path.join(" / "), href(h)),
            Self::Relinked { path, old, new } => write!(
                f,
                "~ {}  ({} -> {})",
                path.join(" / "),
                href(old),
                href(new)
            ),
        }
    }
}

/// Key identifying a node across builds.
type EntryKey = (Vec<String>, usize);

struct Entry {
    key: EntryKey,
    href: Option<String>,
}

/// Flatten a tree into keyed entries in walk order.
fn keyed_entries(tree: &NavTree) -> Vec<Entry> {
    let mut titles: Vec<String> = Vec::new();
    let mut occurrences: HashMap<Vec<String>, usize> = HashMap::new();
    let mut entries = Vec::new();

    for walked in tree.walk() {
        titles.truncate(walked.position.len() - 1);
        titles.push(walked.node.title.clone());

        let count = occurrences.entry(titles.clone()).or_insert(0);
        let key = (titles.clone(), *count);
        *count += 1;

        entries.push(Entry {
            key,
            href: walked.node.href.clone(),
        });
    }

    entries
}

/// Compute the changes turning `old` into `new`.
///
/// Additions and relinks come first in new-tree order, removals follow in
/// old-tree order.
#[must_use]
pub fn diff(old: &NavTree, new: &NavTree) -> Vec<Change> {
    let old_entries = keyed_entries(old);
    let new_entries = keyed_entries(new);

    let old_by_key: HashMap<&EntryKey, &Entry> =
        old_entries.iter().map(|entry| (&entry.key, entry)).collect();
    let new_keys: HashSet<&EntryKey> = new_entries.iter().map(|entry| &entry.key).collect();

    let mut changes = Vec::new();

    for entry in &new_entries {
        match old_by_key.get(&entry.key) {
            None => changes.push(Change::Added {
                path: entry.key.0.clone(),
                href: entry.href.clone(),
            }),
            Some(previous) if previous.href != entry.href => changes.push(Change::Relinked {
                path: entry.key.0.clone(),
                old: previous.href.clone(),
                new: entry.href.clone(),
            }),
            Some(_) => {}
        }
    }

    for entry in &old_entries {
        if !new_keys.contains(&entry.key) {
            changes.push(Change::Removed {
                path: entry.key.0.clone(),
                href: entry.href.clone(),
            });
        }
    }

    changes
}
