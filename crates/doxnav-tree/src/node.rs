//! Navigation tree data model.
//!
//! A `navtreedata.js` file decodes into [`NavTreeData`]: the root forest
//! ([`NavTree`]), the flat deep-link index ([`NavIndex`]) and the two
//! panel synchronisation messages ([`SyncMessages`]).
//!
//! Nodes own their children, so the structure is a tree by construction.
//! Child order is the table-of-contents order and is never changed by any
//! operation in this crate.

use std::fmt;

use serde::Serialize;

/// Children of a navigation node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Children {
    /// No children (`null` in the script).
    Leaf,
    /// Children listed inline (a nested array).
    Inline(Vec<Node>),
    /// Children stored in a separate script loaded on demand (a string
    /// naming that script, e.g. `"index"` for `index.js`).
    Deferred(String),
}

impl Children {
    /// Inline child nodes, empty for leaves and deferred children.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        match self {
            Self::Inline(nodes) => nodes,
            Self::Leaf | Self::Deferred(_) => &[],
        }
    }

    /// Name of the script holding deferred children.
    #[must_use]
    pub fn script(&self) -> Option<&str> {
        match self {
            Self::Deferred(name) => Some(name),
            Self::Leaf | Self::Inline(_) => None,
        }
    }
}

/// Navigation tree node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Node {
    /// Display title.
    pub title: String,
    /// Link target relative to the documentation root (`None` for a
    /// container without a page).
    pub href: Option<String>,
    /// Child nodes.
    pub children: Children,
}

impl Node {
    /// Create a node without children.
    #[must_use]
    pub fn leaf(title: impl Into<String>, href: Option<&str>) -> Self {
        Self {
            title: title.into(),
            href: href.map(str::to_owned),
            children: Children::Leaf,
        }
    }

    /// Create a node with inline children.
    #[must_use]
    pub fn with_children(title: impl Into<String>, href: Option<&str>, children: Vec<Node>) -> Self {
        Self {
            title: title.into(),
            href: href.map(str::to_owned),
            children: Children::Inline(children),
        }
    }

    /// Create a node whose children live in a separate script.
    #[must_use]
    pub fn deferred(title: impl Into<String>, href: Option<&str>, script: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            href: href.map(str::to_owned),
            children: Children::Deferred(script.into()),
        }
    }
}

/// Location of a node: child indices from the root forest down.
///
/// `[2]` is the third root, `[2, 0]` its first child.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Position(Vec<usize>);

impl Position {
    /// Create a position from child indices.
    #[must_use]
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// Child indices from the root.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Number of levels below the forest (1 for a root node).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the empty position (the forest itself).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Position of the parent node, `None` for roots.
    #[must_use]
    pub fn parent(&self) -> Option<Position> {
        match self.0.split_last() {
            Some((_, rest)) if !rest.is_empty() => Some(Self(rest.to_vec())),
            _ => None,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, idx) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{idx}")?;
        }
        f.write_str("]")
    }
}

impl From<Vec<usize>> for Position {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

/// Ancestor entry for a located node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    /// Display title.
    pub title: String,
    /// Link target, if the ancestor has a page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// Node counts for a tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    /// Total number of nodes.
    pub nodes: usize,
    /// Nodes without children.
    pub leaves: usize,
    /// Nodes with deferred children.
    pub deferred: usize,
    /// Nodes without an href.
    pub unlinked: usize,
    /// Number of levels (1 for a flat list).
    pub max_depth: usize,
}

/// Ordered root forest of a navigation tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NavTree {
    roots: Vec<Node>,
}

impl NavTree {
    /// Create a tree from its root nodes.
    #[must_use]
    pub fn new(roots: Vec<Node>) -> Self {
        Self { roots }
    }

    /// Root nodes in table-of-contents order.
    #[must_use]
    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    /// Mutable root nodes.
    pub fn roots_mut(&mut self) -> &mut Vec<Node> {
        &mut self.roots
    }

    /// Consume the tree, returning its root nodes.
    #[must_use]
    pub fn into_roots(self) -> Vec<Node> {
        self.roots
    }

    /// True when the forest has no roots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Depth-first pre-order traversal.
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(self.roots.iter(), 0)],
            position: Vec::new(),
        }
    }

    /// Node at a position.
    #[must_use]
    pub fn get(&self, position: &Position) -> Option<&Node> {
        let (&first, rest) = position.as_slice().split_first()?;
        let mut node = self.roots.get(first)?;
        for &idx in rest {
            node = node.children.nodes().get(idx)?;
        }
        Some(node)
    }

    /// Position of the first node (in walk order) linking to `href`.
    #[must_use]
    pub fn find_href(&self, href: &str) -> Option<Position> {
        self.walk()
            .find(|entry| entry.node.href.as_deref() == Some(href))
            .map(|entry| entry.position)
    }

    /// Ancestors of the node at `position`, root first.
    ///
    /// The node itself is not included. Unknown positions yield the
    /// ancestors that do exist.
    #[must_use]
    pub fn breadcrumbs(&self, position: &Position) -> Vec<Breadcrumb> {
        let indices = position.as_slice();
        let mut crumbs = Vec::new();
        let mut level = self.roots.as_slice();
        for &idx in indices.iter().take(indices.len().saturating_sub(1)) {
            let Some(node) = level.get(idx) else {
                break;
            };
            crumbs.push(Breadcrumb {
                title: node.title.clone(),
                href: node.href.clone(),
            });
            level = node.children.nodes();
        }
        crumbs
    }

    /// Every non-null href in walk order (duplicates included).
    #[must_use]
    pub fn hrefs(&self) -> Vec<&str> {
        self.walk().filter_map(|entry| entry.node.href.as_deref()).collect()
    }

    /// Count nodes by kind and measure depth.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        for entry in self.walk() {
            stats.nodes += 1;
            stats.max_depth = stats.max_depth.max(entry.position.len());
            if entry.node.href.is_none() {
                stats.unlinked += 1;
            }
            match &entry.node.children {
                Children::Leaf => stats.leaves += 1,
                Children::Inline(children) if children.is_empty() => stats.leaves += 1,
                Children::Inline(_) => {}
                Children::Deferred(_) => stats.deferred += 1,
            }
        }
        stats
    }
}

/// Entry yielded by [`Walk`].
#[derive(Debug)]
pub struct WalkEntry<'a> {
    /// The visited node.
    pub node: &'a Node,
    /// Position of the node.
    pub position: Position,
}

/// Depth-first pre-order iterator over a [`NavTree`].
pub struct Walk<'a> {
    stack: Vec<(std::slice::Iter<'a, Node>, usize)>,
    position: Vec<usize>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = WalkEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let depth = self.stack.len().checked_sub(1)?;
            let (iter, next_idx) = self.stack.last_mut()?;
            if let Some(node) = iter.next() {
                let idx = *next_idx;
                *next_idx += 1;
                self.position.truncate(depth);
                self.position.push(idx);
                let position = Position(self.position.clone());
                if let Children::Inline(children) = &node.children {
                    self.stack.push((children.iter(), 0));
                }
                return Some(WalkEntry { node, position });
            }
            self.stack.pop();
        }
    }
}

/// Flat list of hrefs (`NAVTREEINDEX`) naming the first key of each
/// index chunk.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NavIndex(Vec<String>);

impl NavIndex {
    /// Create an index from its entries.
    #[must_use]
    pub fn new(entries: Vec<String>) -> Self {
        Self(entries)
    }

    /// Entries in file order.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.0
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the index has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Messages shown by the viewer's panel synchronisation toggle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SyncMessages {
    /// Shown while synchronisation is on (`SYNCONMSG`).
    pub on: String,
    /// Shown while synchronisation is off (`SYNCOFFMSG`).
    pub off: String,
}

impl Default for SyncMessages {
    fn default() -> Self {
        Self {
            on: "click to disable panel synchronisation".to_owned(),
            off: "click to enable panel synchronisation".to_owned(),
        }
    }
}

/// Decoded contents of a `navtreedata.js` file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NavTreeData {
    /// Comment preceding the first declaration (the generator's license
    /// notice), without the `/*` `*/` delimiters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    /// Root forest (`NAVTREE`).
    pub tree: NavTree,
    /// Deep-link index (`NAVTREEINDEX`).
    pub index: NavIndex,
    /// Synchronisation toggle messages.
    pub sync: SyncMessages,
}
