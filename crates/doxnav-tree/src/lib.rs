//! Navigation tree model for Doxygen documentation builds.
//!
//! This crate provides:
//! - [`NavTreeData`]: the decoded contents of a `navtreedata.js` file
//! - [`NavTree`] traversal, lookup and breadcrumb building
//! - [`validate`]: structural checks producing a [`ValidationReport`]
//! - [`IndexChunks`]: the `navtreeindexN.js` maps the viewer uses to
//!   restore tree state from a deep link
//! - [`diff`]: table-of-contents changes between two builds
//!
//! # Quick Start
//!
//! ```
//! use doxnav_tree::{Children, NavTree, Node};
//!
//! let tree = NavTree::new(vec![Node::with_children(
//!     "Guide",
//!     Some("d6/d86/md_Guide.html"),
//!     vec![Node::leaf("Setup", Some("d6/d86/md_Guide.html#setup"))],
//! )]);
//!
//! let position = tree.find_href("d6/d86/md_Guide.html#setup").unwrap();
//! assert_eq!(position.as_slice(), &[0, 0]);
//! assert_eq!(tree.breadcrumbs(&position)[0].title, "Guide");
//! assert!(matches!(tree.roots()[0].children, Children::Inline(_)));
//! ```

mod diff;
mod href;
mod index;
mod node;
mod validate;

pub use diff::{Change, diff};
pub use href::{
    DEFAULT_HASHED_PATTERN, DEFAULT_ROOT_PAGE_PATTERN, Href, HrefRules, HrefRulesError,
};
pub use index::{DEFAULT_CHUNK_SIZE, IndexChunk, IndexChunks, Located};
pub use node::{
    Breadcrumb, Children, NavIndex, NavTree, NavTreeData, Node, Position, SyncMessages, TreeStats,
    Walk, WalkEntry,
};
pub use validate::{Issue, IssueKind, Severity, ValidationReport, validate};
