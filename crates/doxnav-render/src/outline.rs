//! Plain-text outline.

use std::fmt::Write as _;

use doxnav_tree::{Children, NavTree};

/// Render `tree` as an indented outline, one entry per line.
///
/// Linked entries show their target after an arrow; deferred children
/// show the script they are loaded from.
#[must_use]
pub fn render_outline(tree: &NavTree) -> String {
    let mut out = String::new();
    for entry in tree.walk() {
        let indent = "  ".repeat(entry.position.len() - 1);
        out.push_str(&indent);
        out.push_str(&entry.node.title);
        if let Some(href) = &entry.node.href {
            let _ = write!(out, "  → {href}");
        }
        if let Children::Deferred(script) = &entry.node.children {
            let _ = write!(out, "  [{script}.js]");
        }
        out.push('\n');
    }
    out
}
