//! Serialization in the generator's own layout.
//!
//! Output of [`write_navtree`] is byte-identical to what Doxygen emits for
//! the same data, so rewriting an unmodified file is a no-op.

use std::fmt::Write as _;

use doxnav_tree::{Children, IndexChunk, NavTreeData, Node};

use crate::decode::{NAVTREE, NAVTREEINDEX, SYNCOFFMSG, SYNCONMSG};

/// Serialize a `navtreedata.js` script.
#[must_use]
pub fn write_navtree(data: &NavTreeData) -> String {
    let mut out = String::new();
    if let Some(header) = &data.header {
        out.push_str("/*");
        if header.contains("*/") {
            tracing::warn!("Header contains \"*/\", writing it as \"* /\"");
            out.push_str(&header.replace("*/", "* /"));
        } else {
            out.push_str(header);
        }
        out.push_str("*/\n");
    }

    write_array_declaration(&mut out, NAVTREE, data.tree.roots());
    out.push_str("\n\n");

    let _ = write!(out, "var {NAVTREEINDEX} =\n[\n");
    for (i, href) in data.index.entries().iter().enumerate() {
        if i > 0 {
            out.push_str(",\n");
        }
        push_double_quoted(&mut out, href);
    }
    out.push_str("\n];\n\n");

    let _ = write!(out, "var {SYNCONMSG} = ");
    push_single_quoted(&mut out, &data.sync.on);
    let _ = write!(out, ";\nvar {SYNCOFFMSG} = ");
    push_single_quoted(&mut out, &data.sync.off);
    out.push(';');
    out
}

/// Serialize a deferred child script (`var NAME = [ ... ];`).
#[must_use]
pub fn write_deferred(name: &str, nodes: &[Node]) -> String {
    let mut out = String::new();
    write_array_declaration(&mut out, name, nodes);
    out.push('\n');
    out
}

/// Serialize the `navtreeindex<number>.js` script for one chunk.
#[must_use]
pub fn write_index_chunk(number: usize, chunk: &IndexChunk) -> String {
    let mut out = String::new();
    let _ = write!(out, "var {NAVTREEINDEX}{number} =\n{{\n");
    for (i, (href, position)) in chunk.entries().iter().enumerate() {
        if i > 0 {
            out.push_str(",\n");
        }
        push_double_quoted(&mut out, href);
        let _ = write!(out, ":{position}");
    }
    out.push_str("\n};\n");
    out
}

fn write_array_declaration(out: &mut String, name: &str, nodes: &[Node]) {
    let _ = write!(out, "var {name} =\n[\n");
    write_nodes(out, nodes, 1);
    out.push_str("\n];");
}

fn write_nodes(out: &mut String, nodes: &[Node], depth: usize) {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            out.push_str(",\n");
        }
        write_node(out, node, depth);
    }
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);
    out.push_str(&indent);
    out.push_str("[ ");
    push_double_quoted(out, &node.title);
    out.push_str(", ");
    match &node.href {
        Some(href) => push_double_quoted(out, href),
        None => out.push_str("null"),
    }
    out.push_str(", ");
    match &node.children {
        Children::Leaf => out.push_str("null ]"),
        Children::Deferred(script) => {
            push_double_quoted(out, script);
            out.push_str(" ]");
        }
        Children::Inline(children) if children.is_empty() => out.push_str("[] ]"),
        Children::Inline(children) => {
            out.push_str("[\n");
            write_nodes(out, children, depth + 1);
            out.push('\n');
            out.push_str(&indent);
            out.push_str("] ]");
        }
    }
}

fn push_double_quoted(out: &mut String, value: &str) {
    out.push('"');
    push_escaped(out, value, '"');
    out.push('"');
}

fn push_single_quoted(out: &mut String, value: &str) {
    out.push('\'');
    push_escaped(out, value, '\'');
    out.push('\'');
}

fn push_escaped(out: &mut String, value: &str, quote: char) {
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
}
