//! Decoding parsed scripts into the navigation tree model.

use doxnav_tree::{Children, IndexChunk, NavIndex, NavTree, NavTreeData, Node, Position, SyncMessages};

use crate::error::DecodeError;
use crate::parser::{Script, Value};

/// Root forest declaration.
pub const NAVTREE: &str = "NAVTREE";
/// Chunk index declaration.
pub const NAVTREEINDEX: &str = "NAVTREEINDEX";
/// Message shown while panel synchronisation is on.
pub const SYNCONMSG: &str = "SYNCONMSG";
/// Message shown while panel synchronisation is off.
pub const SYNCOFFMSG: &str = "SYNCOFFMSG";

/// Decode a `navtreedata.js` script.
///
/// `NAVTREE` is required. A missing `NAVTREEINDEX` decodes as an empty
/// index and missing messages fall back to the generator defaults.
/// Other declarations are ignored.
pub fn decode(script: &Script) -> Result<NavTreeData, DecodeError> {
    let tree = match script.get(NAVTREE) {
        Some(value) => NavTree::new(decode_entries(NAVTREE, value, &[])?),
        None => return Err(DecodeError::Missing(NAVTREE.to_owned())),
    };

    let index = match script.get(NAVTREEINDEX) {
        Some(Value::Array(items)) => NavIndex::new(
            items
                .iter()
                .map(|item| match item {
                    Value::Str(href) => Ok(href.clone()),
                    _ => Err(wrong_type(NAVTREEINDEX, "an array of strings")),
                })
                .collect::<Result<_, _>>()?,
        ),
        Some(_) => return Err(wrong_type(NAVTREEINDEX, "an array of strings")),
        None => NavIndex::default(),
    };

    let defaults = SyncMessages::default();
    let sync = SyncMessages {
        on: message(script, SYNCONMSG)?.unwrap_or(defaults.on),
        off: message(script, SYNCOFFMSG)?.unwrap_or(defaults.off),
    };

    for declaration in &script.declarations {
        if ![NAVTREE, NAVTREEINDEX, SYNCONMSG, SYNCOFFMSG].contains(&declaration.name.as_str()) {
            tracing::debug!(
                name = %declaration.name,
                line = declaration.line,
                "Ignoring unknown declaration"
            );
        }
    }

    Ok(NavTreeData {
        header: script.header.clone(),
        tree,
        index,
        sync,
    })
}

/// Decode a deferred child script (`var NAME = [ ... ];`).
///
/// `parent` is the position of the node whose children are deferred;
/// it only affects error messages.
pub fn decode_deferred(script: &Script, name: &str, parent: &Position) -> Result<Vec<Node>, DecodeError> {
    let value = script
        .get(name)
        .ok_or_else(|| DecodeError::Missing(name.to_owned()))?;
    decode_entries(name, value, parent.as_slice())
}

/// Decode the `NAVTREEINDEX<number>` chunk script.
pub fn decode_index_chunk(script: &Script, number: usize) -> Result<IndexChunk, DecodeError> {
    let name = format!("{NAVTREEINDEX}{number}");
    let Some(value) = script.get(&name) else {
        return Err(DecodeError::Missing(name));
    };
    let Value::Object(entries) = value else {
        return Err(DecodeError::WrongType {
            name,
            expected: "an object",
        });
    };

    let mut decoded = Vec::with_capacity(entries.len());
    for (href, position) in entries {
        let indices = match position {
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Int(n) => usize::try_from(*n).ok(),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>(),
            _ => None,
        };
        let Some(indices) = indices else {
            return Err(DecodeError::WrongType {
                name,
                expected: "an object of integer arrays",
            });
        };
        decoded.push((href.clone(), Position::new(indices)));
    }
    Ok(IndexChunk::new(decoded))
}

fn wrong_type(name: &str, expected: &'static str) -> DecodeError {
    DecodeError::WrongType {
        name: name.to_owned(),
        expected,
    }
}

fn message(script: &Script, name: &str) -> Result<Option<String>, DecodeError> {
    match script.get(name) {
        Some(Value::Str(text)) => Ok(Some(text.clone())),
        Some(_) => Err(wrong_type(name, "a string")),
        None => Ok(None),
    }
}

fn decode_entries(name: &str, value: &Value, parent: &[usize]) -> Result<Vec<Node>, DecodeError> {
    let Value::Array(items) = value else {
        return Err(if parent.is_empty() {
            wrong_type(name, "an array")
        } else {
            entry_error(parent, format!("has children that are {}", value.kind()))
        });
    };

    let mut path = parent.to_vec();
    let mut nodes = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        path.push(idx);
        nodes.push(decode_node(name, item, &path)?);
        path.pop();
    }
    Ok(nodes)
}

fn decode_node(name: &str, value: &Value, path: &[usize]) -> Result<Node, DecodeError> {
    let Value::Array(fields) = value else {
        return Err(entry_error(path, format!("is {}, expected an array", value.kind())));
    };
    let [title, href, children] = fields.as_slice() else {
        return Err(entry_error(
            path,
            format!("has {} elements, expected 3", fields.len()),
        ));
    };

    let Value::Str(title) = title else {
        return Err(entry_error(path, format!("title is {}", title.kind())));
    };
    let href = match href {
        Value::Str(href) => Some(href.clone()),
        Value::Null => None,
        other => return Err(entry_error(path, format!("href is {}", other.kind()))),
    };
    let children = match children {
        Value::Null => Children::Leaf,
        Value::Str(script) => Children::Deferred(script.clone()),
        Value::Array(_) => Children::Inline(decode_entries(name, children, path)?),
        other => return Err(entry_error(path, format!("children are {}", other.kind()))),
    };

    Ok(Node {
        title: title.clone(),
        href,
        children,
    })
}

fn entry_error(path: &[usize], reason: String) -> DecodeError {
    DecodeError::Entry {
        position: Position::new(path.to_vec()),
        reason,
    }
}
