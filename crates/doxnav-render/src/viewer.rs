//! JSON model for client-side viewers.

use doxnav_tree::{Children, NavTreeData, Node, SyncMessages};
use serde::Serialize;

/// One entry of a [`ViewerTree`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ViewerItem {
    /// Display title.
    pub title: String,
    /// Link target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Inline children; absent for leaves and deferred entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ViewerItem>>,
    /// Script to load deferred children from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
}

impl From<&Node> for ViewerItem {
    fn from(node: &Node) -> Self {
        let (children, script) = match &node.children {
            Children::Leaf => (None, None),
            Children::Inline(nodes) => (Some(nodes.iter().map(Self::from).collect()), None),
            Children::Deferred(name) => (None, Some(name.clone())),
        };
        Self {
            title: node.title.clone(),
            href: node.href.clone(),
            children,
            script,
        }
    }
}

/// Navigation data shaped for a JavaScript viewer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ViewerTree {
    /// Root entries.
    pub items: Vec<ViewerItem>,
    /// First key of each index chunk.
    pub index: Vec<String>,
    /// Synchronisation toggle messages.
    pub sync: SyncMessages,
}

impl From<&NavTreeData> for ViewerTree {
    fn from(data: &NavTreeData) -> Self {
        Self {
            items: data.tree.roots().iter().map(ViewerItem::from).collect(),
            index: data.index.entries().to_vec(),
            sync: data.sync.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doxnav_tree::{NavIndex, NavTree};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_viewer_tree_json() {
        let data = NavTreeData {
            header: Some("license".to_owned()),
            tree: NavTree::new(vec![Node::with_children(
                "EAR",
                Some("index.html"),
                vec![
                    Node::deferred("Introduction", Some("index.html"), "index"),
                    Node::leaf("Architecture", None),
                ],
            )]),
            index: NavIndex::new(vec!["index.html".to_owned()]),
            sync: SyncMessages::default(),
        };

        let value = serde_json::to_value(ViewerTree::from(&data)).unwrap();

        assert_eq!(
            value,
            json!({
                "items": [{
                    "title": "EAR",
                    "href": "index.html",
                    "children": [
                        {"title": "Introduction", "href": "index.html", "script": "index"},
                        {"title": "Architecture"}
                    ]
                }],
                "index": ["index.html"],
                "sync": {
                    "on": "click to disable panel synchronisation",
                    "off": "click to enable panel synchronisation"
                }
            })
        );
    }
}
