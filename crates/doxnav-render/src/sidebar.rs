//! Static HTML sidebar.

use std::fmt::Write as _;

use doxnav_tree::{Children, NavTree, Node};

/// Sidebar rendering options.
#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    /// Prefix added to every href (e.g., "/docs/ear-5.0/").
    pub base_url: String,
    /// Href of the current page; its entry gets `aria-current="page"` and
    /// its ancestors are marked open.
    pub active: Option<String>,
}

/// Render `tree` as nested lists inside a `<nav>` element.
///
/// Entries without an href render as plain text. Deferred children
/// render as an empty list carrying the script name in `data-script`.
#[must_use]
pub fn render_sidebar(tree: &NavTree, options: &RenderOptions) -> String {
    let active_path = options
        .active
        .as_deref()
        .and_then(|href| tree.find_href(href))
        .map(|position| position.as_slice().to_vec())
        .unwrap_or_default();

    let mut html = String::new();
    html.push_str("<nav class=\"doxnav-sidebar\">\n<ul>\n");
    render_items(&mut html, tree.roots(), options, &active_path, 0);
    html.push_str("</ul>\n</nav>\n");
    html
}

/// Render one level. `active_path` holds the child indices of the active
/// entry, or is empty once rendering has left the active branch.
fn render_items(
    html: &mut String,
    nodes: &[Node],
    options: &RenderOptions,
    active_path: &[usize],
    depth: usize,
) {
    for (idx, node) in nodes.iter().enumerate() {
        let on_path = active_path.get(depth) == Some(&idx);
        let is_active = on_path && active_path.len() == depth + 1;
        let is_open = on_path && !is_active;

        if is_open {
            html.push_str("<li class=\"open\">\n");
        } else {
            html.push_str("<li>\n");
        }

        match &node.href {
            Some(href) => {
                let current = if is_active {
                    " aria-current=\"page\""
                } else {
                    ""
                };
                let _ = writeln!(
                    html,
                    "<a href=\"{}{}\"{current}>{}</a>",
                    escape(&options.base_url),
                    escape(href),
                    escape(&node.title),
                );
            }
            None => {
                let _ = writeln!(html, "<span>{}</span>", escape(&node.title));
            }
        }

        match &node.children {
            Children::Leaf => {}
            Children::Inline(children) if children.is_empty() => {}
            Children::Inline(children) => {
                html.push_str("<ul>\n");
                let child_path = if on_path { active_path } else { &[] };
                render_items(html, children, options, child_path, depth + 1);
                html.push_str("</ul>\n");
            }
            Children::Deferred(script) => {
                let _ = writeln!(html, "<ul data-script=\"{}\"></ul>", escape(script));
            }
        }

        html.push_str("</li>\n");
    }
}

/// Escape text for HTML content and attribute values.
#[must_use]
pub fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
