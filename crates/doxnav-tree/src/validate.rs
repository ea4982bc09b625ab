//! Structural validation of navigation tree data.
//!
//! Checks performed:
//! - every title is non-empty (error)
//! - every href matches [`HrefRules`] (error)
//! - deferred children name a script (error)
//! - every `NAVTREEINDEX` entry links to a node in the tree (error)
//! - `NAVTREEINDEX` is sorted, since the viewer binary-searches it (warning)
//! - sibling titles are unique (warning)
//! - the tree is not empty (warning)

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::href::HrefRules;
use crate::node::{Children, NavTreeData, Position};

/// Issue severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Suspicious but usable.
    Warning,
    /// The viewer would misbehave.
    Error,
}

/// What a validation issue is about.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum IssueKind {
    /// Node title is empty or whitespace.
    EmptyTitle,
    /// Href does not match the configured patterns.
    MalformedHref(String),
    /// Deferred children with an empty script name.
    EmptyScript,
    /// `NAVTREEINDEX` entry with no matching node href.
    IndexEntryMissing(String),
    /// `NAVTREEINDEX` entries are not in ascending order.
    IndexUnsorted,
    /// Two siblings share a title.
    DuplicateSibling(String),
    /// `NAVTREE` has no roots.
    EmptyTree,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => f.write_str("empty title"),
            Self::MalformedHref(href) => write!(f, "malformed href \"{href}\""),
            Self::EmptyScript => f.write_str("deferred children name no script"),
            Self::IndexEntryMissing(href) => {
                write!(f, "index entry \"{href}\" does not appear in the tree")
            }
            Self::IndexUnsorted => f.write_str("index entries are not sorted"),
            Self::DuplicateSibling(title) => write!(f, "duplicate sibling title \"{title}\""),
            Self::EmptyTree => f.write_str("navigation tree is empty"),
        }
    }
}

/// A single validation finding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Severity.
    pub severity: Severity,
    /// What is wrong.
    #[serde(flatten)]
    pub kind: IssueKind,
    /// Offending node, if the issue concerns one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match &self.position {
            Some(position) => write!(f, "{label} at {position}: {}", self.kind),
            None => write!(f, "{label}: {}", self.kind),
        }
    }
}

/// Result of [`validate`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// All findings in tree order, index findings last.
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    /// Error-level issues.
    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    /// Warning-level issues.
    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    /// True if no error-level issue was found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    /// True if no issue at all was found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    fn push(&mut self, severity: Severity, kind: IssueKind, position: Option<Position>) {
        self.issues.push(Issue {
            severity,
            kind,
            position,
        });
    }
}

/// Validate decoded navigation tree data against `rules`.
#[must_use]
pub fn validate(data: &NavTreeData, rules: &HrefRules) -> ValidationReport {
    let mut report = ValidationReport::default();

    if data.tree.is_empty() {
        report.push(Severity::Warning, IssueKind::EmptyTree, None);
    }

    check_siblings(data.tree.roots(), &Position::default(), &mut report);

    let mut hrefs = HashSet::new();
    for entry in data.tree.walk() {
        let node = entry.node;
        if node.title.trim().is_empty() {
            report.push(Severity::Error, IssueKind::EmptyTitle, Some(entry.position.clone()));
        }
        if let Some(href) = &node.href {
            if !rules.matches(href) {
                report.push(
                    Severity::Error,
                    IssueKind::MalformedHref(href.clone()),
                    Some(entry.position.clone()),
                );
            }
            hrefs.insert(href.as_str());
        }
        match &node.children {
            Children::Deferred(script) if script.trim().is_empty() => {
                report.push(Severity::Error, IssueKind::EmptyScript, Some(entry.position.clone()));
            }
            Children::Inline(children) => {
                check_siblings(children, &entry.position, &mut report);
            }
            Children::Leaf | Children::Deferred(_) => {}
        }
    }

    for href in data.index.entries() {
        if !hrefs.contains(href.as_str()) {
            report.push(Severity::Error, IssueKind::IndexEntryMissing(href.clone()), None);
        }
    }
    if !data.index.entries().is_sorted() {
        report.push(Severity::Warning, IssueKind::IndexUnsorted, None);
    }

    if !report.is_clean() {
        tracing::debug!(
            errors = report.errors().count(),
            warnings = report.warnings().count(),
            "Validation found issues"
        );
    }

    report
}

/// Warn about siblings sharing a title, reported at the later sibling.
fn check_siblings(children: &[crate::node::Node], parent: &Position, report: &mut ValidationReport) {
    let mut seen = HashSet::new();
    for (idx, child) in children.iter().enumerate() {
        if !seen.insert(child.title.as_str()) {
            let mut indices = parent.as_slice().to_vec();
            indices.push(idx);
            report.push(
                Severity::Warning,
                IssueKind::DuplicateSibling(child.title.clone()),
                Some(Position::new(indices)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NavIndex, NavTree, Node};
    use pretty_assertions::assert_eq;

    fn data(roots: Vec<Node>, index: &[&str]) -> NavTreeData {
        NavTreeData {
            tree: NavTree::new(roots),
            index: NavIndex::new(index.iter().map(|s| (*s).to_owned()).collect()),
            ..NavTreeData::default()
        }
    }

    fn valid_roots() -> Vec<Node> {
        vec![Node::with_children(
            "EAR",
            Some("index.html"),
            vec![
                Node::deferred("Introduction", Some("index.html"), "index"),
                Node::leaf("Known issues", Some("d1/d21/md_Known_issues.html")),
            ],
        )]
    }

    #[test]
    fn test_valid_data_is_clean() {
        let report = validate(
            &data(valid_roots(), &["d1/d21/md_Known_issues.html"]),
            &HrefRules::default(),
        );

        assert!(report.is_clean(), "unexpected issues: {:?}", report.issues);
        assert!(report.is_valid());
    }

    #[test]
    fn test_empty_title_is_error() {
        let roots = vec![Node::leaf("  ", Some("index.html"))];

        let report = validate(&data(roots, &[]), &HrefRules::default());

        assert_eq!(
            report.issues,
            vec![Issue {
                severity: Severity::Error,
                kind: IssueKind::EmptyTitle,
                position: Some(Position::new(vec![0])),
            }]
        );
        assert!(!report.is_valid());
    }

    #[test]
    fn test_malformed_href_is_error() {
        let roots = vec![Node::leaf("Bad", Some("https://example.com/x.html"))];

        let report = validate(&data(roots, &[]), &HrefRules::default());

        assert_eq!(report.errors().count(), 1);
        assert!(matches!(report.issues[0].kind, IssueKind::MalformedHref(_)));
    }

    #[test]
    fn test_null_href_is_accepted() {
        let roots = vec![Node::with_children(
            "Group",
            None,
            vec![Node::leaf("Page", Some("index.html"))],
        )];

        let report = validate(&data(roots, &[]), &HrefRules::default());

        assert!(report.is_clean());
    }

    #[test]
    fn test_empty_script_is_error() {
        let roots = vec![Node::deferred("Files", Some("files.html"), "")];

        let report = validate(&data(roots, &[]), &HrefRules::default());

        assert_eq!(report.issues[0].kind, IssueKind::EmptyScript);
    }

    #[test]
    fn test_index_entry_missing_from_tree_is_error() {
        let report = validate(
            &data(valid_roots(), &["d9/d99/md_Gone.html"]),
            &HrefRules::default(),
        );

        assert_eq!(
            report.issues,
            vec![Issue {
                severity: Severity::Error,
                kind: IssueKind::IndexEntryMissing("d9/d99/md_Gone.html".to_owned()),
                position: None,
            }]
        );
    }

    #[test]
    fn test_unsorted_index_is_warning() {
        let report = validate(
            &data(valid_roots(), &["index.html", "d1/d21/md_Known_issues.html"]),
            &HrefRules::default(),
        );

        assert!(report.is_valid());
        assert_eq!(report.warnings().count(), 1);
        assert_eq!(report.issues[0].kind, IssueKind::IndexUnsorted);
    }

    #[test]
    fn test_duplicate_sibling_is_warning_at_later_sibling() {
        let roots = vec![Node::with_children(
            "Architecture",
            Some("df/dde/md_Architecture.html"),
            vec![
                Node::leaf("Configuration", Some("df/dde/md_Architecture.html#autotoc_md63")),
                Node::leaf("Configuration", Some("df/dde/md_Architecture.html#autotoc_md66")),
            ],
        )];

        let report = validate(&data(roots, &[]), &HrefRules::default());

        assert_eq!(report.warnings().count(), 1);
        assert_eq!(report.issues[0].position, Some(Position::new(vec![0, 1])));
    }

    #[test]
    fn test_same_title_under_different_parents_is_fine() {
        let roots = vec![
            Node::with_children("A", None, vec![Node::leaf("Configuration", None)]),
            Node::with_children("B", None, vec![Node::leaf("Configuration", None)]),
        ];

        let report = validate(&data(roots, &[]), &HrefRules::default());

        assert!(report.is_clean());
    }

    #[test]
    fn test_empty_tree_is_warning() {
        let report = validate(&NavTreeData::default(), &HrefRules::default());

        assert_eq!(report.issues[0].kind, IssueKind::EmptyTree);
        assert!(report.is_valid());
    }

    #[test]
    fn test_issue_display() {
        let issue = Issue {
            severity: Severity::Error,
            kind: IssueKind::MalformedHref("x".to_owned()),
            position: Some(Position::new(vec![0, 2])),
        };

        assert_eq!(issue.to_string(), "error at [0,2]: malformed href \"x\"");
    }

    #[test]
    fn test_issue_serialization() {
        let issue = Issue {
            severity: Severity::Warning,
            kind: IssueKind::DuplicateSibling("Examples".to_owned()),
            position: Some(Position::new(vec![1])),
        };

        let json = serde_json::to_value(&issue).unwrap();

        assert_eq!(json["severity"], "warning");
        assert_eq!(json["kind"], "duplicate_sibling");
        assert_eq!(json["value"], "Examples");
        assert_eq!(json["position"], serde_json::json!([1]));
    }
}
