//! Href parsing and pattern rules.
//!
//! Doxygen builds with `CREATE_SUBDIRS` place pages in hashed directories
//! (`d6/d86/md_User_guide.html`). Top-level pages such as `index.html`
//! stay at the documentation root. [`HrefRules`] accepts both forms by
//! default; both patterns can be overridden from configuration.

use std::sync::LazyLock;

use regex::Regex;

/// Default pattern for pages in hashed subdirectories.
pub const DEFAULT_HASHED_PATTERN: &str =
    r"^d[0-9a-f]/d[0-9a-f]{2}/[A-Za-z0-9_][A-Za-z0-9_.\-]*\.html(?:#[^\s#]+)?$";

/// Default pattern for pages at the documentation root.
pub const DEFAULT_ROOT_PAGE_PATTERN: &str = r"^[A-Za-z0-9_][A-Za-z0-9_.\-]*\.html(?:#[^\s#]+)?$";

static DEFAULT_RULES: LazyLock<HrefRules> = LazyLock::new(|| {
    HrefRules::new(DEFAULT_HASHED_PATTERN, DEFAULT_ROOT_PAGE_PATTERN)
        .expect("invalid default href patterns")
});

/// Href split into page and fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Href<'a> {
    /// Page path (everything before `#`).
    pub page: &'a str,
    /// Anchor after `#`, if any.
    pub fragment: Option<&'a str>,
}

impl<'a> Href<'a> {
    /// Split an href at its first `#`.
    #[must_use]
    pub fn parse(href: &'a str) -> Self {
        match href.split_once('#') {
            Some((page, fragment)) => Self {
                page,
                fragment: Some(fragment),
            },
            None => Self {
                page: href,
                fragment: None,
            },
        }
    }
}

/// Error building [`HrefRules`] from user-supplied patterns.
#[derive(Debug, thiserror::Error)]
#[error("invalid {field} pattern: {source}")]
pub struct HrefRulesError {
    /// Which pattern failed (`hashed` or `root page`).
    pub field: &'static str,
    /// Regex compilation error.
    #[source]
    pub source: regex::Error,
}

/// Patterns an href must match to be considered well formed.
#[derive(Clone, Debug)]
pub struct HrefRules {
    hashed: Regex,
    root_page: Regex,
}

impl HrefRules {
    /// Compile rules from the hashed-directory and root-page patterns.
    pub fn new(hashed: &str, root_page: &str) -> Result<Self, HrefRulesError> {
        let hashed = Regex::new(hashed).map_err(|source| HrefRulesError {
            field: "hashed",
            source,
        })?;
        let root_page = Regex::new(root_page).map_err(|source| HrefRulesError {
            field: "root page",
            source,
        })?;
        Ok(Self { hashed, root_page })
    }

    /// Check whether an href matches either pattern.
    #[must_use]
    pub fn matches(&self, href: &str) -> bool {
        self.hashed.is_match(href) || self.root_page.is_match(href)
    }

    /// Check whether an href lives in a hashed subdirectory.
    #[must_use]
    pub fn is_hashed(&self, href: &str) -> bool {
        self.hashed.is_match(href)
    }
}

impl Default for HrefRules {
    fn default() -> Self {
        DEFAULT_RULES.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_only() {
        let href = Href::parse("d6/d86/md_User_guide.html");

        assert_eq!(href.page, "d6/d86/md_User_guide.html");
        assert_eq!(href.fragment, None);
    }

    #[test]
    fn test_parse_with_fragment() {
        let href = Href::parse("d6/d86/md_User_guide.html#autotoc_md2");

        assert_eq!(href.page, "d6/d86/md_User_guide.html");
        assert_eq!(href.fragment, Some("autotoc_md2"));
    }

    #[test]
    fn test_default_rules_accept_hashed_pages() {
        let rules = HrefRules::default();

        assert!(rules.matches("d6/d86/md_User_guide.html"));
        assert!(rules.matches("df/dde/md_Architecture.html#ear-node-manager"));
        assert!(rules.matches("d7/d5f/md_EAR_environment_variables.html#ear_max_imcfreq-and-ear_min_imcfreq"));
        assert!(rules.is_hashed("dc/d09/md_EAR_commands.html"));
    }

    #[test]
    fn test_default_rules_accept_root_pages() {
        let rules = HrefRules::default();

        assert!(rules.matches("index.html"));
        assert!(!rules.is_hashed("index.html"));
    }

    #[test]
    fn test_default_rules_reject_malformed() {
        let rules = HrefRules::default();

        assert!(!rules.matches(""));
        assert!(!rules.matches("https://example.com/page.html"));
        assert!(!rules.matches("d6/d86/md_User_guide.htm"));
        assert!(!rules.matches("zz/d86/page.html"));
        assert!(!rules.matches("d6/d86/page.html#"));
        assert!(!rules.matches("d6/d86/page.html#a#b"));
        assert!(!rules.matches("../secret.html"));
    }

    #[test]
    fn test_custom_rules() {
        let rules = HrefRules::new(r"^pages/[a-z]+\.html$", r"^index\.html$").unwrap();

        assert!(rules.matches("pages/intro.html"));
        assert!(rules.matches("index.html"));
        assert!(!rules.matches("d6/d86/md_User_guide.html"));
    }

    #[test]
    fn test_invalid_pattern_reports_field() {
        let err = HrefRules::new("(", DEFAULT_ROOT_PAGE_PATTERN).unwrap_err();

        assert_eq!(err.field, "hashed");
        assert!(err.to_string().contains("invalid hashed pattern"));
    }
}
