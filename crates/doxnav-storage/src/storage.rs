//! Storage trait and error types.

use std::path::{Component, Path, PathBuf};

/// File name of the navigation tree script in every build.
pub const NAVTREE_FILE: &str = "navtreedata.js";

/// Label of a build found directly at the documentation root.
pub const DEFAULT_LABEL: &str = "default";

/// A documentation build discovered by [`Storage::scan`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionRef {
    /// Version label (e.g., "ear-4.3.1").
    pub label: String,
    /// Build directory relative to the documentation root.
    pub path: PathBuf,
}

impl VersionRef {
    /// Create a reference for a build directory, deriving its label.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            label: label_for_dir(&path),
            path,
        }
    }
}

/// Derive a version label from a build directory relative to the root.
///
/// Components are joined with `/`; a trailing `html` component is
/// dropped, so `ear-4.3.1/html` becomes `ear-4.3.1`. The root itself
/// (or a bare `html` directory) is labelled [`DEFAULT_LABEL`].
#[must_use]
pub fn label_for_dir(dir: &Path) -> String {
    let mut parts: Vec<String> = dir
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.last().is_some_and(|last| last == "html") {
        parts.pop();
    }
    if parts.is_empty() {
        DEFAULT_LABEL.to_owned()
    } else {
        parts.join("/")
    }
}

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Invalid path or script name.
    InvalidPath,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            _ => StorageErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // "[Backend] Kind: source (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::Other => "Error",
        };
        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Access to documentation builds.
pub trait Storage: Send + Sync {
    /// Discover every build, sorted by label.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the documentation root can't be read.
    fn scan(&self) -> Result<Vec<VersionRef>, StorageError>;

    /// Read the `navtreedata.js` of a build.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the script doesn't exist or can't be read.
    fn read(&self, version: &VersionRef) -> Result<String, StorageError>;

    /// Read a sibling script (`<name>.js`) of a build, such as a deferred
    /// child script or an index chunk.
    ///
    /// Returns `Ok(None)` when the script doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] with [`StorageErrorKind::InvalidPath`] if
    /// `name` is not a plain script name, or on read failure.
    fn read_script(&self, version: &VersionRef, name: &str) -> Result<Option<String>, StorageError>;

    /// Modification time of the build's `navtreedata.js` as seconds since
    /// the Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the script doesn't exist.
    fn mtime(&self, version: &VersionRef) -> Result<f64, StorageError>;

    /// Modification time of a sibling script (`<name>.js`), or `Ok(None)`
    /// when the script doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] with [`StorageErrorKind::InvalidPath`] if
    /// `name` is not a plain script name, or on metadata failure.
    fn script_mtime(&self, version: &VersionRef, name: &str) -> Result<Option<f64>, StorageError>;
}

/// Check that a script name refers to a file in the build directory.
pub(crate) fn validate_script_name(name: &str) -> Result<(), StorageError> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::new(StorageErrorKind::InvalidPath).with_path(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_label_for_nested_html_dir() {
        assert_eq!(label_for_dir(Path::new("ear-4.3.1/html")), "ear-4.3.1");
    }

    #[test]
    fn test_label_for_plain_dir() {
        assert_eq!(label_for_dir(Path::new("ear-5.0")), "ear-5.0");
        assert_eq!(label_for_dir(Path::new("releases/ear-5.0")), "releases/ear-5.0");
    }

    #[test]
    fn test_label_for_root() {
        assert_eq!(label_for_dir(Path::new("")), DEFAULT_LABEL);
        assert_eq!(label_for_dir(Path::new("html")), DEFAULT_LABEL);
    }

    #[test]
    fn test_version_ref_new() {
        let version = VersionRef::new("ear-4.3.1/html");

        assert_eq!(version.label, "ear-4.3.1");
        assert_eq!(version.path, PathBuf::from("ear-4.3.1/html"));
    }

    #[test]
    fn test_validate_script_name() {
        assert!(validate_script_name("index").is_ok());
        assert!(validate_script_name("navtreeindex0").is_ok());
        assert!(validate_script_name("md_User_guide").is_ok());

        for bad in ["", "../secret", "d6/d86", ".hidden"] {
            let err = validate_script_name(bad).unwrap_err();
            assert_eq!(err.kind, StorageErrorKind::InvalidPath, "{bad}");
        }
    }

    #[test]
    fn test_storage_error_io_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = StorageError::io(io_err, Some(PathBuf::from("/docs/navtreedata.js")));

        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.path.as_deref(), Some(Path::new("/docs/navtreedata.js")));
    }

    #[test]
    fn test_storage_error_io_permission_denied() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = StorageError::io(io_err, None);

        assert_eq!(err.kind, StorageErrorKind::PermissionDenied);
    }

    #[test]
    fn test_storage_error_display_simple() {
        assert_eq!(StorageError::new(StorageErrorKind::NotFound).to_string(), "Not found");
    }

    #[test]
    fn test_storage_error_display_full() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = StorageError::new(StorageErrorKind::NotFound)
            .with_backend("Fs")
            .with_path("/docs/ear-5.0/navtreedata.js")
            .with_source(io_err);

        assert_eq!(
            err.to_string(),
            "[Fs] Not found: file not found (path: /docs/ear-5.0/navtreedata.js)"
        );
    }

    #[test]
    fn test_storage_error_source() {
        let io_err = std::io::Error::other("boom");
        let err = StorageError::new(StorageErrorKind::Other).with_source(io_err);

        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_storage_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StorageError>();
    }
}
