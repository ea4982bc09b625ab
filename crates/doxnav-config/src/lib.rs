//! Configuration management for doxnav.
//!
//! Parses `doxnav.toml` with serde and discovers it in the current
//! directory or its parents. CLI settings are applied during load via
//! [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String values support `${VAR}` (error if unset) and `${VAR:-default}`.
//!
//! Expanded fields:
//! - `docs.root`
//! - `validate.href_pattern`
//! - `validate.root_page_pattern`
//! - `render.base_url`
//! - `server.host`

mod expand;

use std::path::{Path, PathBuf};

use doxnav_tree::{DEFAULT_CHUNK_SIZE, DEFAULT_HASHED_PATTERN, DEFAULT_ROOT_PAGE_PATTERN, HrefRules};
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "doxnav.toml";

/// Default documentation root, relative to the config directory.
pub const DEFAULT_DOCS_ROOT: &str = "doc/html";

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override documentation root.
    pub root: Option<PathBuf>,
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override sidebar link prefix.
    pub base_url: Option<String>,
    /// Override deferred children expansion.
    pub expand_deferred: Option<bool>,
    /// Override warning strictness.
    pub warnings_as_errors: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Documentation location (path as written in TOML).
    docs: DocsConfigRaw,
    /// Validation configuration.
    pub validate: ValidateConfig,
    /// Index chunking configuration.
    pub index: IndexConfig,
    /// HTML rendering configuration.
    pub render: RenderConfig,
    /// Server configuration.
    pub server: ServerConfig,
    /// Version loading configuration.
    pub library: LibraryConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    root: Option<String>,
}

/// Resolved documentation configuration.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Directory scanned for `navtreedata.js` files.
    pub root: PathBuf,
}

/// Validation configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ValidateConfig {
    /// Pattern for hrefs in hashed subdirectories.
    pub href_pattern: Option<String>,
    /// Pattern for hrefs of top-level pages.
    pub root_page_pattern: Option<String>,
    /// Treat warnings as errors in `check`.
    pub warnings_as_errors: bool,
}

impl ValidateConfig {
    /// Compile the configured href rules.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a pattern is not a valid regex.
    pub fn href_rules(&self) -> Result<HrefRules, ConfigError> {
        HrefRules::new(
            self.href_pattern.as_deref().unwrap_or(DEFAULT_HASHED_PATTERN),
            self.root_page_pattern
                .as_deref()
                .unwrap_or(DEFAULT_ROOT_PAGE_PATTERN),
        )
        .map_err(|e| ConfigError::Validation(format!("validate: {e}")))
    }
}

/// Index chunking configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Entries per `navtreeindexN.js` chunk.
    pub chunk_size: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// HTML rendering configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Prefix added to every sidebar link.
    pub base_url: String,
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7980,
        }
    }
}

/// Version loading configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Replace deferred children with the contents of their scripts.
    pub expand_deferred: bool,
    /// Minimum time between storage checks for changed builds.
    pub check_interval_ms: u64,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            expand_deferred: false,
            check_interval_ms: 1000,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`server.host`").
        field: String,
        /// Error message (e.g., "${`DOCS_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise,
    /// searches for `doxnav.toml` in the current directory and parents,
    /// falling back to defaults relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing
    /// fails, or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(root) = &settings.root {
            self.docs_resolved.root.clone_from(root);
        }
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(base_url) = &settings.base_url {
            self.render.base_url.clone_from(base_url);
        }
        if let Some(expand_deferred) = settings.expand_deferred {
            self.library.expand_deferred = expand_deferred;
        }
        if let Some(warnings_as_errors) = settings.warnings_as_errors {
            self.validate.warnings_as_errors = warnings_as_errors;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            docs: DocsConfigRaw::default(),
            validate: ValidateConfig::default(),
            index: IndexConfig::default(),
            render: RenderConfig::default(),
            server: ServerConfig::default(),
            library: LibraryConfig::default(),
            docs_resolved: DocsConfig {
                root: base.join(DEFAULT_DOCS_ROOT),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }
        if self.index.chunk_size == 0 {
            return Err(ConfigError::Validation(
                "index.chunk_size must be greater than 0".to_owned(),
            ));
        }
        self.validate.href_rules()?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref root) = self.docs.root {
            self.docs.root = Some(expand::expand_env(root, "docs.root")?);
        }
        if let Some(ref pattern) = self.validate.href_pattern {
            self.validate.href_pattern = Some(expand::expand_env(pattern, "validate.href_pattern")?);
        }
        if let Some(ref pattern) = self.validate.root_page_pattern {
            self.validate.root_page_pattern =
                Some(expand::expand_env(pattern, "validate.root_page_pattern")?);
        }
        self.render.base_url = expand::expand_env(&self.render.base_url, "render.base_url")?;
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        Ok(())
    }

    /// Resolve the docs root against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.docs_resolved = DocsConfig {
            root: config_dir.join(self.docs.root.as_deref().unwrap_or(DEFAULT_DOCS_ROOT)),
        };
    }
}
