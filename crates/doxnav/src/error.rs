//! CLI error types.

use doxnav_config::ConfigError;
use doxnav_script::ScriptError;
use doxnav_site::LibraryError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Script(#[from] ScriptError),

    #[error("{0}")]
    Library(#[from] LibraryError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Validation(String),
}
