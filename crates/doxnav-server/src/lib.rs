//! HTTP server for doxnav.
//!
//! Serves a read-only JSON API over every documentation build found
//! under the documentation root:
//!
//! - `GET /api/versions`: loaded versions with node and issue counts
//! - `GET /api/versions/{label}/navigation`: tree shaped for viewers
//! - `GET /api/versions/{label}/locate?href=...`: deep-link resolution
//! - `GET /api/versions/{label}/report`: validation issues
//! - `GET /api/diff/{old}/{new}`: table-of-contents changes
//!
//! Builds are reloaded on the next request after their
//! `navtreedata.js` changes.
//!
//! # Quick Start
//!
//! ```ignore
//! use doxnav_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     run_server(ServerConfig::default()).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use doxnav_config::{Config, ConfigError};
use doxnav_site::{Library, LibraryOptions};
use doxnav_storage::FsStorage;
use state::AppState;

pub use error::ServerError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Documentation root scanned for builds.
    pub docs_root: PathBuf,
    /// Library loading options.
    pub library: LibraryOptions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7980,
            docs_root: PathBuf::from(doxnav_config::DEFAULT_DOCS_ROOT),
            library: LibraryOptions {
                check_interval: Duration::from_secs(1),
                ..LibraryOptions::default()
            },
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid or the listener fails.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let storage = Arc::new(FsStorage::new(config.docs_root.clone()));
    let library = Arc::new(Library::new(storage, config.library));

    let loaded = library.reload_if_needed();
    tracing::info!(
        root = %config.docs_root.display(),
        versions = loaded.versions().len(),
        failures = loaded.failures().len(),
        "Loaded documentation builds"
    );

    let app = app::create_router(Arc::new(AppState { library }));

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from a loaded [`Config`].
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] if the configured href patterns do
/// not compile.
pub fn server_config_from_config(config: &Config) -> Result<ServerConfig, ConfigError> {
    Ok(ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        docs_root: config.docs_resolved.root.clone(),
        library: LibraryOptions {
            rules: config.validate.href_rules()?,
            chunk_size: config.index.chunk_size,
            expand_deferred: config.library.expand_deferred,
            check_interval: Duration::from_millis(config.library.check_interval_ms),
        },
    })
}
