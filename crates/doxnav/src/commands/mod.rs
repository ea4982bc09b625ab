//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod diff;
pub(crate) mod fmt;
pub(crate) mod index;
pub(crate) mod locate;
pub(crate) mod serve;
pub(crate) mod show;
pub(crate) mod versions;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use doxnav_config::{CliSettings, Config};
use doxnav_server::server_config_from_config;
use doxnav_site::Library;
use doxnav_storage::FsStorage;

use crate::error::CliError;

pub(crate) use check::CheckArgs;
pub(crate) use diff::DiffArgs;
pub(crate) use fmt::FmtArgs;
pub(crate) use index::IndexArgs;
pub(crate) use locate::LocateArgs;
pub(crate) use serve::ServeArgs;
pub(crate) use show::ShowArgs;
pub(crate) use versions::VersionsArgs;

/// Options shared by every command that reads documentation builds.
#[derive(Args)]
pub(crate) struct ConfigArgs {
    /// Path to configuration file (default: auto-discover doxnav.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation root (overrides config).
    #[arg(short, long, env = "DOXNAV_ROOT")]
    root: Option<PathBuf>,

    /// Load deferred children from their scripts (overrides config).
    #[arg(long)]
    expand_deferred: bool,
}

impl ConfigArgs {
    /// Load configuration with these overrides plus command-specific ones.
    pub(crate) fn load(&self, settings: CliSettings) -> Result<Config, CliError> {
        let settings = CliSettings {
            root: self.root.clone(),
            expand_deferred: self.expand_deferred.then_some(true),
            ..settings
        };
        Ok(Config::load(self.config.as_deref(), Some(&settings))?)
    }
}

/// Open the builds under the configured documentation root.
pub(crate) fn open_library(config: &Config) -> Result<Library, CliError> {
    let options = server_config_from_config(config)?.library;
    let storage = Arc::new(FsStorage::new(config.docs_resolved.root.clone()));
    Ok(Library::new(storage, options))
}
