//! Application state.

use std::sync::Arc;

use doxnav_site::Library;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Loaded documentation builds.
    pub(crate) library: Arc<Library>,
}
