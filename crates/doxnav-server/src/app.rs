//! Router construction.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/versions", get(handlers::versions::list_versions))
        .route(
            "/api/versions/{label}/navigation",
            get(handlers::versions::get_navigation),
        )
        .route(
            "/api/versions/{label}/locate",
            get(handlers::locate::locate),
        )
        .route(
            "/api/versions/{label}/report",
            get(handlers::versions::get_report),
        )
        .route("/api/diff/{old}/{new}", get(handlers::diff::get_diff))
        .layer(
            ServiceBuilder::new()
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::cache_control_layer()),
        )
        .with_state(state)
}
