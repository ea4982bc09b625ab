//! Version listing and per-version endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use doxnav_render::ViewerTree;
use doxnav_site::VersionSummary;
use doxnav_tree::ValidationReport;

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /api/versions.
pub(crate) async fn list_versions(State(state): State<Arc<AppState>>) -> Json<Vec<VersionSummary>> {
    Json(state.library.versions())
}

/// Handle GET /api/versions/{label}/navigation.
pub(crate) async fn get_navigation(
    State(state): State<Arc<AppState>>,
    Path(label): Path<String>,
) -> Result<Json<ViewerTree>, ServerError> {
    let version = state.library.version(&label)?;
    Ok(Json(ViewerTree::from(&version.data)))
}

/// Handle GET /api/versions/{label}/report.
pub(crate) async fn get_report(
    State(state): State<Arc<AppState>>,
    Path(label): Path<String>,
) -> Result<Json<ValidationReport>, ServerError> {
    let version = state.library.version(&label)?;
    Ok(Json(version.report.clone()))
}
