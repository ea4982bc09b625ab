//! Version comparison endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use doxnav_tree::Change;

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /api/diff/{old}/{new}.
pub(crate) async fn get_diff(
    State(state): State<Arc<AppState>>,
    Path((old, new)): Path<(String, String)>,
) -> Result<Json<Vec<Change>>, ServerError> {
    Ok(Json(state.library.diff(&old, &new)?))
}
