//! Deep-link resolution endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use doxnav_site::Location;
use serde::Deserialize;

use crate::error::ServerError;
use crate::state::AppState;

/// Query parameters for GET /api/versions/{label}/locate.
#[derive(Deserialize)]
pub(crate) struct LocateQuery {
    href: String,
}

/// Handle GET /api/versions/{label}/locate.
pub(crate) async fn locate(
    State(state): State<Arc<AppState>>,
    Path(label): Path<String>,
    Query(query): Query<LocateQuery>,
) -> Result<Json<Location>, ServerError> {
    let location = state.library.locate(&label, &query.href)?;
    tracing::debug!(version = %label, href = %query.href, position = %location.position, "Located href");
    Ok(Json(location))
}
