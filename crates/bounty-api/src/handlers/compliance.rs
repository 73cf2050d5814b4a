//! Restricted jurisdiction lookups.

use axum::extract::{Path, State};
use axum::Json;

use bounty_models::{DataResponse, RestrictedJurisdiction};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn list_jurisdictions(
    State(state): State<AppState>,
) -> Json<DataResponse<RestrictedJurisdiction>> {
    Json(DataResponse::new(state.jurisdictions.all().to_vec()))
}

/// Look up one jurisdiction by code (`KP`, `UA-43`), case-insensitively.
pub async fn get_jurisdiction(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<RestrictedJurisdiction>> {
    state
        .jurisdictions
        .get(&code)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Jurisdiction {} is not restricted", code)))
}
