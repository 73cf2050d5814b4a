//! Submission draft autosave handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use bounty_models::{DataResponse, SubmissionDraft, SubmissionForm};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Get the caller's draft for a bounty.
pub async fn get_draft(
    State(state): State<AppState>,
    user: AuthUser,
    Path(bounty_id): Path<String>,
) -> ApiResult<Json<SubmissionDraft>> {
    state
        .drafts
        .load(&user.user_id, &bounty_id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("No draft for bounty {}", bounty_id)))
}

/// Create or update the caller's draft for a bounty.
pub async fn save_draft(
    State(state): State<AppState>,
    user: AuthUser,
    Path(bounty_id): Path<String>,
    Json(form): Json<SubmissionForm>,
) -> ApiResult<Json<SubmissionDraft>> {
    let draft = state.drafts.save(&user.user_id, &bounty_id, form)?;
    metrics::record_draft_saved();
    Ok(Json(draft))
}

/// Discard the caller's draft for a bounty.
pub async fn delete_draft(
    State(state): State<AppState>,
    user: AuthUser,
    Path(bounty_id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.drafts.delete(&user.user_id, &bounty_id) {
        return Err(ApiError::not_found(format!("No draft for bounty {}", bounty_id)));
    }

    info!(user_id = %user.user_id, bounty_id = %bounty_id, "Discarded submission draft");
    Ok(StatusCode::NO_CONTENT)
}

/// List the caller's drafts, most recently edited first.
pub async fn list_drafts(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<DataResponse<SubmissionDraft>>> {
    let drafts = state.drafts.list_for_user(&user.user_id)?;
    Ok(Json(DataResponse::new(drafts)))
}
