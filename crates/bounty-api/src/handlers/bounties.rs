//! Bounty application and submission listings.

use axum::extract::{Path, State};
use axum::Json;

use bounty_models::{Application, DataResponse, Submission};

use crate::state::AppState;

/// List applications for a bounty. Unknown ids yield an empty list.
pub async fn list_applications(
    State(state): State<AppState>,
    Path(bounty_id): Path<String>,
) -> Json<DataResponse<Application>> {
    let applications = state.store.get_applications_by_bounty(&bounty_id).await;
    Json(DataResponse::new(applications))
}

/// List submissions for a bounty. Unknown ids yield an empty list.
pub async fn list_submissions(
    State(state): State<AppState>,
    Path(bounty_id): Path<String>,
) -> Json<DataResponse<Submission>> {
    let submissions = state.store.get_submissions_by_bounty(&bounty_id).await;
    Json(DataResponse::new(submissions))
}
