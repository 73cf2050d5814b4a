//! Terms of service versions and acceptance.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use bounty_models::{TermsAcceptance, TermsVersion, UserTermsStatus};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::middleware::client_ip;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptTermsRequest {
    pub terms_version_id: String,
}

/// The terms version currently in force.
pub async fn current_terms(State(state): State<AppState>) -> ApiResult<Json<TermsVersion>> {
    state
        .terms
        .current()
        .await
        .map(Json)
        .ok_or_else(|| ApiError::not_found("No terms version has been published"))
}

/// Whether the caller has accepted the current terms.
pub async fn terms_status(State(state): State<AppState>, user: AuthUser) -> Json<UserTermsStatus> {
    Json(state.terms.status_for(&user.user_id).await)
}

/// Record the caller's acceptance of a terms version.
pub async fn accept_terms(
    State(state): State<AppState>,
    user: AuthUser,
    connect: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(request): Json<AcceptTermsRequest>,
) -> ApiResult<Json<TermsAcceptance>> {
    if request.terms_version_id.trim().is_empty() {
        return Err(ApiError::bad_request("termsVersionId is required"));
    }

    let ip = client_ip(&headers, connect.map(|ci| ci.0)).map(|ip| ip.to_string());

    let acceptance = state
        .terms
        .accept(&user.user_id, &request.terms_version_id, ip)
        .await?;

    metrics::record_terms_accepted(&acceptance.version);
    info!(
        user_id = %user.user_id,
        version = %acceptance.version,
        "Terms accepted"
    );

    Ok(Json(acceptance))
}
