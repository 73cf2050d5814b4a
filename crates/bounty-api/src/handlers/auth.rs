//! Sign-in provider discovery and redirects.

use axum::extract::State;
use axum::response::Redirect;
use axum::Json;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::metrics;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub signin_url: String,
    pub callback_url: String,
}

#[derive(Serialize)]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderInfo>,
}

/// Configured social sign-in providers.
pub async fn providers(State(state): State<AppState>) -> Json<ProvidersResponse> {
    let providers = state
        .auth
        .github
        .as_ref()
        .map(|_| ProviderInfo {
            id: "github",
            name: "GitHub",
            signin_url: "/api/auth/signin/github".to_string(),
            callback_url: state.auth.callback_url("github"),
        })
        .into_iter()
        .collect();

    Json(ProvidersResponse { providers })
}

/// Redirect to GitHub's authorize page.
pub async fn signin_github(State(state): State<AppState>) -> ApiResult<Redirect> {
    let sign_in_state = Uuid::new_v4().simple().to_string();
    let url = state.auth.github_authorize_url(&sign_in_state)?;

    metrics::record_signin_redirect("github");
    info!("Redirecting to GitHub sign-in");

    Ok(Redirect::temporary(url.as_str()))
}
