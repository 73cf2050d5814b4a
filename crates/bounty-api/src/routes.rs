//! API routes.

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::auth::{providers, signin_github};
use crate::handlers::bounties::{list_applications, list_submissions};
use crate::handlers::compliance::{get_jurisdiction, list_jurisdictions};
use crate::handlers::drafts::{delete_draft, get_draft, list_drafts, save_draft};
use crate::handlers::health;
use crate::handlers::terms::{accept_terms, current_terms, terms_status};
use crate::handlers::transparency::{list_payouts, stats};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, rate_limit_middleware, request_id, request_logging, security_headers, RateLimiterCache};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let bounty_routes = Router::new()
        .route("/bounties/:bounty_id/applications", get(list_applications))
        .route("/bounties/:bounty_id/submissions", get(list_submissions))
        // Draft autosave
        .route(
            "/bounties/:bounty_id/draft",
            get(get_draft).put(save_draft).delete(delete_draft),
        )
        .route("/drafts", get(list_drafts));

    let transparency_routes = Router::new()
        .route("/transparency/payouts", get(list_payouts))
        .route("/transparency/stats", get(stats));

    let compliance_routes = Router::new()
        .route("/compliance/jurisdictions", get(list_jurisdictions))
        .route("/compliance/jurisdictions/:code", get(get_jurisdiction));

    let terms_routes = Router::new()
        .route("/terms/current", get(current_terms))
        .route("/terms/status", get(terms_status))
        .route("/terms/accept", post(accept_terms));

    let rate_limiter = Arc::new(RateLimiterCache::new(
        state.config.rate_limit_rps,
        state.config.rate_limit_burst,
    ));

    // Sign-in redirects get a tighter budget than reads
    let signin_rate_limiter = Arc::new(RateLimiterCache::new(2, 5));

    let auth_routes = Router::new()
        .route("/auth/providers", get(providers))
        .merge(
            Router::new()
                .route("/auth/signin/github", get(signin_github))
                .layer(middleware::from_fn_with_state(signin_rate_limiter, rate_limit_middleware)),
        );

    let api_routes = Router::new()
        .merge(bounty_routes)
        .merge(transparency_routes)
        .merge(compliance_routes)
        .merge(terms_routes)
        .merge(auth_routes)
        .layer(middleware::from_fn_with_state(rate_limiter, rate_limit_middleware));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health));

    let metrics_routes = match metrics_handle {
        Some(handle) => Router::new().route("/metrics", get(move || async move { handle.render() })),
        None => Router::new(),
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
