//! Prometheus metrics for the API server.

use std::sync::LazyLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use regex_lite::Regex;

/// Install the Prometheus recorder and return the render handle.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "bounty_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "bounty_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "bounty_http_requests_in_flight";

    // Domain metrics
    pub const DRAFTS_SAVED_TOTAL: &str = "bounty_drafts_saved_total";
    pub const TERMS_ACCEPTED_TOTAL: &str = "bounty_terms_accepted_total";
    pub const SIGNIN_REDIRECTS_TOTAL: &str = "bounty_signin_redirects_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "bounty_rate_limit_hits_total";
}

static BOUNTY_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/bounties/[^/]+").unwrap());
static JURISDICTION_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/jurisdictions/[^/]+").unwrap());

/// Label used for any path that is not a served route.
const UNMATCHED_PATH: &str = "other";

const KNOWN_PATHS: [&str; 16] = [
    "/health",
    "/healthz",
    "/metrics",
    "/api/bounties/:id/applications",
    "/api/bounties/:id/submissions",
    "/api/bounties/:id/draft",
    "/api/drafts",
    "/api/transparency/payouts",
    "/api/transparency/stats",
    "/api/compliance/jurisdictions",
    "/api/compliance/jurisdictions/:code",
    "/api/auth/providers",
    "/api/auth/signin/github",
    "/api/terms/current",
    "/api/terms/status",
    "/api/terms/accept",
];

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

pub fn record_draft_saved() {
    counter!(names::DRAFTS_SAVED_TOTAL).increment(1);
}

pub fn record_terms_accepted(version: &str) {
    let labels = [("version", version.to_string())];
    counter!(names::TERMS_ACCEPTED_TOTAL, &labels).increment(1);
}

pub fn record_signin_redirect(provider: &str) {
    let labels = [("provider", provider.to_string())];
    counter!(names::SIGNIN_REDIRECTS_TOTAL, &labels).increment(1);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", sanitize_path(endpoint))];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Collapse ids in a path so label cardinality stays bounded.
fn sanitize_path(path: &str) -> String {
    let path = BOUNTY_SEGMENT.replace_all(path, "/bounties/:id");
    let path = JURISDICTION_SEGMENT.replace_all(&path, "/jurisdictions/:code");
    if KNOWN_PATHS.iter().any(|known| *known == path) {
        path.into_owned()
    } else {
        UNMATCHED_PATH.to_string()
    }
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(
            sanitize_path("/api/bounties/b-123/applications"),
            "/api/bounties/:id/applications"
        );
        assert_eq!(
            sanitize_path("/api/compliance/jurisdictions/UA-43"),
            "/api/compliance/jurisdictions/:code"
        );
        assert_eq!(sanitize_path("/api/transparency/stats"), "/api/transparency/stats");
    }

    #[test]
    fn test_unmatched_paths_share_one_label() {
        assert_eq!(sanitize_path("/wp-login.php"), "other");
        assert_eq!(sanitize_path("/api/bounties/b1/secret/deep"), "other");
        assert_eq!(sanitize_path("/api/unknown-1"), sanitize_path("/api/unknown-2"));
        assert_eq!(sanitize_path("/health"), "/health");
    }
}
