//! Public transparency reporting.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use bounty_models::{Payout, TransparencyStats, DEFAULT_PAYOUT_LIMIT};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PayoutsQuery {
    /// Kept as text so a non-numeric value falls back to the default.
    pub limit: Option<String>,
}

/// Parse `limit`, defaulting when absent or not a non-negative integer.
pub fn parse_limit(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
        .unwrap_or(DEFAULT_PAYOUT_LIMIT)
}

/// Recent payouts, newest first, at most `limit`.
pub async fn list_payouts(
    State(state): State<AppState>,
    Query(query): Query<PayoutsQuery>,
) -> Json<Vec<Payout>> {
    let limit = parse_limit(query.limit.as_deref());
    Json(state.payouts.list_recent(limit).await)
}

/// Aggregate platform statistics.
pub async fn stats() -> Json<TransparencyStats> {
    Json(TransparencyStats::zero())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit(None), 10);
        assert_eq!(parse_limit(Some("abc")), 10);
        assert_eq!(parse_limit(Some("-3")), 10);
        assert_eq!(parse_limit(Some("")), 10);
        assert_eq!(parse_limit(Some(" 25 ")), 25);
        assert_eq!(parse_limit(Some("0")), 0);
    }
}
