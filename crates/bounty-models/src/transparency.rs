//! Public transparency reporting payloads.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Number of payouts returned when the caller gives no usable limit.
pub const DEFAULT_PAYOUT_LIMIT: usize = 10;

/// A completed bounty payout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payout {
    pub id: String,
    pub bounty_id: String,
    pub recipient: String,
    /// Amount in minor units of `currency`.
    pub amount: u64,
    pub currency: String,
    pub paid_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
}

/// Aggregate platform statistics.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransparencyStats {
    pub total_bounties: u64,
    pub active_bounties: u64,
    pub total_payouts: u64,
    pub total_paid_out: u64,
    pub average_payout: f64,
}

impl TransparencyStats {
    /// The all-zero placeholder served until reporting is wired up.
    pub fn zero() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_stats_shape() {
        let json = serde_json::to_value(TransparencyStats::zero()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "totalBounties": 0,
                "activeBounties": 0,
                "totalPayouts": 0,
                "totalPaidOut": 0,
                "averagePayout": 0.0
            })
        );
    }
}
