//! Payout history for transparency reporting.

use tokio::sync::RwLock;

use bounty_models::Payout;

/// Append-only ledger of completed payouts.
#[derive(Default)]
pub struct PayoutLedger {
    payouts: RwLock<Vec<Payout>>,
}

impl PayoutLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, payout: Payout) {
        self.payouts.write().await.push(payout);
    }

    /// Most recent payouts first, at most `limit`.
    pub async fn list_recent(&self, limit: usize) -> Vec<Payout> {
        let mut payouts = self.payouts.read().await.clone();
        payouts.sort_by(|a, b| b.paid_at.cmp(&a.paid_at));
        payouts.truncate(limit);
        payouts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn payout(id: &str, minutes_ago: i64) -> Payout {
        Payout {
            id: id.to_string(),
            bounty_id: "b1".to_string(),
            recipient: "alice".to_string(),
            amount: 5_000,
            currency: "USD".to_string(),
            paid_at: Utc::now() - Duration::minutes(minutes_ago),
            tx_hash: None,
        }
    }

    #[tokio::test]
    async fn test_empty_ledger() {
        assert!(PayoutLedger::new().list_recent(10).await.is_empty());
    }

    #[tokio::test]
    async fn test_newest_first_and_truncated() {
        let ledger = PayoutLedger::new();
        ledger.record(payout("old", 30)).await;
        ledger.record(payout("new", 1)).await;
        ledger.record(payout("mid", 10)).await;

        let recent = ledger.list_recent(2).await;
        let ids: Vec<_> = recent.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid"]);
    }
}
