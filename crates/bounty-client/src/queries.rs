//! Bounty queries and subscriptions with their result projections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use bounty_models::{ExecutionResult, GraphqlOperation};

use crate::error::{ClientError, ClientResult};
use crate::http::GraphqlHttpClient;
use crate::ws::{GraphqlWsClient, Subscription};

pub const BOUNTY_QUERY: &str = r#"query Bounty($id: ID!) {
  bounty(id: $id) {
    id
    title
    status
    rewardAmount
    rewardCurrency
    createdAt
  }
}"#;

pub const BOUNTY_UPDATED_SUBSCRIPTION: &str = r#"subscription BountyUpdated($id: ID!) {
  bountyUpdated(id: $id) {
    id
    title
    status
    rewardAmount
    rewardCurrency
    createdAt
  }
}"#;

/// Bounty fields selected by the queries above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BountySummary {
    pub id: String,
    pub title: String,
    pub status: String,
    pub reward_amount: u64,
    pub reward_currency: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct BountyData {
    bounty: Option<BountySummary>,
}

/// Typed wrappers around the generated bounty operations.
#[derive(Clone)]
pub struct BountyQueries {
    http: GraphqlHttpClient,
}

impl BountyQueries {
    pub fn new(http: GraphqlHttpClient) -> Self {
        Self { http }
    }

    /// Fetch one bounty, projecting `data.bounty`.
    pub async fn bounty(&self, id: &str) -> ClientResult<Option<BountySummary>> {
        let operation = GraphqlOperation::new(BOUNTY_QUERY)
            .with_operation_name("Bounty")
            .with_variables(json!({ "id": id }));

        let data: BountyData = self.http.query(&operation).await?;
        Ok(data.bounty)
    }

    /// Subscribe to updates of one bounty.
    pub fn bounty_updates(ws: &GraphqlWsClient, id: &str) -> Subscription {
        let operation = GraphqlOperation::new(BOUNTY_UPDATED_SUBSCRIPTION)
            .with_operation_name("BountyUpdated")
            .with_variables(json!({ "id": id }));
        ws.subscribe(operation)
    }
}

/// Project a `bountyUpdated` event delivered by [`BountyQueries::bounty_updates`].
pub fn bounty_from_update(result: ExecutionResult) -> ClientResult<Option<BountySummary>> {
    if let Some(errors) = result.errors.filter(|e| !e.is_empty()) {
        return Err(ClientError::Graphql(errors));
    }

    let update = result
        .data
        .and_then(|mut data| data.get_mut("bountyUpdated").map(serde_json::Value::take));

    match update {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
    }
}
