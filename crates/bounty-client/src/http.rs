//! GraphQL queries over HTTP.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use bounty_models::{ExecutionResult, GraphqlOperation};

use crate::config::GraphqlWsConfig;
use crate::error::{ClientError, ClientResult};
use crate::token::TokenProvider;

/// HTTP client for GraphQL queries and mutations.
#[derive(Clone)]
pub struct GraphqlHttpClient {
    http: Client,
    endpoint: Url,
    tokens: Arc<dyn TokenProvider>,
}

impl GraphqlHttpClient {
    pub fn new(endpoint: Url, tokens: Arc<dyn TokenProvider>) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            tokens,
        })
    }

    /// Endpoint from `GRAPHQL_HTTP_URL`, or the HTTP twin of the subscription URL.
    pub fn from_env(tokens: Arc<dyn TokenProvider>) -> ClientResult<Self> {
        let endpoint = match std::env::var("GRAPHQL_HTTP_URL") {
            Ok(url) => Url::parse(&url)
                .map_err(|e| ClientError::Config(format!("invalid GRAPHQL_HTTP_URL '{}': {}", url, e)))?,
            Err(_) => GraphqlWsConfig::from_env()?.http_url(),
        };
        Self::new(endpoint, tokens)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Execute an operation and return the raw result.
    pub async fn execute(&self, operation: &GraphqlOperation) -> ClientResult<ExecutionResult> {
        let mut request = self.http.post(self.endpoint.clone()).json(operation);
        if let Some(token) = self.tokens.bearer_token().await {
            request = request.bearer_auth(token);
        }

        debug!(
            operation = operation.operation_name.as_deref().unwrap_or("anonymous"),
            "Executing GraphQL operation"
        );

        let result = request
            .send()
            .await?
            .error_for_status()?
            .json::<ExecutionResult>()
            .await?;

        Ok(result)
    }

    /// Execute an operation and deserialize its `data`.
    ///
    /// Any server-reported error fails the call, even alongside partial data.
    pub async fn query<T: DeserializeOwned>(&self, operation: &GraphqlOperation) -> ClientResult<T> {
        let result = self.execute(operation).await?;

        if result.has_errors() {
            return Err(ClientError::Graphql(result.errors.unwrap_or_default()));
        }

        let data = result
            .data
            .ok_or_else(|| ClientError::protocol("response contained neither data nor errors"))?;

        Ok(serde_json::from_value(data)?)
    }
}
