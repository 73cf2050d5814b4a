//! Subscription client configuration.

use std::time::Duration;

use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::retry::RetryConfig;

/// Default subscription endpoint for local development.
pub const DEFAULT_WS_URL: &str = "ws://localhost:4000/graphql";

/// WebSocket subprotocol spoken by the server.
pub const GRAPHQL_TRANSPORT_WS_PROTOCOL: &str = "graphql-transport-ws";

/// GraphQL WebSocket client configuration.
#[derive(Debug, Clone)]
pub struct GraphqlWsConfig {
    /// Subscription endpoint (`ws://` or `wss://`).
    pub url: Url,
    /// Reconnect policy.
    pub retry: RetryConfig,
    /// TCP + WebSocket handshake timeout.
    pub connect_timeout: Duration,
    /// Time allowed between `connection_init` and `connection_ack`.
    pub ack_timeout: Duration,
}

impl GraphqlWsConfig {
    pub fn new(url: &str) -> ClientResult<Self> {
        let url = Url::parse(url)
            .map_err(|e| ClientError::Config(format!("invalid GraphQL WS URL '{}': {}", url, e)))?;

        match url.scheme() {
            "ws" | "wss" => {}
            other => {
                return Err(ClientError::Config(format!(
                    "GraphQL WS URL must use ws or wss, got '{}'",
                    other
                )))
            }
        }

        Ok(Self {
            url,
            retry: RetryConfig::default(),
            connect_timeout: Duration::from_secs(10),
            ack_timeout: Duration::from_secs(10),
        })
    }

    /// Create config from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        let url = std::env::var("NEXT_PUBLIC_GRAPHQL_WS_URL")
            .unwrap_or_else(|_| DEFAULT_WS_URL.to_string());

        let mut config = Self::new(&url)?;
        config.retry = RetryConfig::from_env();
        Ok(config)
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// HTTP endpoint serving queries next to the subscription endpoint.
    pub fn http_url(&self) -> Url {
        let mut url = self.url.clone();
        let scheme = if url.scheme() == "wss" { "https" } else { "http" };
        // ws -> http and wss -> https are always valid transitions
        let _ = url.set_scheme(scheme);
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GraphqlWsConfig::new(DEFAULT_WS_URL).unwrap();
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.ack_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_rejects_http_scheme() {
        assert!(matches!(
            GraphqlWsConfig::new("http://localhost:4000/graphql"),
            Err(ClientError::Config(_))
        ));
        assert!(GraphqlWsConfig::new("not a url").is_err());
    }

    #[test]
    fn test_http_url_mirrors_scheme() {
        let config = GraphqlWsConfig::new("wss://api.example.com/graphql").unwrap();
        assert_eq!(config.http_url().as_str(), "https://api.example.com/graphql");

        let config = GraphqlWsConfig::new("ws://localhost:4000/graphql").unwrap();
        assert_eq!(config.http_url().as_str(), "http://localhost:4000/graphql");
    }
}
