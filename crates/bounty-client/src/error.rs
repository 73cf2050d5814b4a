//! Client error types.

use bounty_models::GraphqlError;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur talking to the GraphQL endpoint.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GraphQL errors: {}", join_messages(.0))]
    Graphql(Vec<GraphqlError>),

    #[error("Timed out waiting for {0}")]
    Timeout(&'static str),

    #[error("Connection closed: {0}")]
    Closed(String),

    #[error("Protocol violation: {0}")]
    Protocol(String),

    #[error("Gave up after {attempts} connection attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

fn join_messages(errors: &[GraphqlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ClientError {
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }
}
