//! Bearer token providers.
//!
//! Tokens are fetched once per connection attempt so a reconnect always
//! presents the latest session token.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

/// Source of the bearer token sent with each connection.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Current token, or `None` to connect anonymously.
    async fn bearer_token(&self) -> Option<String>;
}

/// Anonymous connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoToken;

#[async_trait]
impl TokenProvider for NoToken {
    async fn bearer_token(&self) -> Option<String> {
        None
    }
}

/// A fixed token.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn bearer_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Token slot updated by the sign-in flow and read on every connection attempt.
#[derive(Debug, Clone, Default)]
pub struct SessionTokenProvider {
    token: Arc<RwLock<Option<String>>>,
}

impl SessionTokenProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    pub async fn clear(&self) {
        *self.token.write().await = None;
    }
}

#[async_trait]
impl TokenProvider for SessionTokenProvider {
    async fn bearer_token(&self) -> Option<String> {
        self.token.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_provider_tracks_sign_in_and_out() {
        let provider = SessionTokenProvider::new();
        assert_eq!(provider.bearer_token().await, None);

        let shared = provider.clone();
        shared.set("abc").await;
        assert_eq!(provider.bearer_token().await.as_deref(), Some("abc"));

        shared.clear().await;
        assert_eq!(provider.bearer_token().await, None);
    }

    #[tokio::test]
    async fn test_static_and_anonymous() {
        assert_eq!(StaticToken::new("t").bearer_token().await.as_deref(), Some("t"));
        assert_eq!(NoToken.bearer_token().await, None);
    }
}
