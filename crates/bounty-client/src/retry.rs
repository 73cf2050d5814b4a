//! Reconnect policy with exponential backoff.
//!
//! Every connection-level failure is retried until `max_retries`
//! reconnects have been spent. A successful `connection_ack` resets the count.

use std::time::Duration;

// =============================================================================
// Configuration
// =============================================================================

/// Reconnect policy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of reconnect attempts after the initial connection.
    pub max_retries: u32,
    /// Base delay for exponential backoff (in milliseconds).
    pub base_delay_ms: u64,
    /// Maximum delay cap (in milliseconds).
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay_ms: 1000,
            max_delay_ms: 30_000,
        }
    }
}

impl RetryConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let base_delay_ms: u64 = std::env::var("GRAPHQL_WS_RETRY_BASE_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1000);

        let max_delay_ms: u64 = std::env::var("GRAPHQL_WS_RETRY_MAX_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30_000);

        Self {
            max_retries: 5,
            base_delay_ms,
            max_delay_ms,
        }
    }

    /// Whether another reconnect is allowed after `retries_used` reconnects.
    pub fn allows_retry(&self, retries_used: u32) -> bool {
        retries_used < self.max_retries
    }

    /// Delay before reconnect number `retry` (0-based): `base * 2^retry`, capped.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u64.saturating_pow(retry);
        let delay = self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms);
        Duration::from_millis(delay)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_config_default() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.base_delay_ms, 1000);
        assert_eq!(config.max_delay_ms, 30_000);
    }

    #[test]
    fn test_allows_exactly_max_retries() {
        let config = RetryConfig::default();
        assert!((0..5).all(|n| config.allows_retry(n)));
        assert!(!config.allows_retry(5));
    }

    #[test]
    fn test_delay_grows_and_is_capped() {
        let config = RetryConfig::default();
        assert_eq!(config.delay_for(0), Duration::from_secs(1));
        assert_eq!(config.delay_for(1), Duration::from_secs(2));
        assert_eq!(config.delay_for(3), Duration::from_secs(8));
        assert_eq!(config.delay_for(10), Duration::from_secs(30));
        assert_eq!(config.delay_for(64), Duration::from_secs(30));
    }
}
