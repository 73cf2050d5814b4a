//! GraphQL client for the bounty platform.
//!
//! This crate provides:
//! - HTTP query execution with typed projections
//! - `graphql-transport-ws` subscriptions with reconnect
//! - Bearer token providers fetched per connection attempt

pub mod config;
pub mod error;
pub mod http;
pub mod queries;
pub mod retry;
pub mod token;
pub mod ws;

pub use config::GraphqlWsConfig;
pub use error::{ClientError, ClientResult};
pub use http::GraphqlHttpClient;
pub use queries::{bounty_from_update, BountyQueries, BountySummary};
pub use retry::RetryConfig;
pub use token::{NoToken, SessionTokenProvider, StaticToken, TokenProvider};
pub use ws::{GraphqlWsClient, Subscription};
