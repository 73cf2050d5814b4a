//! Axum HTTP API server.
//!
//! This crate provides:
//! - Bounty application/submission listings and transparency reports
//! - Draft autosave and terms acceptance for signed-in users
//! - Session verification and GitHub sign-in redirects
//! - Rate limiting, security headers and Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use auth::{AuthConfig, AuthUser, SessionVerifier};
pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
