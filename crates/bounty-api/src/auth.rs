//! Session authentication and social sign-in configuration.
//!
//! Sessions are HS256 JWTs signed with `AUTH_SECRET` and issued by the app URL.
//! GitHub is the only social provider.

use std::fmt;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::config::ConfigError;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Base URL used when `NEXT_PUBLIC_APP_URL` is unset.
pub const DEFAULT_APP_URL: &str = "http://localhost:3000";

/// Session lifetime.
pub const SESSION_TTL_DAYS: i64 = 7;

const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const GITHUB_SCOPE: &str = "read:user user:email";

/// GitHub OAuth application credentials.
#[derive(Clone)]
pub struct GithubProvider {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for GithubProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubProvider")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Authentication settings.
#[derive(Clone)]
pub struct AuthConfig {
    /// Public base URL of the web app, without a trailing slash.
    pub app_url: String,
    secret: String,
    pub github: Option<GithubProvider>,
    pub session_ttl: Duration,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("app_url", &self.app_url)
            .field("secret", &"<redacted>")
            .field("github", &self.github)
            .field("session_ttl", &self.session_ttl)
            .finish()
    }
}

impl AuthConfig {
    pub fn new(app_url: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            app_url: app_url.into().trim_end_matches('/').to_string(),
            secret: secret.into(),
            github: None,
            session_ttl: Duration::days(SESSION_TTL_DAYS),
        }
    }

    pub fn with_github(mut self, client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        self.github = Some(GithubProvider {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        });
        self
    }

    /// Load from `NEXT_PUBLIC_APP_URL`, `AUTH_SECRET`, `GITHUB_CLIENT_ID`
    /// and `GITHUB_CLIENT_SECRET`.
    pub fn from_env(production: bool) -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok(), production)
    }

    pub fn from_lookup(
        var: impl Fn(&str) -> Option<String>,
        production: bool,
    ) -> Result<Self, ConfigError> {
        let var = |name: &str| var(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let app_url = var("NEXT_PUBLIC_APP_URL").unwrap_or_else(|| DEFAULT_APP_URL.to_string());
        Url::parse(&app_url).map_err(|e| ConfigError::Invalid {
            name: "NEXT_PUBLIC_APP_URL",
            reason: e.to_string(),
        })?;

        let secret = match var("AUTH_SECRET") {
            Some(secret) => secret,
            None if production => return Err(ConfigError::Missing("AUTH_SECRET")),
            None => {
                warn!("AUTH_SECRET not set, using a random secret; sessions will not survive restarts");
                format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
            }
        };

        let mut config = Self::new(app_url, secret);

        match (var("GITHUB_CLIENT_ID"), var("GITHUB_CLIENT_SECRET")) {
            (Some(id), Some(secret)) => config = config.with_github(id, secret),
            (None, None) => debug!("GitHub sign-in disabled"),
            _ => warn!("GitHub sign-in disabled: GITHUB_CLIENT_ID and GITHUB_CLIENT_SECRET must both be set"),
        }

        Ok(config)
    }

    pub fn callback_url(&self, provider: &str) -> String {
        format!("{}/api/auth/callback/{}", self.app_url, provider)
    }

    /// GitHub authorize URL for a sign-in attempt identified by `state`.
    pub fn github_authorize_url(&self, state: &str) -> ApiResult<Url> {
        let github = self
            .github
            .as_ref()
            .ok_or_else(|| ApiError::not_found("GitHub sign-in is not configured"))?;
        let redirect_uri = self.callback_url("github");

        Url::parse_with_params(
            GITHUB_AUTHORIZE_URL,
            &[
                ("client_id", github.client_id.as_str()),
                ("redirect_uri", redirect_uri.as_str()),
                ("scope", GITHUB_SCOPE),
                ("state", state),
            ],
        )
        .map_err(|e| ApiError::internal(format!("Failed to build authorize URL: {}", e)))
    }
}

/// Session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User ID
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies session tokens.
pub struct SessionVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    ttl: Duration,
}

impl SessionVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.app_url.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.app_url.clone(),
            ttl: config.session_ttl,
        }
    }

    pub fn issue(&self, user_id: &str, email: Option<&str>) -> ApiResult<String> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            email: email.map(str::to_string),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ApiError::internal(format!("Failed to sign session: {}", e)))
    }

    pub fn verify(&self, token: &str) -> ApiResult<SessionClaims> {
        decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Session verification failed: {}", e);
                match e.kind() {
                    ErrorKind::ExpiredSignature => ApiError::unauthorized("Session expired"),
                    _ => ApiError::unauthorized("Invalid session token"),
                }
            })
    }
}

/// Authenticated user extracted from request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: Option<String>,
}

impl From<SessionClaims> for AuthUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
        }
    }
}

/// Axum extractor for authenticated user.
#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Invalid Authorization header format"))?;

        let claims = state.sessions.verify(token.trim())?;
        Ok(AuthUser::from(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        move |k| vars.get(k).map(|v| v.to_string())
    }

    #[test]
    fn test_from_lookup_requires_secret_in_production() {
        let err = AuthConfig::from_lookup(lookup(&[]), true).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("AUTH_SECRET")));
    }

    #[test]
    fn test_from_lookup_development_defaults() {
        let config = AuthConfig::from_lookup(lookup(&[]), false).unwrap();
        assert_eq!(config.app_url, DEFAULT_APP_URL);
        assert!(config.github.is_none());
        assert_eq!(config.session_ttl, Duration::days(7));
    }

    #[test]
    fn test_github_needs_both_credentials() {
        let half = AuthConfig::from_lookup(
            lookup(&[("AUTH_SECRET", "s"), ("GITHUB_CLIENT_ID", "abc")]),
            true,
        )
        .unwrap();
        assert!(half.github.is_none());

        let full = AuthConfig::from_lookup(
            lookup(&[
                ("AUTH_SECRET", "s"),
                ("GITHUB_CLIENT_ID", "abc"),
                ("GITHUB_CLIENT_SECRET", "shh"),
                ("NEXT_PUBLIC_APP_URL", "https://bounties.dev/"),
            ]),
            true,
        )
        .unwrap();
        assert_eq!(full.github.as_ref().unwrap().client_id, "abc");
        assert_eq!(full.callback_url("github"), "https://bounties.dev/api/auth/callback/github");
        assert!(!format!("{:?}", full).contains("shh"));
    }

    #[test]
    fn test_invalid_app_url() {
        let err = AuthConfig::from_lookup(lookup(&[("NEXT_PUBLIC_APP_URL", "not a url")]), false).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "NEXT_PUBLIC_APP_URL", .. }));
    }

    #[test]
    fn test_github_authorize_url() {
        let config = AuthConfig::new("https://bounties.dev", "s").with_github("client-1", "secret");
        let url = config.github_authorize_url("xyz").unwrap();
        let params: HashMap<String, String> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("github.com"));
        assert_eq!(params["client_id"], "client-1");
        assert_eq!(params["redirect_uri"], "https://bounties.dev/api/auth/callback/github");
        assert_eq!(params["scope"], "read:user user:email");
        assert_eq!(params["state"], "xyz");

        let disabled = AuthConfig::new("https://bounties.dev", "s");
        assert!(matches!(disabled.github_authorize_url("xyz"), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_session_round_trip() {
        let verifier = SessionVerifier::new(&AuthConfig::new("https://bounties.dev", "secret"));
        let token = verifier.issue("user-1", Some("dev@bounties.dev")).unwrap();
        let claims = verifier.verify(&token).unwrap();

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email.as_deref(), Some("dev@bounties.dev"));
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 3600);
    }

    #[test]
    fn test_session_rejects_foreign_tokens() {
        let ours = SessionVerifier::new(&AuthConfig::new("https://bounties.dev", "secret"));
        let other_secret = SessionVerifier::new(&AuthConfig::new("https://bounties.dev", "other"));
        let other_issuer = SessionVerifier::new(&AuthConfig::new("https://evil.dev", "secret"));

        for token in [
            other_secret.issue("user-1", None).unwrap(),
            other_issuer.issue("user-1", None).unwrap(),
            "garbage".to_string(),
        ] {
            assert!(matches!(ours.verify(&token), Err(ApiError::Unauthorized(_))));
        }
    }

    #[test]
    fn test_session_rejects_expired() {
        let config = AuthConfig::new("https://bounties.dev", "secret");
        let verifier = SessionVerifier::new(&config);
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "user-1".into(),
            email: None,
            iss: config.app_url.clone(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"secret")).unwrap();

        match verifier.verify(&token) {
            Err(ApiError::Unauthorized(msg)) => assert_eq!(msg, "Session expired"),
            other => panic!("expected expiry rejection, got {:?}", other),
        }
    }
}
