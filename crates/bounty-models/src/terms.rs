//! Versioned legal terms and per-user acceptance.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A published version of the platform terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TermsVersion {
    pub id: String,
    /// Human-facing version label, e.g. `2024.1`.
    pub version: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub effective_at: DateTime<Utc>,
    #[serde(default)]
    pub is_current: bool,
}

impl TermsVersion {
    pub fn new(version: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            version: version.into(),
            title: title.into(),
            summary: String::new(),
            effective_at: Utc::now(),
            is_current: false,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }
}

/// Record of a user accepting a terms version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TermsAcceptance {
    pub id: String,
    pub user_id: String,
    pub terms_version_id: String,
    pub version: String,
    pub accepted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

impl TermsAcceptance {
    pub fn new(user_id: impl Into<String>, terms: &TermsVersion, ip_address: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            terms_version_id: terms.id.clone(),
            version: terms.version.clone(),
            accepted_at: Utc::now(),
            ip_address,
        }
    }
}

/// Whether a user is up to date with the current terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserTermsStatus {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<DateTime<Utc>>,
    pub has_accepted_current: bool,
    pub requires_acceptance: bool,
}

impl UserTermsStatus {
    /// Project the current version against the user's acceptance history, oldest first.
    ///
    /// With no published terms there is nothing to accept. The reported
    /// acceptance is the one for the current version when there is one,
    /// otherwise the most recent.
    pub fn project(
        user_id: impl Into<String>,
        current: Option<&TermsVersion>,
        history: &[TermsAcceptance],
    ) -> Self {
        let accepted_current =
            current.and_then(|c| history.iter().find(|a| a.terms_version_id == c.id));
        let has_accepted_current = accepted_current.is_some();
        let latest = accepted_current.or_else(|| history.last());

        Self {
            user_id: user_id.into(),
            current_version: current.map(|c| c.version.clone()),
            accepted_version: latest.map(|a| a.version.clone()),
            accepted_at: latest.map(|a| a.accepted_at),
            has_accepted_current,
            requires_acceptance: current.is_some() && !has_accepted_current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_without_terms() {
        let status = UserTermsStatus::project("u1", None, &[]);
        assert!(!status.requires_acceptance);
        assert!(!status.has_accepted_current);
    }

    #[test]
    fn test_status_requires_acceptance_of_new_version() {
        let old = TermsVersion::new("2024.1", "Terms");
        let new = TermsVersion::new("2024.2", "Terms");
        let acceptance = TermsAcceptance::new("u1", &old, None);

        let status = UserTermsStatus::project("u1", Some(&new), &[acceptance]);
        assert!(status.requires_acceptance);
        assert_eq!(status.accepted_version.as_deref(), Some("2024.1"));
        assert_eq!(status.current_version.as_deref(), Some("2024.2"));
    }

    #[test]
    fn test_status_accepted_current() {
        let current = TermsVersion::new("2024.2", "Terms");
        let acceptance = TermsAcceptance::new("u1", &current, Some("198.51.100.4".into()));

        let status = UserTermsStatus::project("u1", Some(&current), &[acceptance]);
        assert!(status.has_accepted_current);
        assert!(!status.requires_acceptance);
    }

    #[test]
    fn test_status_counts_earlier_acceptance_of_current() {
        let old = TermsVersion::new("2024.1", "Terms");
        let current = TermsVersion::new("2024.2", "Terms");
        let history = [
            TermsAcceptance::new("u1", &current, None),
            TermsAcceptance::new("u1", &old, None),
        ];

        let status = UserTermsStatus::project("u1", Some(&current), &history);
        assert!(status.has_accepted_current);
        assert!(!status.requires_acceptance);
        assert_eq!(status.accepted_version.as_deref(), Some("2024.2"));
    }
}
