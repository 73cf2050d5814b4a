//! Submission drafts for form autosave.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::Url;
use validator::{Validate, ValidationError};

/// Maximum number of links a submission may carry.
pub const MAX_DRAFT_LINKS: usize = 10;

/// Editable fields of a bounty submission form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionForm {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 10000))]
    #[serde(default)]
    pub description: String,

    #[validate(custom(function = "validate_links"))]
    #[serde(default)]
    pub links: Vec<String>,

    #[validate(length(max = 2000))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn validate_links(links: &Vec<String>) -> Result<(), ValidationError> {
    if links.len() > MAX_DRAFT_LINKS {
        return Err(ValidationError::new("too_many_links"));
    }
    for link in links {
        match Url::parse(link.trim()) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => return Err(ValidationError::new("invalid_link")),
        }
    }
    Ok(())
}

/// An autosaved, not yet submitted, submission form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDraft {
    pub id: String,
    pub bounty_id: String,
    pub user_id: String,
    pub form: SubmissionForm,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubmissionDraft {
    pub fn new(
        bounty_id: impl Into<String>,
        user_id: impl Into<String>,
        form: SubmissionForm,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            bounty_id: bounty_id.into(),
            user_id: user_id.into(),
            form,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the form contents, keeping identity and creation time.
    pub fn update(mut self, form: SubmissionForm) -> Self {
        self.form = form;
        self.updated_at = Utc::now();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, links: Vec<&str>) -> SubmissionForm {
        SubmissionForm {
            title: title.to_string(),
            description: "details".to_string(),
            links: links.into_iter().map(str::to_string).collect(),
            notes: None,
        }
    }

    #[test]
    fn test_valid_form() {
        assert!(form("Fix login bug", vec!["https://github.com/org/repo/pull/1"])
            .validate()
            .is_ok());
    }

    #[test]
    fn test_empty_title_rejected() {
        assert!(form("", vec![]).validate().is_err());
    }

    #[test]
    fn test_non_http_link_rejected() {
        assert!(form("t", vec!["javascript:alert(1)"]).validate().is_err());
        assert!(form("t", vec!["not a url"]).validate().is_err());
    }

    #[test]
    fn test_too_many_links_rejected() {
        let links = vec!["https://example.com"; MAX_DRAFT_LINKS + 1];
        assert!(form("t", links).validate().is_err());
    }

    #[test]
    fn test_update_keeps_identity() {
        let draft = SubmissionDraft::new("b1", "u1", form("first", vec![]));
        let id = draft.id.clone();
        let created = draft.created_at;

        let updated = draft.update(form("second", vec![]));
        assert_eq!(updated.id, id);
        assert_eq!(updated.created_at, created);
        assert_eq!(updated.form.title, "second");
        assert!(updated.updated_at >= created);
    }
}
