//! Bounty applications and submissions.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Review status of a bounty application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }
}

/// Review status of a bounty submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
        }
    }
}

/// A user's application to work on a bounty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub bounty_id: String,
    pub applicant_id: String,
    /// Pitch written by the applicant.
    pub message: String,
    #[serde(default)]
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

impl Application {
    /// Create a pending application with a fresh id.
    pub fn new(
        bounty_id: impl Into<String>,
        applicant_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            bounty_id: bounty_id.into(),
            applicant_id: applicant_id.into(),
            message: message.into(),
            status: ApplicationStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

/// Work submitted against a bounty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub bounty_id: String,
    pub submitter_id: String,
    pub title: String,
    pub description: String,
    /// Links to the delivered work (PRs, demos, documents).
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
}

impl Submission {
    /// Create a pending submission with a fresh id.
    pub fn new(
        bounty_id: impl Into<String>,
        submitter_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            bounty_id: bounty_id.into(),
            submitter_id: submitter_id.into(),
            title: title.into(),
            description: description.into(),
            links: Vec::new(),
            status: SubmissionStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn with_links(mut self, links: Vec<String>) -> Self {
        self.links = links;
        self
    }
}

/// `{ "data": [...] }` envelope used by list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DataResponse<T> {
    pub data: Vec<T>,
}

impl<T> DataResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_serializes_camel_case() {
        let app = Application::new("bounty-1", "user-1", "I can do this");
        let json = serde_json::to_value(&app).unwrap();

        assert_eq!(json["bountyId"], "bounty-1");
        assert_eq!(json["applicantId"], "user-1");
        assert_eq!(json["status"], "pending");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_submission_status_defaults_to_pending() {
        let json = serde_json::json!({
            "id": "s1",
            "bountyId": "b1",
            "submitterId": "u1",
            "title": "Fix",
            "description": "Fixed it",
            "createdAt": "2024-01-01T00:00:00Z"
        });
        let submission: Submission = serde_json::from_value(json).unwrap();

        assert_eq!(submission.status, SubmissionStatus::Pending);
        assert!(submission.links.is_empty());
    }

    #[test]
    fn test_data_response_envelope() {
        let response = DataResponse::new(vec![1, 2, 3]);
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"data":[1,2,3]}"#);
    }
}
