//! Applications and submissions keyed by bounty id.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use bounty_models::{Application, Submission};

/// In-memory store of bounty activity.
#[derive(Default)]
pub struct BountyStore {
    applications: RwLock<HashMap<String, Vec<Application>>>,
    submissions: RwLock<HashMap<String, Vec<Submission>>>,
}

impl BountyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with applications and submissions.
    pub fn with_seed(applications: Vec<Application>, submissions: Vec<Submission>) -> Self {
        let mut apps: HashMap<String, Vec<Application>> = HashMap::new();
        for app in applications {
            apps.entry(app.bounty_id.clone()).or_default().push(app);
        }

        let mut subs: HashMap<String, Vec<Submission>> = HashMap::new();
        for sub in submissions {
            subs.entry(sub.bounty_id.clone()).or_default().push(sub);
        }

        Self {
            applications: RwLock::new(apps),
            submissions: RwLock::new(subs),
        }
    }

    /// All applications for a bounty, in insertion order. Unknown ids yield an empty list.
    pub async fn get_applications_by_bounty(&self, bounty_id: &str) -> Vec<Application> {
        self.applications
            .read()
            .await
            .get(bounty_id)
            .cloned()
            .unwrap_or_default()
    }

    /// All submissions for a bounty, in insertion order. Unknown ids yield an empty list.
    pub async fn get_submissions_by_bounty(&self, bounty_id: &str) -> Vec<Submission> {
        self.submissions
            .read()
            .await
            .get(bounty_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn add_application(&self, application: Application) {
        debug!(bounty_id = %application.bounty_id, id = %application.id, "Storing application");
        self.applications
            .write()
            .await
            .entry(application.bounty_id.clone())
            .or_default()
            .push(application);
    }

    pub async fn add_submission(&self, submission: Submission) {
        debug!(bounty_id = %submission.bounty_id, id = %submission.id, "Storing submission");
        self.submissions
            .write()
            .await
            .entry(submission.bounty_id.clone())
            .or_default()
            .push(submission);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_bounty_is_empty() {
        let store = BountyStore::new();
        assert!(store.get_applications_by_bounty("missing").await.is_empty());
        assert!(store.get_submissions_by_bounty("missing").await.is_empty());
    }

    #[tokio::test]
    async fn test_lookups_are_scoped_to_bounty() {
        let a1 = Application::new("b1", "alice", "first");
        let a2 = Application::new("b1", "bob", "second");
        let a3 = Application::new("b2", "carol", "other bounty");
        let store = BountyStore::with_seed(vec![a1.clone(), a2.clone(), a3], vec![]);

        assert_eq!(store.get_applications_by_bounty("b1").await, vec![a1, a2]);
        assert_eq!(store.get_applications_by_bounty("b2").await.len(), 1);
    }

    #[tokio::test]
    async fn test_add_submission_appends() {
        let store = BountyStore::new();
        let s1 = Submission::new("b1", "alice", "Patch", "Fixes the bug");
        let s2 = Submission::new("b1", "bob", "Other patch", "Also fixes it");

        store.add_submission(s1.clone()).await;
        store.add_submission(s2.clone()).await;

        assert_eq!(store.get_submissions_by_bounty("b1").await, vec![s1, s2]);
        assert!(store.get_applications_by_bounty("b1").await.is_empty());
    }
}
