//! Terms versions and user acceptances.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::info;

use bounty_models::{TermsAcceptance, TermsVersion, UserTermsStatus};

use crate::error::{StoreError, StoreResult};

/// In-memory repository of terms versions and acceptances.
#[derive(Default)]
pub struct TermsRepository {
    versions: RwLock<Vec<TermsVersion>>,
    /// Acceptances per user, oldest first.
    acceptances: RwLock<HashMap<String, Vec<TermsAcceptance>>>,
}

impl TermsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a version and make it the current one.
    pub async fn publish(&self, mut version: TermsVersion) -> TermsVersion {
        let mut versions = self.versions.write().await;
        for v in versions.iter_mut() {
            v.is_current = false;
        }
        version.is_current = true;
        versions.push(version.clone());

        info!(version = %version.version, "Published terms version");
        version
    }

    pub async fn current(&self) -> Option<TermsVersion> {
        self.versions
            .read()
            .await
            .iter()
            .find(|v| v.is_current)
            .cloned()
    }

    pub async fn get_version(&self, id: &str) -> Option<TermsVersion> {
        self.versions.read().await.iter().find(|v| v.id == id).cloned()
    }

    /// Record acceptance. Accepting the same version twice returns the first record.
    pub async fn accept(
        &self,
        user_id: &str,
        terms_version_id: &str,
        ip_address: Option<String>,
    ) -> StoreResult<TermsAcceptance> {
        let version = self
            .get_version(terms_version_id)
            .await
            .ok_or_else(|| StoreError::not_found(format!("terms version {}", terms_version_id)))?;

        let mut acceptances = self.acceptances.write().await;
        let history = acceptances.entry(user_id.to_string()).or_default();

        if let Some(existing) = history.iter().find(|a| a.terms_version_id == version.id) {
            return Ok(existing.clone());
        }

        let acceptance = TermsAcceptance::new(user_id, &version, ip_address);
        history.push(acceptance.clone());

        info!(user_id = %user_id, version = %version.version, "Terms accepted");
        Ok(acceptance)
    }

    pub async fn status_for(&self, user_id: &str) -> UserTermsStatus {
        let current = self.current().await;
        let acceptances = self.acceptances.read().await;
        let history = acceptances.get(user_id).map(Vec::as_slice).unwrap_or_default();
        UserTermsStatus::project(user_id, current.as_ref(), history)
    }
}
