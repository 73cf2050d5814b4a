//! Application state.

use std::sync::Arc;

use bounty_models::JurisdictionRegistry;
use bounty_store::{BountyStore, DraftRepository, MemoryStorage, PayoutLedger, TermsRepository};

use crate::auth::{AuthConfig, SessionVerifier};
use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub auth: Arc<AuthConfig>,
    pub sessions: Arc<SessionVerifier>,
    pub store: Arc<BountyStore>,
    pub drafts: DraftRepository,
    pub terms: Arc<TermsRepository>,
    pub payouts: Arc<PayoutLedger>,
    pub jurisdictions: Arc<JurisdictionRegistry>,
}

impl AppState {
    /// Create state with empty in-memory repositories.
    pub fn new(config: ApiConfig, auth: AuthConfig) -> Self {
        let sessions = SessionVerifier::new(&auth);

        Self {
            config,
            auth: Arc::new(auth),
            sessions: Arc::new(sessions),
            store: Arc::new(BountyStore::new()),
            drafts: DraftRepository::new(Arc::new(MemoryStorage::new())),
            terms: Arc::new(TermsRepository::new()),
            payouts: Arc::new(PayoutLedger::new()),
            jurisdictions: Arc::new(JurisdictionRegistry::with_defaults()),
        }
    }

    pub fn with_store(mut self, store: BountyStore) -> Self {
        self.store = Arc::new(store);
        self
    }
}
