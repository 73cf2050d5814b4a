//! In-memory data access layer.
//!
//! This crate provides:
//! - The bounty store (applications and submissions keyed by bounty id)
//! - A key/value storage abstraction with `localStorage` semantics
//! - Draft autosave, terms acceptance and payout repositories

pub mod bounty_store;
pub mod draft_repo;
pub mod error;
pub mod payout_ledger;
pub mod storage;
pub mod terms_repo;

pub use bounty_store::BountyStore;
pub use draft_repo::DraftRepository;
pub use error::{StoreError, StoreResult};
pub use payout_ledger::PayoutLedger;
pub use storage::{KeyValueStorage, MemoryStorage};
pub use terms_repo::TermsRepository;
