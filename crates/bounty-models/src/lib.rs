//! Shared data models for the bounty platform backend.
//!
//! This crate provides Serde-serializable types for:
//! - Bounty applications and submissions
//! - Restricted jurisdictions and resolved user locations
//! - Submission drafts (autosave)
//! - Legal terms versions and acceptances
//! - Transparency reporting payloads
//! - GraphQL over WebSocket message schemas

pub mod bounty;
pub mod draft;
pub mod graphql;
pub mod jurisdiction;
pub mod location;
pub mod terms;
pub mod transparency;

// Re-export common types
pub use bounty::{Application, ApplicationStatus, DataResponse, Submission, SubmissionStatus};
pub use draft::{SubmissionDraft, SubmissionForm, MAX_DRAFT_LINKS};
pub use graphql::{ClientMessage, ExecutionResult, GraphqlError, GraphqlOperation, ServerMessage};
pub use jurisdiction::{JurisdictionRegistry, JurisdictionType, RestrictedJurisdiction};
pub use location::UserLocation;
pub use terms::{TermsAcceptance, TermsVersion, UserTermsStatus};
pub use transparency::{Payout, TransparencyStats, DEFAULT_PAYOUT_LIMIT};
