//! Request handlers.

pub mod auth;
pub mod bounties;
pub mod compliance;
pub mod drafts;
pub mod health;
pub mod terms;
pub mod transparency;

pub use health::*;
