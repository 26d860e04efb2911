//! Session Reconciliation
//!
//! Orchestrates the remote identity service, the local identity store,
//! the credential verifier and the permission resolver to produce exactly
//! one [`ActiveSession`].

pub mod descriptor;
pub mod engine;
pub mod error;
pub mod types;

// Re-exports
pub use descriptor::{SessionDescriptor, SessionFiles};
pub use engine::{LoginStrategy, RestoreStrategy, SessionEngine, MASTER_ADMIN_USERNAME};
pub use error::LoginError;
pub use types::{ActiveSession, EmployeeSummary, SessionOrigin, SessionUser};
