//! Session establishment and identity reconciliation for the Nacre POS suite
//!
//! Decides, at process start and at every login attempt, which identity
//! source governs the active session: the remote identity service (token
//! restore or credential login), or the local offline copy of users and
//! employees. The outcome is exactly one [`ActiveSession`] that the rest
//! of the application treats as ground truth.
//!
//! The system is built to keep working without connectivity: remote
//! reachability failures fall back to the local store, while an explicit
//! remote credential rejection is terminal and never overridden by local
//! data.

pub mod config;
pub mod credential;
pub mod logger;
pub mod permissions;
pub mod session;
pub mod store;

// Re-exports
pub use config::Config;
pub use session::{
    ActiveSession, EmployeeSummary, LoginError, SessionEngine, SessionOrigin, SessionUser,
};
pub use store::{IdentityStore, StoreError};
