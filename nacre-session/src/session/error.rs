//! Login failure taxonomy
//!
//! Every variant is terminal for the attempt: connectivity-class remote
//! failures are already recovered inside the engine by falling back to
//! the local source, and the engine never retries on its own.

use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoginError {
    /// The identifier/secret pair was rejected, either by the remote
    /// authority or by local verification
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The resolved employee exists but is disabled
    #[error("Account has been disabled")]
    EmployeeInactive,

    /// The identity resolved to an employee without a credential record;
    /// credentials are provisioned administratively, never auto-created
    #[error("No credential record for this employee")]
    UserNotProvisioned,

    /// The credential record has no usable secret and no bootstrap applies
    #[error("Credential record has no usable secret")]
    MissingSecret,

    /// Storage or unexpected failure; the caller should prompt a retry
    #[error("System error: {0}")]
    System(String),
}

impl From<StoreError> for LoginError {
    fn from(err: StoreError) -> Self {
        LoginError::System(err.to_string())
    }
}
