//! Remote identity service seam

use crate::ClientResult;
use async_trait::async_trait;
use shared::client::{LoginResponse, UserInfo};

/// Operations the session core consumes from the remote identity service.
///
/// Errors must be classified: an explicit credential or token rejection is
/// reported as such, everything reachability-related surfaces as a
/// connectivity-class error (see [`crate::ClientError::is_connectivity`]).
#[async_trait]
pub trait RemoteIdentity: Send + Sync {
    async fn login(&self, username: &str, secret: &str) -> ClientResult<LoginResponse>;

    async fn verify_token(&self, token: &str) -> ClientResult<UserInfo>;
}
