//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport failure (connection refused, timeout, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic transport failure raised outside of reqwest
    #[error("Network error: {0}")]
    Network(String),

    /// Server-side failure; the service was reachable but unable to answer
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The remote authority explicitly rejected the credential pair
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The remote authority rejected the bearer token
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Connectivity-class failures are attributable to reachability rather
    /// than an authority decision. Callers recover from these by falling
    /// back to local resolution; authority decisions are terminal.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            ClientError::Http(_) | ClientError::Network(_) | ClientError::Server { .. }
        )
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_are_not_connectivity_failures() {
        assert!(!ClientError::InvalidCredentials.is_connectivity());
        assert!(!ClientError::InvalidToken.is_connectivity());
        assert!(!ClientError::InvalidResponse("bad".into()).is_connectivity());
    }

    #[test]
    fn transport_failures_are_connectivity_failures() {
        assert!(ClientError::Network("timeout".into()).is_connectivity());
        assert!(
            ClientError::Server {
                status: 503,
                message: "unavailable".into()
            }
            .is_connectivity()
        );
    }
}
