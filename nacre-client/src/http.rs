//! HTTP client for the remote identity service

use crate::{ClientError, ClientResult, RemoteIdentity};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::client::{LoginRequest, LoginResponse, UserInfo, VerifyResponse};
use std::time::Duration;

/// Response envelope used by the backoffice API (success/data/error format)
#[derive(serde::Deserialize)]
struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

/// Network HTTP client
#[derive(Debug, Clone)]
pub struct HttpRemoteClient {
    client: Client,
    base_url: String,
}

impl HttpRemoteClient {
    /// A caller-level timeout on any request degrades it to a
    /// connectivity-class failure.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RemoteIdentity for HttpRemoteClient {
    async fn login(&self, username: &str, secret: &str) -> ClientResult<LoginResponse> {
        let url = format!("{}/api/auth/login", self.base_url);
        let req = LoginRequest {
            username: username.to_string(),
            password: secret.to_string(),
        };
        let response = self.client.post(&url).json(&req).send().await?;
        let status = response.status();
        match status {
            s if s.is_success() => {
                let envelope: ApiEnvelope<LoginResponse> = response.json().await?;
                if !envelope.success {
                    tracing::debug!(
                        error = %envelope.error.unwrap_or_default(),
                        "Remote login rejected"
                    );
                    return Err(ClientError::InvalidCredentials);
                }
                envelope
                    .data
                    .ok_or_else(|| ClientError::InvalidResponse("missing login data".into()))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::BAD_REQUEST => {
                Err(ClientError::InvalidCredentials)
            }
            s => {
                let message = response.text().await.unwrap_or_default();
                Err(ClientError::Server {
                    status: s.as_u16(),
                    message,
                })
            }
        }
    }

    async fn verify_token(&self, token: &str) -> ClientResult<UserInfo> {
        let url = format!("{}/api/auth/me", self.base_url);
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await?;
        let status = response.status();
        match status {
            s if s.is_success() => {
                let envelope: ApiEnvelope<VerifyResponse> = response.json().await?;
                if !envelope.success {
                    return Err(ClientError::InvalidToken);
                }
                envelope
                    .data
                    .map(|v| v.user)
                    .ok_or_else(|| ClientError::InvalidResponse("missing user data".into()))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ClientError::InvalidToken),
            s => {
                let message = response.text().await.unwrap_or_default();
                Err(ClientError::Server {
                    status: s.as_u16(),
                    message,
                })
            }
        }
    }
}
