//! Authentication gateway.
//!
//! Maps an opaque bearer token to a user identifier by delegating to the
//! external authentication service. The gateway fails closed: any
//! non-success response from the service means the token does not resolve
//! to a user. A single attempt is made per call; retry policy belongs to
//! the caller.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::api::UserId;

/// Error type for token resolution.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    /// The authentication service rejected the token.
    #[error("Invalid token ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// The authentication service could not be reached or answered
    /// with something unusable.
    #[error("Authentication service unavailable: {0}")]
    Unavailable(String),
}

/// Resolves bearer tokens to user identifiers.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait AuthenticationService: Send + Sync {
    /// Resolve a bearer token to the id of the user it belongs to.
    ///
    /// # Returns
    /// * `Ok(UserId)` - the authenticated user
    /// * `Err(AuthError::Unauthorized)` - the service rejected the token
    /// * `Err(AuthError::Unavailable)` - transport failure or bad payload
    async fn resolve_user(&self, token: &str) -> Result<UserId, AuthError>;
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    user_id: i64,
}

/// HTTP client for the external authentication service.
pub struct HttpAuthenticationService {
    client: reqwest::Client,
    user_info_url: String,
}

impl HttpAuthenticationService {
    /// Create a gateway talking to the service at `base_url`.
    pub fn new(base_url: &str, timeout_sec: u64) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            user_info_url: format!("{}/v1/users/me", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl AuthenticationService for HttpAuthenticationService {
    async fn resolve_user(&self, token: &str) -> Result<UserId, AuthError> {
        let response = self
            .client
            .get(&self.user_info_url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                AuthError::Unavailable(format!("Failed to reach authentication service: {}", e))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<empty response>".to_string());

        if !status.is_success() {
            return Err(AuthError::Unauthorized {
                status: status.as_u16(),
                message: body.trim().to_string(),
            });
        }

        let user: UserInfoResponse = serde_json::from_str(&body).map_err(|e| {
            AuthError::Unavailable(format!(
                "Failed to parse authentication response: {} ({})",
                e, body
            ))
        })?;

        Ok(UserId::new(user.user_id))
    }
}

/// The one token the stub accepts.
pub const STUB_VALID_TOKEN: &str = "valid_token";

/// Stub gateway for tests and environments without an authentication
/// service: exactly one fixed token resolves, to user 1.
#[derive(Debug, Clone, Default)]
pub struct StubAuthenticationService;

impl StubAuthenticationService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuthenticationService for StubAuthenticationService {
    async fn resolve_user(&self, token: &str) -> Result<UserId, AuthError> {
        if token == STUB_VALID_TOKEN {
            Ok(UserId::new(1))
        } else {
            Err(AuthError::Unauthorized {
                status: 401,
                message: "Invalid token".to_string(),
            })
        }
    }
}
