//! Staleness notifier for the downstream solutions service.
//!
//! When a schema's content changes, previously computed route solutions for
//! it are no longer valid. The notifier signals the solutions service so it
//! can drop or recompute them. A single request per call, no retries; a
//! failure propagates to the caller.

use async_trait::async_trait;
use log::info;
use std::time::Duration;

use crate::api::SchemaId;

/// Error type for staleness notifications.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SolutionsError {
    /// The solutions service answered with a non-success status.
    #[error("Solutions service rejected invalidation ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The solutions service could not be reached.
    #[error("Solutions service unavailable: {0}")]
    Unavailable(String),
}

/// Signals the solutions service that a schema's solutions are stale.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait SolutionsService: Send + Sync {
    /// Mark every cached solution for `schema_id` as obsolete.
    async fn mark_solution_obsolete(&self, schema_id: SchemaId) -> Result<(), SolutionsError>;
}

/// HTTP client for the external solutions service.
pub struct HttpSolutionsService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSolutionsService {
    /// Create a notifier talking to the service at `base_url`.
    pub fn new(base_url: &str, timeout_sec: u64) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SolutionsService for HttpSolutionsService {
    async fn mark_solution_obsolete(&self, schema_id: SchemaId) -> Result<(), SolutionsError> {
        let url = format!("{}/v1/solutions/{}/obsolete", self.base_url, schema_id);

        let response = self.client.post(&url).send().await.map_err(|e| {
            SolutionsError::Unavailable(format!("Failed to reach solutions service: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<empty response>".to_string());
            return Err(SolutionsError::Rejected {
                status: status.as_u16(),
                message: body.trim().to_string(),
            });
        }

        Ok(())
    }
}

/// Stub notifier for environments without a solutions service: logs the
/// invalidation and performs no network call.
#[derive(Debug, Clone, Default)]
pub struct StubSolutionsService;

impl StubSolutionsService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SolutionsService for StubSolutionsService {
    async fn mark_solution_obsolete(&self, schema_id: SchemaId) -> Result<(), SolutionsError> {
        info!("Marking solutions for schema {} as obsolete", schema_id);
        Ok(())
    }
}
