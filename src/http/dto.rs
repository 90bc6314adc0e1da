//! Data Transfer Objects for the HTTP API.
//!
//! The schema document itself serializes directly, so most endpoints reuse
//! the model types; only the list and health responses need wrappers.

use serde::{Deserialize, Serialize};

pub use crate::api::{AmrParameters, Schema, SchemaId, TransportationCost, UserId, WorkStation};

/// Response for the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// API version
    pub version: String,
    /// Storage backend status
    pub database: String,
}

/// Response for schema listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaListResponse {
    /// Schemas owned by the caller
    pub schemas: Vec<Schema>,
    /// Total count
    pub total: usize,
}
