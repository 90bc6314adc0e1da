//! Repository trait definition for schema persistence.
//!
//! The trait abstracts the storage backend so the service layer works
//! unchanged against the in-memory implementation and the transactional
//! Postgres implementation.

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;

use crate::api::{Schema, SchemaId, UserId};

/// Repository trait for schema storage operations.
///
/// The store is the sole source of truth for schema state and ownership;
/// callers re-read on every operation rather than caching across calls.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait SchemaRepository: Send + Sync {
    /// Check if the storage backend is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the backend is healthy
    /// - `Ok(false)` if unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Return all schemas owned by the given user.
    ///
    /// Order is unspecified (set semantics).
    async fn get_schemas(&self, user_id: UserId) -> RepositoryResult<Vec<Schema>>;

    /// Create a new empty schema for the user.
    ///
    /// The backend assigns a unique, monotonically allocated id. Two
    /// concurrent calls never receive the same id.
    ///
    /// # Returns
    /// * `Ok(Schema)` - the new schema with its assigned id, empty
    ///   workstation and cost sets, and no AMR parameters
    async fn create_schema(&self, user_id: UserId) -> RepositoryResult<Schema>;

    /// Replace the full document at `schema.id`.
    ///
    /// Last-writer-wins; there is no optimistic concurrency check.
    ///
    /// # Returns
    /// * `Ok(Schema)` - the stored document
    /// * `Err(RepositoryError::InvalidArgument)` - if `schema.id` is `None`
    /// * `Err(RepositoryError::NotFound)` - if no schema exists at that id
    async fn update_schema(&self, schema: &Schema) -> RepositoryResult<Schema>;

    /// Whether the schema at `schema_id` is owned by `user_id`.
    ///
    /// Always a point-read against the store of record; returns `Ok(false)`
    /// when the schema does not exist.
    async fn schema_belongs_to_user(
        &self,
        schema_id: SchemaId,
        user_id: UserId,
    ) -> RepositoryResult<bool>;

    /// Retrieve a schema by id.
    ///
    /// # Returns
    /// * `Ok(Schema)` - the stored document
    /// * `Err(RepositoryError::NotFound)` - if the schema doesn't exist
    async fn get_schema(&self, schema_id: SchemaId) -> RepositoryResult<Schema>;
}
