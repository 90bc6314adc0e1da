//! Schema service: authentication, ownership authorization, persistence,
//! and staleness notification.
//!
//! Each call is stateless and self-contained. The service composes the
//! authentication gateway, the schema repository, and the solutions
//! notifier; it never caches schema state across calls — every operation
//! re-reads from the store of record.

use log::warn;
use std::sync::Arc;

use crate::api::{Schema, SchemaId};
use crate::auth::{AuthenticationService, AuthError};
use crate::db::repository::{RepositoryError, SchemaRepository};
use crate::solutions::{SolutionsError, SolutionsService};

/// Error type for schema service operations.
///
/// Collaborator errors propagate unmodified; there is no local recovery or
/// retry anywhere in this layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Malformed or missing required input.
    #[error("{0}")]
    InvalidArgument(String),

    /// The authenticated user does not own the target schema.
    #[error("{0}")]
    Forbidden(String),

    /// Token resolution failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The storage backend failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The staleness notification failed.
    #[error(transparent)]
    Solutions(#[from] SolutionsError),
}

/// Orchestrates schema CRUD with ownership authorization.
pub struct SchemaService {
    repository: Arc<dyn SchemaRepository>,
    auth: Arc<dyn AuthenticationService>,
    solutions: Arc<dyn SolutionsService>,
}

impl SchemaService {
    pub fn new(
        repository: Arc<dyn SchemaRepository>,
        auth: Arc<dyn AuthenticationService>,
        solutions: Arc<dyn SolutionsService>,
    ) -> Self {
        Self {
            repository,
            auth,
            solutions,
        }
    }

    /// All schemas owned by the token's user.
    pub async fn list_schemas(&self, token: &str) -> Result<Vec<Schema>, ServiceError> {
        let user_id = self.auth.resolve_user(token).await?;
        Ok(self.repository.get_schemas(user_id).await?)
    }

    /// Create a new empty schema owned by the token's user.
    ///
    /// The store assigns the id.
    pub async fn create_schema(&self, token: &str) -> Result<Schema, ServiceError> {
        let user_id = self.auth.resolve_user(token).await?;
        Ok(self.repository.create_schema(user_id).await?)
    }

    /// Replace the full document at `schema.id` and notify the solutions
    /// service that cached solutions for it are stale.
    ///
    /// The ownership check runs before any mutation, so a non-owner cannot
    /// overwrite another user's schema even knowing its id. The inbound
    /// document's `user_id` is never trusted: it is stamped with the
    /// authenticated user after the check.
    ///
    /// A notifier failure propagates even though the document is already
    /// durably persisted at that point; the two steps are not atomic.
    pub async fn update_schema(
        &self,
        mut schema: Schema,
        token: &str,
    ) -> Result<Schema, ServiceError> {
        let user_id = self.auth.resolve_user(token).await?;
        let schema_id = schema.id.ok_or_else(|| {
            ServiceError::InvalidArgument("Schema id is required for update".to_string())
        })?;

        if !self
            .repository
            .schema_belongs_to_user(schema_id, user_id)
            .await?
        {
            return Err(ServiceError::Forbidden(
                "Unauthorized to update this schema".to_string(),
            ));
        }

        schema.user_id = user_id;
        let updated = self.repository.update_schema(&schema).await?;

        if let Err(e) = self.solutions.mark_solution_obsolete(schema_id).await {
            warn!(
                "Schema {} was updated but the staleness notification failed: {}",
                schema_id, e
            );
            return Err(e.into());
        }

        Ok(updated)
    }

    /// Fetch a schema by id; only its owner may read it.
    pub async fn get_schema(
        &self,
        schema_id: SchemaId,
        token: &str,
    ) -> Result<Schema, ServiceError> {
        let user_id = self.auth.resolve_user(token).await?;

        if !self
            .repository
            .schema_belongs_to_user(schema_id, user_id)
            .await?
        {
            return Err(ServiceError::Forbidden(
                "Unauthorized to access this schema".to_string(),
            ));
        }

        Ok(self.repository.get_schema(schema_id).await?)
    }

    /// Backend health, surfaced through the service for the health
    /// endpoint.
    pub async fn health_check(&self) -> Result<bool, ServiceError> {
        Ok(self.repository.health_check().await?)
    }
}
