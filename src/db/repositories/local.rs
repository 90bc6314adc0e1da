//! In-memory local repository implementation.
//!
//! Stores all schemas in a `HashMap` behind an `RwLock`, providing fast,
//! deterministic, and isolated execution for unit tests and local
//! development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::api::{Schema, SchemaId, UserId};
use crate::db::repository::{
    ErrorContext, RepositoryError, RepositoryResult, SchemaRepository,
};

/// In-memory schema repository.
///
/// Ids are self-assigned from a monotonic counter, mirroring the Postgres
/// backend's allocation semantics.
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    schemas: HashMap<i64, Schema>,
    next_schema_id: i64,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            schemas: HashMap::new(),
            next_schema_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Force subsequent health checks to report the given state.
    ///
    /// Test helper for exercising degraded-backend paths.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().unwrap().is_healthy = healthy;
    }

    /// Number of stored schemas. Test helper.
    pub fn len(&self) -> usize {
        self.data.read().unwrap().schemas.len()
    }

    /// Whether the repository holds no schemas. Test helper.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SchemaRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().unwrap().is_healthy)
    }

    async fn get_schemas(&self, user_id: UserId) -> RepositoryResult<Vec<Schema>> {
        let data = self.data.read().unwrap();
        Ok(data
            .schemas
            .values()
            .filter(|schema| schema.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_schema(&self, user_id: UserId) -> RepositoryResult<Schema> {
        let mut data = self.data.write().unwrap();
        let allocated = data.next_schema_id;
        data.next_schema_id += 1;

        let schema = Schema::new(Some(SchemaId::new(allocated)), user_id);
        data.schemas.insert(allocated, schema.clone());
        Ok(schema)
    }

    async fn update_schema(&self, schema: &Schema) -> RepositoryResult<Schema> {
        let id = schema.id.ok_or_else(|| {
            RepositoryError::invalid_argument("Schema id is required for update")
        })?;

        let mut data = self.data.write().unwrap();
        if !data.schemas.contains_key(&id.value()) {
            return Err(RepositoryError::not_found_with_context(
                format!("Schema {} not found", id),
                ErrorContext::new("update_schema")
                    .with_entity("schema")
                    .with_entity_id(id),
            ));
        }

        data.schemas.insert(id.value(), schema.clone());
        Ok(schema.clone())
    }

    async fn schema_belongs_to_user(
        &self,
        schema_id: SchemaId,
        user_id: UserId,
    ) -> RepositoryResult<bool> {
        let data = self.data.read().unwrap();
        Ok(data
            .schemas
            .get(&schema_id.value())
            .is_some_and(|schema| schema.user_id == user_id))
    }

    async fn get_schema(&self, schema_id: SchemaId) -> RepositoryResult<Schema> {
        let data = self.data.read().unwrap();
        data.schemas.get(&schema_id.value()).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Schema {} not found", schema_id),
                ErrorContext::new("get_schema")
                    .with_entity("schema")
                    .with_entity_id(schema_id),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let repo = LocalRepository::new();
        let first = repo.create_schema(UserId::new(1)).await.unwrap();
        let second = repo.create_schema(UserId::new(1)).await.unwrap();

        assert_eq!(first.id, Some(SchemaId::new(1)));
        assert_eq!(second.id, Some(SchemaId::new(2)));
    }

    #[tokio::test]
    async fn update_without_id_is_invalid() {
        let repo = LocalRepository::new();
        let schema = Schema::new(None, UserId::new(1));
        let err = repo.update_schema(&schema).await.unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn update_missing_schema_is_not_found() {
        let repo = LocalRepository::new();
        let schema = Schema::new(Some(SchemaId::new(99)), UserId::new(1));
        let err = repo.update_schema(&schema).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn ownership_check_is_false_for_missing_schema() {
        let repo = LocalRepository::new();
        let owned = repo
            .schema_belongs_to_user(SchemaId::new(1), UserId::new(1))
            .await
            .unwrap();
        assert!(!owned);
    }
}
