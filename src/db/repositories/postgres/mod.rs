//! Postgres repository implementation using Diesel.
//!
//! Schemas are persisted whole as JSONB documents. Ids come from a
//! single-row counter table read and advanced inside one transaction with a
//! `SELECT ... FOR UPDATE` row lock, which is what guarantees exactly-once
//! allocation under concurrent writers. Postgres has no auto-increment we
//! could use here because the allocated id must also key the document
//! written in the same transaction.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;
use tokio::task;

use crate::api::{Schema, SchemaId, UserId};
use crate::db::repository::{
    ErrorContext, RepositoryError, RepositoryResult, SchemaRepository,
};

mod models;
mod schema;

use models::{CounterRow, SchemaRow};
use schema::{schema_counter, schemas};

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations =
    embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let max_pool_size = std::env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let min_pool_size = std::env::var("PG_POOL_MIN")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1);

        let connection_timeout_sec = std::env::var("PG_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let idle_timeout_sec = std::env::var("PG_IDLE_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(600);

        Ok(Self {
            database_url,
            max_pool_size,
            min_pool_size,
            connection_timeout_sec,
            idle_timeout_sec,
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Diesel-backed repository for Postgres.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    ///
    /// # Returns
    /// * `Ok(PostgresRepository)` on success
    /// * `Err(RepositoryError)` if connection or migration fails
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self { pool })
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Execute a blocking Diesel operation on a pooled connection.
    ///
    /// Runs under `spawn_blocking` so the async executor is not stalled.
    /// Single attempt: a failed call is a failed operation, the caller
    /// decides what to do about it.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();

        task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection"),
                )
            })?;
            f(&mut conn)
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

fn decode_document(row: SchemaRow) -> RepositoryResult<Schema> {
    serde_json::from_value(row.document).map_err(|e| {
        RepositoryError::internal_with_context(
            format!("Corrupt schema document: {}", e),
            ErrorContext::new("decode_document")
                .with_entity("schema")
                .with_entity_id(row.id),
        )
    })
}

#[async_trait]
impl SchemaRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map_err(map_diesel_error)?;
            Ok(true)
        })
        .await
    }

    async fn get_schemas(&self, user_id: UserId) -> RepositoryResult<Vec<Schema>> {
        self.with_conn(move |conn| {
            let rows = schemas::table
                .filter(schemas::user_id.eq(user_id.value()))
                .select(SchemaRow::as_select())
                .load::<SchemaRow>(conn)
                .map_err(map_diesel_error)?;

            rows.into_iter().map(decode_document).collect()
        })
        .await
    }

    async fn create_schema(&self, user_id: UserId) -> RepositoryResult<Schema> {
        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                // Row lock on the counter serializes concurrent allocations.
                let current: Option<i64> = schema_counter::table
                    .select(schema_counter::next_id)
                    .for_update()
                    .first::<i64>(tx)
                    .optional()
                    .map_err(map_diesel_error)?;

                let allocated = match current {
                    Some(next_id) => {
                        diesel::update(schema_counter::table)
                            .set(schema_counter::next_id.eq(next_id + 1))
                            .execute(tx)
                            .map_err(map_diesel_error)?;
                        next_id
                    }
                    None => {
                        diesel::insert_into(schema_counter::table)
                            .values(&CounterRow {
                                singleton: true,
                                next_id: 2,
                            })
                            .execute(tx)
                            .map_err(map_diesel_error)?;
                        1
                    }
                };

                let schema = Schema::new(Some(SchemaId::new(allocated)), user_id);
                let document = serde_json::to_value(&schema).map_err(|e| {
                    RepositoryError::internal_with_context(
                        format!("Serialization error: {}", e),
                        ErrorContext::new("create_schema")
                            .with_entity("schema")
                            .with_entity_id(allocated),
                    )
                })?;

                diesel::insert_into(schemas::table)
                    .values(&SchemaRow {
                        id: allocated,
                        user_id: user_id.value(),
                        document,
                    })
                    .execute(tx)
                    .map_err(map_diesel_error)?;

                Ok(schema)
            })
        })
        .await
    }

    async fn update_schema(&self, schema: &Schema) -> RepositoryResult<Schema> {
        let id = schema.id.ok_or_else(|| {
            RepositoryError::invalid_argument("Schema id is required for update")
        })?;

        let schema = schema.clone();
        self.with_conn(move |conn| {
            let document = serde_json::to_value(&schema).map_err(|e| {
                RepositoryError::internal_with_context(
                    format!("Serialization error: {}", e),
                    ErrorContext::new("update_schema")
                        .with_entity("schema")
                        .with_entity_id(id),
                )
            })?;

            // Full-document overwrite, last-writer-wins.
            let updated = diesel::update(schemas::table.find(id.value()))
                .set((
                    schemas::user_id.eq(schema.user_id.value()),
                    schemas::document.eq(document),
                ))
                .execute(conn)
                .map_err(map_diesel_error)?;

            if updated == 0 {
                return Err(RepositoryError::not_found_with_context(
                    format!("Schema {} not found", id),
                    ErrorContext::new("update_schema")
                        .with_entity("schema")
                        .with_entity_id(id),
                ));
            }

            Ok(schema)
        })
        .await
    }

    async fn schema_belongs_to_user(
        &self,
        schema_id: SchemaId,
        user_id: UserId,
    ) -> RepositoryResult<bool> {
        self.with_conn(move |conn| {
            let owner: Option<i64> = schemas::table
                .find(schema_id.value())
                .select(schemas::user_id)
                .first::<i64>(conn)
                .optional()
                .map_err(map_diesel_error)?;

            Ok(owner == Some(user_id.value()))
        })
        .await
    }

    async fn get_schema(&self, schema_id: SchemaId) -> RepositoryResult<Schema> {
        self.with_conn(move |conn| {
            let row = schemas::table
                .find(schema_id.value())
                .select(SchemaRow::as_select())
                .first::<SchemaRow>(conn)
                .optional()
                .map_err(map_diesel_error)?
                .ok_or_else(|| {
                    RepositoryError::not_found_with_context(
                        format!("Schema {} not found", schema_id),
                        ErrorContext::new("get_schema")
                            .with_entity("schema")
                            .with_entity_id(schema_id),
                    )
                })?;

            decode_document(row)
        })
        .await
    }
}
