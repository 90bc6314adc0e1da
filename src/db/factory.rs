//! Repository factory for dependency injection.
//!
//! Creates and configures repository instances based on runtime
//! configuration. The repository is constructed once at the application
//! root and passed down explicitly.

use std::str::FromStr;
use std::sync::Arc;

use super::repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
use super::repositories::{PostgresConfig, PostgresRepository};
use super::repository::{RepositoryError, RepositoryResult, SchemaRepository};

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// PostgreSQL (production)
    Postgres,
    /// In-memory repository for tests and local development
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from environment variables.
    ///
    /// An explicit `REPOSITORY_TYPE` wins; otherwise Postgres is selected
    /// when a database URL is present, and the local backend is the
    /// fallback.
    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var("REPOSITORY_TYPE")
            .ok()
            .and_then(|s| Self::from_str(&s).ok())
        {
            return explicit;
        }

        let has_database_url =
            std::env::var("DATABASE_URL").is_ok() || std::env::var("PG_DATABASE_URL").is_ok();
        if has_database_url {
            Self::Postgres
        } else {
            Self::Local
        }
    }
}

/// Repository factory for creating repository instances.
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// # Arguments
    /// * `repo_type` - Type of repository to create
    /// * `database_url` - Connection string (required for Postgres)
    ///
    /// # Returns
    /// * `Ok(Arc<dyn SchemaRepository>)` - Repository instance
    /// * `Err(RepositoryError)` - If creation fails
    pub fn create(
        repo_type: RepositoryType,
        database_url: Option<&str>,
    ) -> RepositoryResult<Arc<dyn SchemaRepository>> {
        match repo_type {
            RepositoryType::Postgres => Self::create_postgres(database_url),
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn SchemaRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create a PostgreSQL repository.
    ///
    /// Falls back to `PostgresConfig::from_env` when no URL is given.
    #[cfg(feature = "postgres-repo")]
    pub fn create_postgres(
        database_url: Option<&str>,
    ) -> RepositoryResult<Arc<dyn SchemaRepository>> {
        let config = match database_url {
            Some(url) if !url.is_empty() => PostgresConfig::with_url(url),
            _ => PostgresConfig::from_env().map_err(RepositoryError::configuration)?,
        };
        let repo = PostgresRepository::new(config)?;
        Ok(Arc::new(repo))
    }

    #[cfg(not(feature = "postgres-repo"))]
    pub fn create_postgres(
        _database_url: Option<&str>,
    ) -> RepositoryResult<Arc<dyn SchemaRepository>> {
        Err(RepositoryError::configuration(
            "Postgres repository requested but the postgres-repo feature is disabled",
        ))
    }

    /// Create repository from environment configuration.
    pub fn from_env() -> RepositoryResult<Arc<dyn SchemaRepository>> {
        Self::create(RepositoryType::from_env(), None)
    }
}
