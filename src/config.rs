//! Application configuration.
//!
//! Settings are read from a `schemas.toml` file with environment variables
//! taking precedence, so deployments can override any file-provided value
//! without editing it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::db::factory::RepositoryType;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub repository: RepositorySettings,
    #[serde(default)]
    pub postgres: PostgresSettings,
    #[serde(default)]
    pub auth: EndpointSettings,
    #[serde(default)]
    pub solutions: EndpointSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

/// Repository backend selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositorySettings {
    /// "postgres" or "local"; empty defers to environment detection
    #[serde(rename = "type", default)]
    pub repo_type: String,
}

/// Postgres connection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostgresSettings {
    #[serde(default)]
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Connection settings for an external HTTP service.
///
/// An empty `base_url` means the stub implementation is wired instead of a
/// real client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointSettings {
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_endpoint_timeout")]
    pub timeout_sec: u64,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_sec: default_endpoint_timeout(),
        }
    }
}

/// HTTP server bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_endpoint_timeout() -> u64 {
    10
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Returns
    /// * `Ok(AppConfig)` if successful
    /// * `Err(String)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Load configuration from the default locations, then apply
    /// environment overrides.
    ///
    /// Searches for `schemas.toml` in the current directory, then the
    /// parent directory. A missing file is not an error; defaults apply.
    pub fn load() -> Result<Self, String> {
        let mut config = match Self::default_path() {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn default_path() -> Option<PathBuf> {
        ["schemas.toml", "../schemas.toml"]
            .iter()
            .map(PathBuf::from)
            .find(|p| p.is_file())
    }

    /// Environment variables win over file-provided values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(repo_type) = std::env::var("REPOSITORY_TYPE") {
            self.repository.repo_type = repo_type;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.postgres.database_url = url;
        }
        if let Ok(url) = std::env::var("AUTH_SERVICE_URL") {
            self.auth.base_url = url;
        }
        if let Ok(url) = std::env::var("SOLUTIONS_SERVICE_URL") {
            self.solutions.base_url = url;
        }
        if let Ok(host) = std::env::var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    /// Resolve the configured repository type.
    ///
    /// An explicit `[repository] type` wins; otherwise detection falls
    /// back to the environment (database URL present → postgres).
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        if self.repository.repo_type.is_empty() {
            return Ok(RepositoryType::from_env());
        }
        RepositoryType::from_str(&self.repository.repo_type)
    }

    /// Database URL, if one is configured.
    pub fn database_url(&self) -> Option<&str> {
        if self.postgres.database_url.is_empty() {
            None
        } else {
            Some(&self.postgres.database_url)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_sensible() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.postgres.max_connections, 10);
        assert!(config.auth.base_url.is_empty());
    }

    #[test]
    fn parses_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[repository]
type = "postgres"

[postgres]
database_url = "postgres://localhost/schemas"
max_connections = 4

[auth]
base_url = "http://auth.internal:9000"
timeout_sec = 5

[solutions]
base_url = "http://solutions.internal:9100"

[server]
host = "127.0.0.1"
port = 9999
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.repository.repo_type, "postgres");
        assert_eq!(config.postgres.database_url, "postgres://localhost/schemas");
        assert_eq!(config.postgres.max_connections, 4);
        assert_eq!(config.auth.base_url, "http://auth.internal:9000");
        assert_eq!(config.auth.timeout_sec, 5);
        // Unset fields fall back to their defaults
        assert_eq!(config.solutions.timeout_sec, 10);
        assert_eq!(config.server.port, 9999);
    }

    #[test]
    fn partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[repository]\ntype = \"local\"\n").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.repository.repo_type, "local");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn rejects_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not toml at all [[[").unwrap();

        assert!(AppConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn explicit_repository_type_wins() {
        let config = AppConfig {
            repository: RepositorySettings {
                repo_type: "local".to_string(),
            },
            ..Default::default()
        };
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
    }

    #[test]
    fn unknown_repository_type_is_an_error() {
        let config = AppConfig {
            repository: RepositorySettings {
                repo_type: "cloud".to_string(),
            },
            ..Default::default()
        };
        assert!(config.repository_type().is_err());
    }
}
