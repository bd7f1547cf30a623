//! `repository.toml` support.
//!
//! ```toml
//! [repository]
//! type = "postgres"
//!
//! [postgres]
//! database_url = "postgresql://postgres:password@db:5432/sia"
//! max_connections = 10
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use super::factory::RepositoryType;
use super::repository::RepositoryError;
use crate::db::PostgresConfig;

/// Repository configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub postgres: PostgresSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

/// Postgres connection settings. Missing keys take the pool defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostgresSettings {
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: u64,
    pub idle_timeout: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for PostgresSettings {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: 30,
            idle_timeout: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl FromStr for RepositoryConfig {
    type Err = RepositoryError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        content.parse()
    }

    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }

    /// Convert to [`PostgresConfig`] if this is a Postgres configuration.
    #[cfg(feature = "postgres-repo")]
    pub fn to_postgres_config(&self) -> Result<Option<PostgresConfig>, RepositoryError> {
        let repo_type = self.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        if repo_type != RepositoryType::Postgres {
            return Ok(None);
        }

        if self.postgres.database_url.is_empty() {
            return Err(RepositoryError::configuration(
                "Postgres repository requires 'postgres.database_url' setting",
            ));
        }

        Ok(Some(PostgresConfig {
            database_url: self.postgres.database_url.clone(),
            max_pool_size: self.postgres.max_connections,
            min_pool_size: self.postgres.min_connections,
            connection_timeout_sec: self.postgres.connect_timeout,
            idle_timeout_sec: self.postgres.idle_timeout,
            max_retries: self.postgres.max_retries,
            retry_delay_ms: self.postgres.retry_delay_ms,
        }))
    }

    #[cfg(not(feature = "postgres-repo"))]
    pub fn to_postgres_config(&self) -> Result<Option<PostgresConfig>, RepositoryError> {
        let repo_type = self.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        if repo_type == RepositoryType::Postgres {
            return Err(RepositoryError::configuration(
                "Postgres repository feature not enabled",
            ));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_config() {
        let config: RepositoryConfig = "[repository]\ntype = \"local\"\n".parse().unwrap();
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
        assert!(config.to_postgres_config().unwrap().is_none());
        assert_eq!(config.postgres.max_connections, 10);
    }

    #[test]
    fn test_missing_repository_table_is_error() {
        let err = "[postgres]\ndatabase_url = \"x\"\n"
            .parse::<RepositoryConfig>()
            .unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[cfg(feature = "postgres-repo")]
    #[test]
    fn test_parse_postgres_config() {
        let toml = r#"
[repository]
type = "pg"

[postgres]
database_url = "postgresql://postgres:password@db:5432/sia"
max_connections = 20
retry_delay_ms = 250
"#;

        let config: RepositoryConfig = toml.parse().unwrap();
        let pg_config = config.to_postgres_config().unwrap().unwrap();
        assert_eq!(
            pg_config.database_url,
            "postgresql://postgres:password@db:5432/sia"
        );
        assert_eq!(pg_config.max_pool_size, 20);
        assert_eq!(pg_config.min_pool_size, 1);
        assert_eq!(pg_config.retry_delay_ms, 250);
    }

    #[cfg(feature = "postgres-repo")]
    #[test]
    fn test_postgres_requires_database_url() {
        let config: RepositoryConfig = "[repository]\ntype = \"postgres\"\n".parse().unwrap();
        assert!(config.to_postgres_config().is_err());
    }
}
