//! Postgres + Q3C repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry with exponential backoff for transient failures
//! - Embedded schema migrations, applied once when the repository is created
//! - Spatial search through the Q3C extension
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::query_builder::BoxedSqlQuery;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_types::{Array, BigInt, Double, Integer, Text};
use diesel::{sql_query, QueryableByName};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task;

use crate::db::query_builder::{build_search_sql, SqlValue};
use crate::db::repository::{ErrorContext, ObsCoreRepository, RepositoryError, RepositoryResult};
use crate::models::{NewObsCoreRecord, ObsCoreRecord, SiaQuery};

mod models;
mod schema;

use models::{NewObsCoreRow, ObsCoreRow};
use schema::obscore;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Rows per INSERT statement; keeps well under Postgres' 65535 bind limit.
const INSERT_CHUNK_SIZE: usize = 1000;

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

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
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables (see module docs).
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
            max_retries: env_or("PG_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("PG_RETRY_DELAY_MS", defaults.retry_delay_ms),
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

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    pub connections_in_use: u32,
    pub idle_connections: u32,
    pub max_size: u32,
    pub total_queries: u64,
    pub failed_queries: u64,
    pub retried_operations: u64,
}

/// Diesel-backed ObsCore repository.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    total_queries: Arc<AtomicU64>,
    failed_queries: Arc<AtomicU64>,
    retried_operations: Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Build the pool and apply pending migrations.
    ///
    /// Migrations run exactly once here; a failure aborts construction so the
    /// server never starts against an out-of-date schema.
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

        Ok(Self {
            pool,
            config,
            total_queries: Arc::new(AtomicU64::new(0)),
            failed_queries: Arc::new(AtomicU64::new(0)),
            retried_operations: Arc::new(AtomicU64::new(0)),
        })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| RepositoryError::migration(e.to_string()))?;
        for version in &applied {
            tracing::info!(%version, "applied migration");
        }
        Ok(())
    }

    /// Run `f` on a pooled connection, retrying retryable failures with
    /// exponential backoff.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: Fn(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();
        let retried_operations = self.retried_operations.clone();

        task::spawn_blocking(move || {
            let mut retry_delay = Duration::from_millis(retry_delay_ms);
            let mut attempt = 0;

            loop {
                let result = pool
                    .get()
                    .map_err(|e| {
                        RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1)),
                        )
                    })
                    .and_then(|mut conn| {
                        total_queries.fetch_add(1, Ordering::Relaxed);
                        f(&mut conn)
                    });

                match result {
                    Ok(value) => return Ok(value),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        tracing::warn!(error = %e, attempt, "retrying database operation");
                        retried_operations.fetch_add(1, Ordering::Relaxed);
                        std::thread::sleep(retry_delay);
                        retry_delay *= 2;
                        attempt += 1;
                    }
                    Err(e) => {
                        failed_queries.fetch_add(1, Ordering::Relaxed);
                        return Err(e);
                    }
                }
            }
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }

    /// Current pool state and query counters.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
            retried_operations: self.retried_operations.load(Ordering::Relaxed),
        }
    }
}

fn bind_all<'f>(
    mut query: BoxedSqlQuery<'f, Pg, diesel::query_builder::SqlQuery>,
    binds: Vec<SqlValue>,
) -> BoxedSqlQuery<'f, Pg, diesel::query_builder::SqlQuery> {
    for value in binds {
        query = match value {
            SqlValue::Double(v) => query.bind::<Double, _>(v),
            SqlValue::DoubleArray(v) => query.bind::<Array<Double>, _>(v),
            SqlValue::Integer(v) => query.bind::<Integer, _>(v),
            SqlValue::BigInt(v) => query.bind::<BigInt, _>(v),
            SqlValue::Text(v) => query.bind::<Text, _>(v),
        };
    }
    query
}

#[derive(QueryableByName)]
struct OneRow {
    #[diesel(sql_type = Integer)]
    #[allow(dead_code)]
    ok: i32,
}

#[async_trait]
impl ObsCoreRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1 AS ok")
                .load::<OneRow>(conn)
                .map(|rows| rows.len() == 1)
                .map_err(RepositoryError::from)
        })
        .await
    }

    async fn search(&self, query: &SiaQuery, limit: u64) -> RepositoryResult<Vec<ObsCoreRecord>> {
        let search = build_search_sql(query, limit);
        tracing::debug!(sql = %search.sql, binds = search.binds.len(), "obscore search");

        let rows = self
            .with_conn(move |conn| {
                let statement = bind_all(
                    sql_query(search.sql.clone()).into_boxed::<Pg>(),
                    search.binds.clone(),
                );
                statement
                    .load::<ObsCoreRow>(conn)
                    .map_err(|e| RepositoryError::from(e).with_operation("search"))
            })
            .await?;

        rows.into_iter().map(ObsCoreRecord::try_from).collect()
    }

    async fn insert_records(&self, records: &[NewObsCoreRecord]) -> RepositoryResult<usize> {
        let rows: Vec<NewObsCoreRow> = records.iter().map(NewObsCoreRow::from).collect();
        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                let mut inserted = 0;
                for chunk in rows.chunks(INSERT_CHUNK_SIZE) {
                    inserted += diesel::insert_into(obscore::table)
                        .values(chunk)
                        .execute(tx)?;
                }
                Ok::<_, diesel::result::Error>(inserted)
            })
            .map_err(|e| RepositoryError::from(e).with_operation("insert_records"))
        })
        .await
    }

    async fn count(&self) -> RepositoryResult<i64> {
        self.with_conn(|conn| {
            obscore::table
                .count()
                .get_result::<i64>(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("count"))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_with_url_keeps_defaults() {
        let config = PostgresConfig::with_url("postgres://u:p@localhost:5432/sia");
        assert_eq!(config.database_url, "postgres://u:p@localhost:5432/sia");
        assert_eq!(config.max_pool_size, 10);
        assert_eq!(config.max_retries, 3);
    }
}
