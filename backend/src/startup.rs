//! Server startup sequence.
//!
//! Order is fixed: database readiness gate, repository creation (which
//! applies migrations), then bind and serve. The listener never exists
//! before the repository does, so a failed gate leaves the port untouched.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::db::{
    self, ObsCoreRepository, ReadinessPolicy, RepositoryConfig, RepositoryFactory,
    RepositoryType,
};
use crate::http::{create_router, AppState};

/// Where the repository settings come from.
#[derive(Debug, Clone)]
pub enum RepositorySource {
    Env,
    File(RepositoryConfig),
}

impl RepositorySource {
    /// A `repository.toml` named by `REPOSITORY_CONFIG`, or the environment.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var("REPOSITORY_CONFIG") {
            Ok(path) => Ok(Self::File(RepositoryConfig::from_file(&path)?)),
            Err(_) => Ok(Self::Env),
        }
    }

    pub fn repository_type(&self) -> anyhow::Result<RepositoryType> {
        match self {
            Self::Env => Ok(RepositoryType::from_env()?),
            Self::File(config) => config.repository_type().map_err(anyhow::Error::msg),
        }
    }

    pub fn database_url(&self) -> anyhow::Result<String> {
        match self {
            Self::Env => std::env::var("DATABASE_URL")
                .or_else(|_| std::env::var("PG_DATABASE_URL"))
                .context("DATABASE_URL or PG_DATABASE_URL must be set"),
            Self::File(config) => Ok(config.postgres.database_url.clone()),
        }
    }

    pub async fn create(&self) -> anyhow::Result<Arc<dyn ObsCoreRepository>> {
        let repository = match self {
            Self::Env => RepositoryFactory::from_env().await?,
            Self::File(config) => RepositoryFactory::from_repository_config(config).await?,
        };
        Ok(repository)
    }
}

/// Block until the database host accepts TCP connections, or fail.
///
/// Returns the number of probes it took.
pub async fn wait_for_database(
    database_url: &str,
    policy: &ReadinessPolicy,
    shutdown: &CancellationToken,
) -> anyhow::Result<u32> {
    let (host, port) = db::database_address(database_url)?;
    info!(%host, port, "waiting for database");
    let attempts = db::wait_for_tcp(&host, port, policy, shutdown).await?;
    info!(attempts, "database reachable");
    Ok(attempts)
}

/// Run the service until `shutdown` is cancelled.
///
/// An exhausted or cancelled readiness gate and a failed repository
/// creation are returned as errors before anything is bound to `addr`.
pub async fn run(
    source: &RepositorySource,
    addr: SocketAddr,
    policy: &ReadinessPolicy,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let repo_type = source.repository_type()?;
    if repo_type == RepositoryType::Postgres {
        wait_for_database(&source.database_url()?, policy, &shutdown).await?;
    }

    let repository = source
        .create()
        .await
        .context("failed to initialise repository")?;
    let records = repository.count().await.unwrap_or(-1);
    info!(?repo_type, records, "repository ready");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, create_router(AppState::new(repository)))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("Server stopped");
    Ok(())
}
