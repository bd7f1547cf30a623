//! Database module for ObsCore storage.
//!
//! Storage goes through the Repository pattern so the HTTP layer does not
//! care whether records live in Postgres or in memory.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP layer (http/) and seeding binary                  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service layer (services/search.rs)                     │
//! │  - MAXREC and overflow handling                         │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  ObsCoreRepository trait (repository/)                  │
//! └───────────┬───────────────────────────────┬─────────────┘
//!             │                               │
//! ┌───────────▼─────────────┐   ┌─────────────▼─────────────┐
//! │  PostgresRepository     │   │  LocalRepository          │
//! │  Diesel + Q3C SQL       │   │  in-memory                │
//! │  (query_builder.rs)     │   │                           │
//! └─────────────────────────┘   └───────────────────────────┘
//! ```
//!
//! - `repository`: trait definition and error types
//! - `repositories::postgres`: Postgres implementation (feature `postgres-repo`)
//! - `repositories::local`: in-memory implementation
//! - `factory`: runtime backend selection
//! - `readiness`: bounded wait for the database at startup

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod query_builder;
pub mod readiness;
pub mod repo_config;
pub mod repositories;
pub mod repository;

#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::{PoolStats, PostgresConfig};
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    _private: (),
}

pub use factory::{RepositoryFactory, RepositoryType};
pub use readiness::{database_address, wait_for_tcp, ReadinessError, ReadinessPolicy};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{ErrorContext, ObsCoreRepository, RepositoryError, RepositoryResult};
