//! Implementations of [`crate::db::ObsCoreRepository`]:
//! - `postgres`: PostgreSQL + Q3C through Diesel
//! - `local`: in-memory store for tests and local development
pub mod local;
#[cfg(feature = "postgres-repo")]
pub mod postgres;

pub use local::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use postgres::{PoolStats, PostgresConfig, PostgresRepository};
