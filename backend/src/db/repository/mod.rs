//! Repository trait for ObsCore storage backends.

mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;

use crate::models::{NewObsCoreRecord, ObsCoreRecord, SiaQuery};

/// Storage of ObsCore records searchable with SIA constraints.
///
/// Implementations must agree on the filter semantics: constraint groups are
/// AND-ed, values inside a group are OR-ed, and a NULL column never matches a
/// constraint on that column. Results are ordered by record id.
#[async_trait]
pub trait ObsCoreRepository: Send + Sync {
    /// Check that the backing store answers.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Return at most `limit` records matching `query`.
    async fn search(&self, query: &SiaQuery, limit: u64) -> RepositoryResult<Vec<ObsCoreRecord>>;

    /// Insert records, returning how many were stored.
    async fn insert_records(&self, records: &[NewObsCoreRecord]) -> RepositoryResult<usize>;

    /// Total number of stored records.
    async fn count(&self) -> RepositoryResult<i64>;
}
