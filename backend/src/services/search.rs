//! SIA search orchestration over any [`ObsCoreRepository`].

use serde::Serialize;

use crate::db::{ObsCoreRepository, RepositoryResult};
use crate::models::{ObsCoreRecord, SiaQuery};

/// Records returned for a query, and whether MAXREC truncated them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResult {
    pub records: Vec<ObsCoreRecord>,
    pub overflow: bool,
}

/// Run `query` against `repo`, honouring MAXREC.
///
/// One extra row is requested so truncation can be reported as
/// `QUERY_STATUS=OVERFLOW`. `MAXREC=0` skips the database entirely.
pub async fn perform_sia_query(
    repo: &dyn ObsCoreRepository,
    query: &SiaQuery,
) -> RepositoryResult<SearchResult> {
    if query.maxrec == 0 {
        return Ok(SearchResult::default());
    }

    let mut records = repo.search(query, query.maxrec.saturating_add(1)).await?;
    let maxrec = usize::try_from(query.maxrec).unwrap_or(usize::MAX);
    let overflow = records.len() > maxrec;
    records.truncate(maxrec);

    tracing::debug!(returned = records.len(), overflow, "sia query complete");
    Ok(SearchResult { records, overflow })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::LocalRepository;
    use crate::services::fake_data::generate_fake_records;

    fn repo_with(n: usize) -> LocalRepository {
        LocalRepository::with_records(generate_fake_records(n, 7))
    }

    #[tokio::test]
    async fn test_overflow_when_more_rows_than_maxrec() {
        let repo = repo_with(10);
        let query = SiaQuery {
            maxrec: 3,
            ..Default::default()
        };
        let result = perform_sia_query(&repo, &query).await.unwrap();
        assert_eq!(result.records.len(), 3);
        assert!(result.overflow);
        let ids: Vec<i32> = result.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_no_overflow_when_exactly_maxrec() {
        let repo = repo_with(4);
        let query = SiaQuery {
            maxrec: 4,
            ..Default::default()
        };
        let result = perform_sia_query(&repo, &query).await.unwrap();
        assert_eq!(result.records.len(), 4);
        assert!(!result.overflow);
    }

    #[tokio::test]
    async fn test_maxrec_zero_returns_nothing() {
        let repo = repo_with(4);
        let query = SiaQuery {
            maxrec: 0,
            ..Default::default()
        };
        let result = perform_sia_query(&repo, &query).await.unwrap();
        assert!(result.records.is_empty());
        assert!(!result.overflow);
    }
}
