//! In-memory repository for tests and local development.
//!
//! Evaluates SIA constraints in process with the same semantics as the SQL
//! generated by [`crate::db::query_builder`].

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::db::repository::{ObsCoreRepository, RepositoryResult};
use crate::models::{Interval, NewObsCoreRecord, ObsCoreRecord, SiaQuery};

#[derive(Debug, Default)]
struct Store {
    records: Vec<ObsCoreRecord>,
    next_id: i32,
}

/// Thread-safe in-memory ObsCore table.
#[derive(Debug, Default)]
pub struct LocalRepository {
    store: RwLock<Store>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with `records`.
    pub fn with_records(records: Vec<NewObsCoreRecord>) -> Self {
        let repo = Self::new();
        repo.insert_sync(records);
        repo
    }

    fn insert_sync(&self, records: Vec<NewObsCoreRecord>) -> usize {
        let mut store = self.store.write();
        let count = records.len();
        for record in records {
            store.next_id += 1;
            let id = store.next_id;
            store.records.push(record.with_id(id));
        }
        count
    }
}

fn any_or_empty<T>(values: &[T], pred: impl Fn(&T) -> bool) -> bool {
    values.is_empty() || values.iter().any(pred)
}

fn in_intervals(intervals: &[Interval], value: Option<f64>) -> bool {
    any_or_empty(intervals, |i| value.is_some_and(|v| i.contains(v)))
}

fn text_matches(values: &[String], column: Option<&str>) -> bool {
    any_or_empty(values, |v| column == Some(v.as_str()))
}

/// Whether `record` satisfies every constraint group of `query`.
pub fn record_matches(record: &ObsCoreRecord, query: &SiaQuery) -> bool {
    let position = match (record.s_ra, record.s_dec) {
        (Some(ra), Some(dec)) => Some((ra, dec)),
        _ => None,
    };

    any_or_empty(&query.pos, |shape| {
        position.is_some_and(|(ra, dec)| shape.contains(ra, dec))
    }) && in_intervals(&query.band, record.em_min)
        && any_or_empty(&query.time, |t| t.overlaps(record.t_min, record.t_max))
        && in_intervals(&query.fov, record.s_fov)
        && in_intervals(&query.spatres, record.s_resolution)
        && in_intervals(&query.specrp, record.em_res_power)
        && in_intervals(&query.exptime, record.t_exptime)
        && in_intervals(&query.timeres, record.t_resolution)
        && any_or_empty(&query.pol, |p| {
            record
                .pol_states
                .as_deref()
                .is_some_and(|encoded| p.is_listed_in(encoded))
        })
        && text_matches(&query.id, Some(record.obs_id.as_str()))
        && text_matches(&query.collection, Some(record.obs_collection.as_str()))
        && text_matches(&query.facility, record.facility_name.as_deref())
        && text_matches(&query.instrument, record.instrument_name.as_deref())
        && any_or_empty(&query.dptype, |t| *t == record.dataproduct_type)
        && any_or_empty(&query.calib, |c| c.value() == record.calib_level)
        && text_matches(&query.target, record.target_name.as_deref())
        && text_matches(&query.format, record.access_format.as_deref())
}

#[async_trait]
impl ObsCoreRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }

    async fn search(&self, query: &SiaQuery, limit: u64) -> RepositoryResult<Vec<ObsCoreRecord>> {
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        let store = self.store.read();
        // Records are appended with increasing ids, so insertion order is id order.
        Ok(store
            .records
            .iter()
            .filter(|r| record_matches(r, query))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn insert_records(&self, records: &[NewObsCoreRecord]) -> RepositoryResult<usize> {
        Ok(self.insert_sync(records.to_vec()))
    }

    async fn count(&self) -> RepositoryResult<i64> {
        Ok(self.store.read().records.len() as i64)
    }
}
