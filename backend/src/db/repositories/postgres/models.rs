use diesel::prelude::*;

use super::schema::obscore;
use crate::db::repository::{RepositoryError, RepositoryResult};
use crate::models::{DataProductType, NewObsCoreRecord, ObsCoreRecord};

/// Row shape returned by the raw search statement.
#[derive(Debug, Clone, QueryableByName)]
#[diesel(table_name = obscore)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ObsCoreRow {
    pub id: i32,
    pub dataproduct_type: String,
    pub calib_level: i32,
    pub obs_collection: String,
    pub obs_id: String,
    pub obs_publisher_did: String,
    pub access_url: Option<String>,
    pub access_format: Option<String>,
    pub access_estsize: Option<i64>,
    pub target_name: Option<String>,
    pub s_ra: Option<f64>,
    pub s_dec: Option<f64>,
    pub s_fov: Option<f64>,
    pub s_region: Option<String>,
    pub s_resolution: Option<f64>,
    pub s_xel1: Option<i64>,
    pub s_xel2: Option<i64>,
    pub t_min: Option<f64>,
    pub t_max: Option<f64>,
    pub t_exptime: Option<f64>,
    pub t_resolution: Option<f64>,
    pub t_xel: Option<i64>,
    pub em_min: Option<f64>,
    pub em_max: Option<f64>,
    pub em_res_power: Option<f64>,
    pub em_xel: Option<i64>,
    pub o_ucd: Option<String>,
    pub pol_states: Option<String>,
    pub pol_xel: Option<i64>,
    pub facility_name: Option<String>,
    pub instrument_name: Option<String>,
}

impl TryFrom<ObsCoreRow> for ObsCoreRecord {
    type Error = RepositoryError;

    fn try_from(row: ObsCoreRow) -> RepositoryResult<Self> {
        let dataproduct_type = row
            .dataproduct_type
            .parse::<DataProductType>()
            .map_err(|e| RepositoryError::validation(format!("row {}: {}", row.id, e)))?;

        Ok(ObsCoreRecord {
            id: row.id,
            dataproduct_type,
            calib_level: row.calib_level,
            obs_collection: row.obs_collection,
            obs_id: row.obs_id,
            obs_publisher_did: row.obs_publisher_did,
            access_url: row.access_url,
            access_format: row.access_format,
            access_estsize: row.access_estsize,
            target_name: row.target_name,
            s_ra: row.s_ra,
            s_dec: row.s_dec,
            s_fov: row.s_fov,
            s_region: row.s_region,
            s_resolution: row.s_resolution,
            s_xel1: row.s_xel1,
            s_xel2: row.s_xel2,
            t_min: row.t_min,
            t_max: row.t_max,
            t_exptime: row.t_exptime,
            t_resolution: row.t_resolution,
            t_xel: row.t_xel,
            em_min: row.em_min,
            em_max: row.em_max,
            em_res_power: row.em_res_power,
            em_xel: row.em_xel,
            o_ucd: row.o_ucd,
            pol_states: row.pol_states,
            pol_xel: row.pol_xel,
            facility_name: row.facility_name,
            instrument_name: row.instrument_name,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = obscore)]
pub struct NewObsCoreRow {
    pub dataproduct_type: String,
    pub calib_level: i32,
    pub obs_collection: String,
    pub obs_id: String,
    pub obs_publisher_did: String,
    pub access_url: Option<String>,
    pub access_format: Option<String>,
    pub access_estsize: Option<i64>,
    pub target_name: Option<String>,
    pub s_ra: Option<f64>,
    pub s_dec: Option<f64>,
    pub s_fov: Option<f64>,
    pub s_region: Option<String>,
    pub s_resolution: Option<f64>,
    pub s_xel1: Option<i64>,
    pub s_xel2: Option<i64>,
    pub t_min: Option<f64>,
    pub t_max: Option<f64>,
    pub t_exptime: Option<f64>,
    pub t_resolution: Option<f64>,
    pub t_xel: Option<i64>,
    pub em_min: Option<f64>,
    pub em_max: Option<f64>,
    pub em_res_power: Option<f64>,
    pub em_xel: Option<i64>,
    pub o_ucd: Option<String>,
    pub pol_states: Option<String>,
    pub pol_xel: Option<i64>,
    pub facility_name: Option<String>,
    pub instrument_name: Option<String>,
}

impl From<&NewObsCoreRecord> for NewObsCoreRow {
    fn from(r: &NewObsCoreRecord) -> Self {
        let r = r.clone();
        NewObsCoreRow {
            dataproduct_type: r.dataproduct_type.as_str().to_string(),
            calib_level: r.calib_level,
            obs_collection: r.obs_collection,
            obs_id: r.obs_id,
            obs_publisher_did: r.obs_publisher_did,
            access_url: r.access_url,
            access_format: r.access_format,
            access_estsize: r.access_estsize,
            target_name: r.target_name,
            s_ra: r.s_ra,
            s_dec: r.s_dec,
            s_fov: r.s_fov,
            s_region: r.s_region,
            s_resolution: r.s_resolution,
            s_xel1: r.s_xel1,
            s_xel2: r.s_xel2,
            t_min: r.t_min,
            t_max: r.t_max,
            t_exptime: r.t_exptime,
            t_resolution: r.t_resolution,
            t_xel: r.t_xel,
            em_min: r.em_min,
            em_max: r.em_max,
            em_res_power: r.em_res_power,
            em_xel: r.em_xel,
            o_ucd: r.o_ucd,
            pol_states: r.pol_states,
            pol_xel: r.pol_xel,
            facility_name: r.facility_name,
            instrument_name: r.instrument_name,
        }
    }
}
