#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use sia_rust::models::{DataProductType, NewObsCoreRecord, PolarizationState};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Variables are restored on drop (also on unwind), and a process-wide lock
/// keeps parallel tests from seeing each other's changes.
///
/// `Some(v)` sets a variable, `None` removes it.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::apply(changes);
    f()
}

struct ScopedEnv {
    saved: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn apply(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let saved = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { saved }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.saved.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// A fully populated image record at (`ra`, `dec`).
pub fn record_at(obs_id: &str, ra: f64, dec: f64) -> NewObsCoreRecord {
    NewObsCoreRecord {
        dataproduct_type: DataProductType::Image,
        calib_level: 2,
        obs_collection: "HST/WFC3".to_string(),
        obs_id: obs_id.to_string(),
        obs_publisher_did: format!("ivo://hst/{obs_id}"),
        access_url: Some(format!("https://data.hst.org/{obs_id}")),
        access_format: Some("image/fits".to_string()),
        access_estsize: Some(2048),
        target_name: Some("M31".to_string()),
        s_ra: Some(ra),
        s_dec: Some(dec),
        s_fov: Some(0.5),
        s_region: Some(format!("CIRCLE {ra} {dec} 0.25")),
        s_resolution: Some(0.1),
        s_xel1: Some(1),
        s_xel2: Some(1),
        t_min: Some(59000.0),
        t_max: Some(59001.0),
        t_exptime: Some(600.0),
        t_resolution: Some(1.0),
        t_xel: Some(1),
        em_min: Some(5.0e-7),
        em_max: Some(6.0e-7),
        em_res_power: Some(100.0),
        em_xel: Some(1),
        o_ucd: Some("phot.mag;em.opt".to_string()),
        pol_states: PolarizationState::encode_list(&[PolarizationState::I, PolarizationState::Q]),
        pol_xel: Some(2),
        facility_name: Some("HST".to_string()),
        instrument_name: Some("WFC3".to_string()),
    }
}
