//! Random ObsCore records for development databases.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::models::{DataProductType, NewObsCoreRecord, PolarizationState};

pub const FAKE_FORMATS: [&str; 6] = [
    "image/fits",
    "image/jpeg",
    "application/fits",
    "application/x+votable+xml",
    "text/csv",
    "image/x-fits-gzip",
];

pub const FAKE_FACILITIES: [&str; 10] = [
    "HST", "JWST", "Chandra", "Spitzer", "VLA", "ALMA", "Fermi", "LSST", "Euclid", "SKA",
];

pub const FAKE_INSTRUMENTS: [&str; 10] = [
    "WFC3",
    "MIRI",
    "ACIS",
    "IRAC",
    "ACS",
    "SPITZER-IRAC",
    "VLA-CASA",
    "ALMA-ACA",
    "Fermi-LAT",
    "LSST-Camera",
];

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn pick<'a, R: Rng>(rng: &mut R, values: &[&'a str]) -> &'a str {
    values.choose(rng).copied().unwrap_or_default()
}

/// Generate one plausible ObsCore row.
///
/// The collection is `FACILITY/INSTRUMENT`; times are MJD in 50000..60000
/// and identifiers derive from `rng`, so a seeded generator is reproducible.
pub fn generate_fake_record<R: Rng>(rng: &mut R) -> NewObsCoreRecord {
    let dataproduct_type = DataProductType::ALL
        .choose(rng)
        .copied()
        .unwrap_or(DataProductType::Image);
    let calib_level = rng.gen_range(1..=3);

    let facility = pick(rng, &FAKE_FACILITIES);
    let instrument = pick(rng, &FAKE_INSTRUMENTS);
    let obs_id = Uuid::from_bytes(rng.gen()).to_string();
    let host = facility.to_lowercase();

    let s_ra = rng.gen_range(0.0..=360.0);
    let s_dec = rng.gen_range(-90.0..=90.0);
    let s_fov = round_to(rng.gen_range(0.1..=5.0), 3);

    let t_min = rng.gen_range(50_000.0..=60_000.0);
    let t_max = t_min + rng.gen_range(0.0..=100.0);

    let em_min = round_to(rng.gen_range(0.1..=500.0), 3);
    let em_max = em_min + round_to(rng.gen_range(0.1..=100.0), 3);

    let pol_count = rng.gen_range(1..=5);
    let pol_states: Vec<PolarizationState> = PolarizationState::ALL
        .choose_multiple(rng, pol_count)
        .copied()
        .collect();

    NewObsCoreRecord {
        dataproduct_type,
        calib_level,
        obs_collection: format!("{facility}/{instrument}"),
        obs_publisher_did: format!("ivo://{host}/{obs_id}"),
        access_url: Some(format!("https://data.{host}.org/{obs_id}")),
        obs_id,
        access_format: Some(pick(rng, &FAKE_FORMATS).to_string()),
        access_estsize: Some(rng.gen_range(1_000..=100_000)),
        target_name: Some(format!("Target-{}", rng.gen_range(1..=1000))),
        s_ra: Some(s_ra),
        s_dec: Some(s_dec),
        s_fov: Some(s_fov),
        s_region: Some(format!("CIRCLE {} {} {}", s_ra, s_dec, s_fov / 2.0)),
        s_resolution: Some(round_to(rng.gen_range(0.1..=10.0), 3)),
        s_xel1: Some(1),
        s_xel2: Some(1),
        t_min: Some(t_min),
        t_max: Some(t_max),
        t_exptime: Some(round_to(rng.gen_range(1.0..=3600.0), 2)),
        t_resolution: Some(round_to(rng.gen_range(0.1..=10.0), 2)),
        t_xel: Some(1),
        em_min: Some(em_min),
        em_max: Some(em_max),
        em_res_power: Some(rng.gen_range(1..=1000) as f64),
        em_xel: Some(1),
        o_ucd: Some("phot.mag;em.opt".to_string()),
        pol_xel: Some(pol_states.len() as i64),
        pol_states: PolarizationState::encode_list(&pol_states),
        facility_name: Some(facility.to_string()),
        instrument_name: Some(instrument.to_string()),
    }
}

/// Generate `count` records from a generator seeded with `seed`.
pub fn generate_fake_records(count: usize, seed: u64) -> Vec<NewObsCoreRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| generate_fake_record(&mut rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_records() {
        assert_eq!(generate_fake_records(5, 42), generate_fake_records(5, 42));
        assert_ne!(generate_fake_records(5, 42), generate_fake_records(5, 43));
    }

    #[test]
    fn test_values_in_documented_ranges() {
        for record in generate_fake_records(200, 1) {
            let ra = record.s_ra.unwrap();
            let dec = record.s_dec.unwrap();
            assert!((0.0..=360.0).contains(&ra));
            assert!((-90.0..=90.0).contains(&dec));
            assert!((1..=3).contains(&record.calib_level));

            let (t_min, t_max) = (record.t_min.unwrap(), record.t_max.unwrap());
            assert!((50_000.0..=60_000.0).contains(&t_min));
            assert!(t_max >= t_min && t_max <= t_min + 100.0);
            assert!(record.em_max.unwrap() > record.em_min.unwrap());

            let facility = record.facility_name.as_deref().unwrap();
            let instrument = record.instrument_name.as_deref().unwrap();
            assert!(FAKE_FACILITIES.contains(&facility));
            assert_eq!(record.obs_collection, format!("{facility}/{instrument}"));
            assert!(record
                .obs_publisher_did
                .ends_with(&format!("/{}", record.obs_id)));

            let pols = record.pol_states.as_deref().unwrap();
            assert!(pols.starts_with('/') && pols.ends_with('/'));
            assert_eq!(record.pol_xel, Some(pols.matches('/').count() as i64 - 1));
        }
    }
}
