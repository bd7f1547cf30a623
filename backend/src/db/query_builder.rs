//! Translation of an [`SiaQuery`] into parameterised Postgres SQL.
//!
//! Spatial constraints use the Q3C extension functions, so the `obscore`
//! table is expected to carry a `q3c_ang2ipix(s_ra, s_dec)` index. No value is
//! ever interpolated into the SQL text; every constraint value is a `$n` bind.

use crate::models::{Interval, Shape, SiaQuery, TimeInterval, OBSCORE_COLUMNS};

/// Name of the ObsCore table.
pub const OBSCORE_TABLE: &str = "obscore";

/// A typed bind parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Double(f64),
    DoubleArray(Vec<f64>),
    Integer(i32),
    BigInt(i64),
    Text(String),
}

/// SQL text plus its binds in `$1..$n` order.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlSearch {
    pub sql: String,
    pub binds: Vec<SqlValue>,
}

#[derive(Default)]
struct Builder {
    binds: Vec<SqlValue>,
    groups: Vec<String>,
}

impl Builder {
    fn bind(&mut self, value: SqlValue) -> String {
        self.binds.push(value);
        format!("${}", self.binds.len())
    }

    /// Add one AND-ed group whose members are OR-ed together.
    fn group<T>(&mut self, values: &[T], mut predicate: impl FnMut(&mut Self, &T) -> String) {
        if values.is_empty() {
            return;
        }
        let clauses: Vec<String> = values.iter().map(|v| predicate(self, v)).collect();
        self.groups.push(format!("({})", clauses.join(" OR ")));
    }

    fn intervals(&mut self, column: &str, intervals: &[Interval]) {
        self.group(intervals, |b, interval| {
            let min = b.bind(SqlValue::Double(interval.min));
            let max = b.bind(SqlValue::Double(interval.max));
            format!("({column} >= {min} AND {column} <= {max})")
        });
    }

    fn equals_text(&mut self, column: &str, values: &[String]) {
        self.group(values, |b, value| {
            let p = b.bind(SqlValue::Text(value.clone()));
            format!("{column} = {p}")
        });
    }
}

fn pos_predicate(b: &mut Builder, shape: &Shape) -> String {
    match shape {
        Shape::Circle {
            longitude,
            latitude,
            radius,
        } => {
            let lon = b.bind(SqlValue::Double(*longitude));
            let lat = b.bind(SqlValue::Double(*latitude));
            let r = b.bind(SqlValue::Double(*radius));
            format!("q3c_radial_query(s_ra, s_dec, {lon}, {lat}, {r})")
        }
        Shape::Range {
            lon1,
            lon2,
            lat1,
            lat2,
        } => {
            // q3c_box_query takes the box centre and half-widths.
            let center_ra = b.bind(SqlValue::Double((lon1 + lon2) / 2.0));
            let center_dec = b.bind(SqlValue::Double((lat1 + lat2) / 2.0));
            let half_ra = b.bind(SqlValue::Double((lon2 - lon1).abs() / 2.0));
            let half_dec = b.bind(SqlValue::Double((lat2 - lat1).abs() / 2.0));
            format!("q3c_box_query(s_ra, s_dec, {center_ra}, {center_dec}, {half_ra}, {half_dec})")
        }
        Shape::Polygon { vertices } => {
            let flat: Vec<f64> = vertices.iter().flat_map(|&(lon, lat)| [lon, lat]).collect();
            let poly = b.bind(SqlValue::DoubleArray(flat));
            format!("q3c_poly_query(s_ra, s_dec, {poly})")
        }
    }
}

fn time_predicate(b: &mut Builder, time: &TimeInterval) -> String {
    let start = b.bind(SqlValue::Double(time.start.value()));
    match time.end {
        Some(end) => {
            let end = b.bind(SqlValue::Double(end.value()));
            format!("(t_max >= {start} AND t_min <= {end})")
        }
        None => format!("t_max >= {start}"),
    }
}

/// Comma-separated output column list.
pub fn select_columns() -> String {
    OBSCORE_COLUMNS
        .iter()
        .map(|c| c.name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the search statement for `query`, returning at most `limit` rows.
pub fn build_search_sql(query: &SiaQuery, limit: u64) -> SqlSearch {
    let mut b = Builder::default();

    b.group(&query.pos, pos_predicate);
    b.intervals("em_min", &query.band);
    b.group(&query.time, time_predicate);
    b.intervals("s_fov", &query.fov);
    b.intervals("s_resolution", &query.spatres);
    b.intervals("em_res_power", &query.specrp);
    b.intervals("t_exptime", &query.exptime);
    b.intervals("t_resolution", &query.timeres);
    b.group(&query.pol, |b, pol| {
        let p = b.bind(SqlValue::Text(format!("%/{}/%", pol.as_str())));
        format!("pol_states LIKE {p}")
    });
    b.equals_text("obs_id", &query.id);
    b.equals_text("obs_collection", &query.collection);
    b.equals_text("facility_name", &query.facility);
    b.equals_text("instrument_name", &query.instrument);
    b.group(&query.dptype, |b, dptype| {
        let p = b.bind(SqlValue::Text(dptype.as_str().to_string()));
        format!("dataproduct_type = {p}")
    });
    b.group(&query.calib, |b, calib| {
        let p = b.bind(SqlValue::Integer(calib.value()));
        format!("calib_level = {p}")
    });
    b.equals_text("target_name", &query.target);
    b.equals_text("access_format", &query.format);

    let mut sql = format!("SELECT {} FROM {}", select_columns(), OBSCORE_TABLE);
    if !b.groups.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&b.groups.join(" AND "));
    }
    let limit = b.bind(SqlValue::BigInt(i64::try_from(limit).unwrap_or(i64::MAX)));
    sql.push_str(&format!(" ORDER BY id LIMIT {limit}"));

    SqlSearch { sql, binds: b.binds }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CalibrationLevel, DataProductType, PolarizationState};

    fn where_clause(search: &SqlSearch) -> &str {
        let start = search.sql.find(" WHERE ").map(|i| i + 7).unwrap_or(0);
        let end = search.sql.find(" ORDER BY").unwrap();
        &search.sql[start..end]
    }

    #[test]
    fn test_unconstrained_query_only_limits() {
        let search = build_search_sql(&SiaQuery::default(), 100);
        assert!(search.sql.starts_with("SELECT id, dataproduct_type, calib_level"));
        assert!(!search.sql.contains("WHERE"));
        assert!(search.sql.ends_with("FROM obscore ORDER BY id LIMIT $1"));
        assert_eq!(search.binds, vec![SqlValue::BigInt(100)]);
    }

    #[test]
    fn test_circle_uses_radial_query() {
        let query = SiaQuery {
            pos: vec![Shape::circle(10.684, 41.269, 0.1).unwrap()],
            ..Default::default()
        };
        let search = build_search_sql(&query, 10);
        assert_eq!(
            where_clause(&search),
            "(q3c_radial_query(s_ra, s_dec, $1, $2, $3))"
        );
        assert_eq!(
            &search.binds[..3],
            &[
                SqlValue::Double(10.684),
                SqlValue::Double(41.269),
                SqlValue::Double(0.1)
            ]
        );
    }

    #[test]
    fn test_range_becomes_centered_box() {
        let query = SiaQuery {
            pos: vec![Shape::range(10.0, 20.0, -4.0, 6.0).unwrap()],
            ..Default::default()
        };
        let search = build_search_sql(&query, 10);
        assert!(where_clause(&search).contains("q3c_box_query(s_ra, s_dec, $1, $2, $3, $4)"));
        assert_eq!(
            &search.binds[..4],
            &[
                SqlValue::Double(15.0),
                SqlValue::Double(1.0),
                SqlValue::Double(5.0),
                SqlValue::Double(5.0)
            ]
        );
    }

    #[test]
    fn test_reversed_range_gives_same_box() {
        let query = SiaQuery {
            pos: vec![Shape::range(20.0, 10.0, 6.0, -4.0).unwrap()],
            ..Default::default()
        };
        let search = build_search_sql(&query, 10);
        assert_eq!(
            &search.binds[..4],
            &[
                SqlValue::Double(15.0),
                SqlValue::Double(1.0),
                SqlValue::Double(5.0),
                SqlValue::Double(5.0)
            ]
        );
    }

    #[test]
    fn test_polygon_binds_flat_array() {
        let query = SiaQuery {
            pos: vec![Shape::polygon(&[10.0, 10.0, 12.0, 10.0, 12.0, 12.0]).unwrap()],
            ..Default::default()
        };
        let search = build_search_sql(&query, 10);
        assert_eq!(where_clause(&search), "(q3c_poly_query(s_ra, s_dec, $1))");
        assert_eq!(
            search.binds[0],
            SqlValue::DoubleArray(vec![10.0, 10.0, 12.0, 10.0, 12.0, 12.0])
        );
    }

    #[test]
    fn test_groups_are_anded_and_values_ored() {
        let query = SiaQuery {
            collection: vec!["A".into(), "B".into()],
            calib: vec![CalibrationLevel::Reduced],
            ..Default::default()
        };
        let search = build_search_sql(&query, 5);
        assert_eq!(
            where_clause(&search),
            "(obs_collection = $1 OR obs_collection = $2) AND (calib_level = $3)"
        );
        assert_eq!(search.binds[2], SqlValue::Integer(3));
        assert_eq!(search.binds[3], SqlValue::BigInt(5));
    }

    #[test]
    fn test_time_open_and_closed() {
        let query = SiaQuery {
            time: vec![
                TimeInterval::parse("59000 59010").unwrap(),
                TimeInterval::parse("60000").unwrap(),
            ],
            ..Default::default()
        };
        let search = build_search_sql(&query, 1);
        assert_eq!(
            where_clause(&search),
            "((t_max >= $1 AND t_min <= $2) OR t_max >= $3)"
        );
    }

    #[test]
    fn test_interval_columns_and_pol_pattern() {
        let query = SiaQuery {
            band: vec![Interval::new(0.5, 2.0)],
            exptime: vec![Interval::new(30.0, f64::INFINITY)],
            pol: vec![PolarizationState::LR],
            dptype: vec![DataProductType::Image],
            ..Default::default()
        };
        let search = build_search_sql(&query, 1);
        let clause = where_clause(&search);
        assert!(clause.starts_with("((em_min >= $1 AND em_min <= $2))"));
        assert!(clause.contains("((t_exptime >= $3 AND t_exptime <= $4))"));
        assert!(clause.contains("(pol_states LIKE $5)"));
        assert!(clause.contains("(dataproduct_type = $6)"));
        assert_eq!(search.binds[4], SqlValue::Text("%/LR/%".to_string()));
        assert_eq!(search.binds[5], SqlValue::Text("image".to_string()));
    }

    #[test]
    fn test_values_are_never_inlined() {
        let query = SiaQuery {
            target: vec!["M31'; DROP TABLE obscore; --".to_string()],
            ..Default::default()
        };
        let search = build_search_sql(&query, 1);
        assert!(!search.sql.contains("DROP TABLE"));
        assert_eq!(where_clause(&search), "(target_name = $1)");
    }

    #[test]
    fn test_huge_limit_saturates() {
        let search = build_search_sql(&SiaQuery::default(), u64::MAX);
        assert_eq!(search.binds, vec![SqlValue::BigInt(i64::MAX)]);
    }
}
