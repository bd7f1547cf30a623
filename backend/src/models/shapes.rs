//! DALI POS shapes (`CIRCLE`, `RANGE`, `POLYGON`).

use serde::{Deserialize, Serialize};

use super::sky;

fn check_lon(name: &str, value: f64) -> Result<(), String> {
    if (0.0..=360.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("{} must be in [0, 360]", name))
    }
}

fn check_lat(name: &str, value: f64) -> Result<(), String> {
    if (-90.0..=90.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("{} must be in [-90, 90]", name))
    }
}

/// A spatial constraint in ICRS degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "UPPERCASE")]
pub enum Shape {
    Circle {
        longitude: f64,
        latitude: f64,
        radius: f64,
    },
    Range {
        lon1: f64,
        lon2: f64,
        lat1: f64,
        lat2: f64,
    },
    Polygon {
        vertices: Vec<(f64, f64)>,
    },
}

impl Shape {
    /// Build a validated circle.
    pub fn circle(longitude: f64, latitude: f64, radius: f64) -> Result<Self, String> {
        check_lon("Longitude", longitude)?;
        check_lat("Latitude", latitude)?;
        if !(radius > 0.0 && radius <= 180.0) {
            return Err("Radius must be in (0, 180]".to_string());
        }
        Ok(Shape::Circle {
            longitude,
            latitude,
            radius,
        })
    }

    /// Build a validated coordinate range. Either bound of a pair may be the
    /// larger one.
    pub fn range(lon1: f64, lon2: f64, lat1: f64, lat2: f64) -> Result<Self, String> {
        check_lon("lon1", lon1)?;
        check_lon("lon2", lon2)?;
        check_lat("lat1", lat1)?;
        check_lat("lat2", lat2)?;
        Ok(Shape::Range {
            lon1,
            lon2,
            lat1,
            lat2,
        })
    }

    /// Build a validated polygon from a flat `lon1 lat1 lon2 lat2 ...` list.
    pub fn polygon(coordinates: &[f64]) -> Result<Self, String> {
        if coordinates.len() < 6 || coordinates.len() % 2 != 0 {
            return Err("POLYGON must have at least 3 lon/lat pairs (6 values total)".to_string());
        }
        let vertices: Vec<(f64, f64)> = coordinates
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
            .collect();
        for &(lon, lat) in &vertices {
            check_lon("Longitude", lon)?;
            check_lat("Latitude", lat)?;
        }
        Ok(Shape::Polygon { vertices })
    }

    /// Parse a DALI POS string such as `CIRCLE 10.684 41.269 0.1`.
    pub fn parse(pos: &str) -> Result<Self, String> {
        let mut tokens = pos.split_whitespace();
        let keyword = tokens
            .next()
            .ok_or_else(|| "Empty POS value".to_string())?
            .to_uppercase();
        let values = tokens
            .map(|t| {
                t.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| format!("Invalid numeric value in POS: {}", t))
            })
            .collect::<Result<Vec<f64>, String>>()?;

        match keyword.as_str() {
            "CIRCLE" => match values.as_slice() {
                [lon, lat, radius] => Shape::circle(*lon, *lat, *radius),
                _ => Err(format!(
                    "CIRCLE expects 3 values (lon lat radius), got {}",
                    values.len()
                )),
            },
            "RANGE" => match values.as_slice() {
                [lon1, lon2, lat1, lat2] => Shape::range(*lon1, *lon2, *lat1, *lat2),
                _ => Err(format!(
                    "RANGE expects 4 values (lon1 lon2 lat1 lat2), got {}",
                    values.len()
                )),
            },
            "POLYGON" => Shape::polygon(&values),
            other => Err(format!("Unknown POS shape: {}", other)),
        }
    }

    /// Whether the sky position `(ra, dec)` falls inside this shape.
    pub fn contains(&self, ra: f64, dec: f64) -> bool {
        match self {
            Shape::Circle {
                longitude,
                latitude,
                radius,
            } => sky::angular_distance(*longitude, *latitude, ra, dec) <= *radius,
            Shape::Range {
                lon1,
                lon2,
                lat1,
                lat2,
            } => {
                ra >= lon1.min(*lon2)
                    && ra <= lon1.max(*lon2)
                    && dec >= lat1.min(*lat2)
                    && dec <= lat1.max(*lat2)
            }
            Shape::Polygon { vertices } => sky::polygon_contains(vertices, ra, dec),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_circle() {
        let shape = Shape::parse("CIRCLE 10.684 41.269 0.1").unwrap();
        assert_eq!(
            shape,
            Shape::Circle {
                longitude: 10.684,
                latitude: 41.269,
                radius: 0.1
            }
        );
    }

    #[test]
    fn test_keyword_is_case_insensitive() {
        assert!(matches!(
            Shape::parse("circle 1 2 3"),
            Ok(Shape::Circle { .. })
        ));
        assert!(matches!(
            Shape::parse("Range 0 10 -5 5"),
            Ok(Shape::Range { .. })
        ));
    }

    #[test]
    fn test_parse_polygon() {
        let shape = Shape::parse("POLYGON 10 10 12 10 12 12").unwrap();
        match shape {
            Shape::Polygon { vertices } => {
                assert_eq!(vertices, vec![(10.0, 10.0), (12.0, 10.0), (12.0, 12.0)])
            }
            other => panic!("unexpected shape {:?}", other),
        }
    }

    #[test]
    fn test_polygon_needs_three_pairs() {
        let err = Shape::parse("POLYGON 10 10 12 10").unwrap_err();
        assert!(err.contains("at least 3 lon/lat pairs"));
        assert!(Shape::parse("POLYGON 10 10 12 10 12").is_err());
    }

    #[test]
    fn test_out_of_bounds_values() {
        assert_eq!(
            Shape::parse("CIRCLE 361 0 1").unwrap_err(),
            "Longitude must be in [0, 360]"
        );
        assert_eq!(
            Shape::parse("CIRCLE 10 -91 1").unwrap_err(),
            "Latitude must be in [-90, 90]"
        );
        assert!(Shape::parse("CIRCLE 10 10 0").is_err());
        assert_eq!(
            Shape::parse("RANGE 0 400 0 1").unwrap_err(),
            "lon2 must be in [0, 360]"
        );
    }

    #[test]
    fn test_reversed_range_bounds() {
        let shape = Shape::parse("RANGE 20 10 1 0").unwrap();
        assert_eq!(
            shape,
            Shape::Range {
                lon1: 20.0,
                lon2: 10.0,
                lat1: 1.0,
                lat2: 0.0
            }
        );
        assert!(shape.contains(15.0, 0.5));
        assert!(shape.contains(10.0, 1.0));
        assert!(!shape.contains(20.5, 0.5));
        assert!(!shape.contains(15.0, -0.1));
    }

    #[test]
    fn test_unknown_shape_and_garbage() {
        assert_eq!(
            Shape::parse("BOX 1 2 3 4").unwrap_err(),
            "Unknown POS shape: BOX"
        );
        assert!(Shape::parse("").is_err());
        assert!(Shape::parse("CIRCLE a b c").is_err());
        assert!(Shape::parse("CIRCLE 1 2").is_err());
    }

    #[test]
    fn test_contains() {
        let circle = Shape::circle(10.0, 20.0, 1.0).unwrap();
        assert!(circle.contains(10.5, 20.5));
        assert!(!circle.contains(12.0, 20.0));

        let range = Shape::range(0.0, 10.0, -5.0, 5.0).unwrap();
        assert!(range.contains(10.0, 5.0));
        assert!(!range.contains(10.1, 0.0));
    }
}
