//! DALI interval values: numeric ranges with optional infinite bounds, and MJD
//! time ranges.

use serde::{Deserialize, Serialize};

use super::time::ModifiedJulianDate;

/// Parse a single interval bound.
///
/// Accepts `Inf`, `+Inf` and `-Inf` in addition to finite floats.
pub fn parse_bound(token: &str) -> Result<f64, String> {
    match token {
        "Inf" | "+Inf" => return Ok(f64::INFINITY),
        "-Inf" => return Ok(f64::NEG_INFINITY),
        _ => {}
    }

    match token.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("Invalid float or Inf value: {}", token)),
    }
}

/// Closed numeric interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Parse from exactly two whitespace-separated bounds, e.g. `"0.5 2.0"` or `"-Inf 30"`.
    pub fn parse(s: &str) -> Result<Self, String> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        if tokens.len() != 2 {
            return Err(format!("Expected two values, got: {}", s.trim()));
        }
        Ok(Self {
            min: parse_bound(tokens[0])?,
            max: parse_bound(tokens[1])?,
        })
    }

    /// True when `value` lies within the interval (inclusive).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Time range in MJD. A missing end leaves the range open.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: ModifiedJulianDate,
    pub end: Option<ModifiedJulianDate>,
}

impl TimeInterval {
    /// Parse from one (`"59000"`) or two (`"59000 59010"`) MJD values.
    /// Either bound may be `Inf`, `+Inf` or `-Inf`.
    pub fn parse(s: &str) -> Result<Self, String> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let parse_mjd = |tok: &str| -> Result<ModifiedJulianDate, String> {
            parse_bound(tok)
                .map(ModifiedJulianDate::new)
                .map_err(|_| format!("Invalid MJD value: {}", tok))
        };

        match tokens.as_slice() {
            [start] => Ok(Self {
                start: parse_mjd(start)?,
                end: None,
            }),
            [start, end] => Ok(Self {
                start: parse_mjd(start)?,
                end: Some(parse_mjd(end)?),
            }),
            _ => Err(format!("Expected one or two values, got: {}", s.trim())),
        }
    }

    /// Overlap test against an observation's `[t_min, t_max]`.
    ///
    /// An open range only requires the observation to end after `start`.
    pub fn overlaps(&self, t_min: Option<f64>, t_max: Option<f64>) -> bool {
        let Some(t_max) = t_max else {
            return false;
        };
        if t_max < self.start.value() {
            return false;
        }
        match self.end {
            Some(end) => t_min.is_some_and(|t_min| t_min <= end.value()),
            None => true,
        }
    }
}
