use serde::*;

/// Modified Julian Date, the unit of every TIME bound.
/// MJD 0 = 1858-11-17 00:00:00 UTC
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct ModifiedJulianDate(f64);

impl ModifiedJulianDate {
    pub fn new(v: f64) -> Self {
        Self(v)
    }

    /// Raw MJD value as f64.
    pub fn value(&self) -> f64 {
        self.0
    }
}
