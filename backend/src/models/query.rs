//! SIA v2 query parameters.
//!
//! Every constraint parameter may be repeated; repeated values of one
//! parameter are OR-ed and distinct parameters are AND-ed.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::interval::{Interval, TimeInterval};
use super::obscore::{DataProductType, PolarizationState};
use super::shapes::Shape;

/// MAXREC applied when the client does not send one.
pub const DEFAULT_MAXREC: u64 = 100;

/// A rejected query parameter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Error in query {param}: {message}")]
pub struct ParamError {
    pub param: String,
    pub message: String,
}

impl ParamError {
    pub fn new(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            message: message.into(),
        }
    }
}

/// ObsCore calibration levels SIA clients may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalibrationLevel {
    Raw = 1,
    Calibrated = 2,
    Reduced = 3,
}

impl CalibrationLevel {
    pub fn value(&self) -> i32 {
        *self as i32
    }
}

impl FromStr for CalibrationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::Raw),
            "2" => Ok(Self::Calibrated),
            "3" => Ok(Self::Reduced),
            other => Err(format!("Calibration level must be 1, 2 or 3, got: {}", other)),
        }
    }
}

/// Serialization of the result table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResponseFormat {
    #[default]
    VoTable,
    Json,
}

impl FromStr for ResponseFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "votable" | "application/x-votable+xml" | "text/xml" => Ok(Self::VoTable),
            "json" | "application/json" => Ok(Self::Json),
            other => Err(format!("Unsupported response format: {}", other)),
        }
    }
}

/// A fully parsed and validated SIA query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiaQuery {
    pub pos: Vec<Shape>,
    pub band: Vec<Interval>,
    pub time: Vec<TimeInterval>,
    pub pol: Vec<PolarizationState>,
    pub fov: Vec<Interval>,
    pub spatres: Vec<Interval>,
    pub specrp: Vec<Interval>,
    pub exptime: Vec<Interval>,
    pub timeres: Vec<Interval>,
    pub id: Vec<String>,
    pub collection: Vec<String>,
    pub facility: Vec<String>,
    pub instrument: Vec<String>,
    pub dptype: Vec<DataProductType>,
    pub calib: Vec<CalibrationLevel>,
    pub target: Vec<String>,
    pub format: Vec<String>,
    pub maxrec: u64,
    pub response_format: ResponseFormat,
}

impl Default for SiaQuery {
    fn default() -> Self {
        Self {
            pos: Vec::new(),
            band: Vec::new(),
            time: Vec::new(),
            pol: Vec::new(),
            fov: Vec::new(),
            spatres: Vec::new(),
            specrp: Vec::new(),
            exptime: Vec::new(),
            timeres: Vec::new(),
            id: Vec::new(),
            collection: Vec::new(),
            facility: Vec::new(),
            instrument: Vec::new(),
            dptype: Vec::new(),
            calib: Vec::new(),
            target: Vec::new(),
            format: Vec::new(),
            maxrec: DEFAULT_MAXREC,
            response_format: ResponseFormat::default(),
        }
    }
}

fn parse_into<T>(
    param: &str,
    value: &str,
    parse: impl FnOnce(&str) -> Result<T, String>,
    out: &mut Vec<T>,
) -> Result<(), ParamError> {
    let parsed = parse(value).map_err(|message| ParamError::new(param, message))?;
    out.push(parsed);
    Ok(())
}

impl SiaQuery {
    /// Build a query from decoded `(NAME, value)` pairs.
    ///
    /// Names must already be upper-cased. Unknown parameters and empty values
    /// are ignored.
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, ParamError> {
        let mut query = SiaQuery::default();
        let mut maxrec_seen = false;
        let mut format_seen = false;

        for (name, raw) in pairs {
            let value = raw.trim();
            if value.is_empty() {
                continue;
            }
            let name = name.as_str();

            match name {
                "POS" => parse_into(name, value, Shape::parse, &mut query.pos)?,
                "BAND" => parse_into(name, value, Interval::parse, &mut query.band)?,
                "TIME" => parse_into(name, value, TimeInterval::parse, &mut query.time)?,
                "POL" => parse_into(name, value, PolarizationState::from_str, &mut query.pol)?,
                "FOV" => parse_into(name, value, Interval::parse, &mut query.fov)?,
                "SPATRES" => parse_into(name, value, Interval::parse, &mut query.spatres)?,
                "SPECRP" => parse_into(name, value, Interval::parse, &mut query.specrp)?,
                "EXPTIME" => parse_into(name, value, Interval::parse, &mut query.exptime)?,
                "TIMERES" => parse_into(name, value, Interval::parse, &mut query.timeres)?,
                "ID" => query.id.push(value.to_string()),
                "COLLECTION" => query.collection.push(value.to_string()),
                "FACILITY" => query.facility.push(value.to_string()),
                "INSTRUMENT" => query.instrument.push(value.to_string()),
                "TARGET" => query.target.push(value.to_string()),
                "FORMAT" => query.format.push(value.to_string()),
                "DPTYPE" => parse_into(
                    name,
                    value,
                    |v| {
                        v.parse::<DataProductType>()
                            .ok()
                            .filter(DataProductType::is_sia_searchable)
                            .ok_or_else(|| {
                                format!("Data product type must be 'image' or 'cube', got: {}", v)
                            })
                    },
                    &mut query.dptype,
                )?,
                "CALIB" => parse_into(name, value, CalibrationLevel::from_str, &mut query.calib)?,
                "MAXREC" => {
                    if maxrec_seen {
                        return Err(ParamError::new(name, "MAXREC may only be given once"));
                    }
                    maxrec_seen = true;
                    query.maxrec = value.parse::<u64>().map_err(|_| {
                        ParamError::new(
                            name,
                            format!("Expected a non-negative integer, got: {}", value),
                        )
                    })?;
                }
                "RESPONSEFORMAT" => {
                    if format_seen {
                        return Err(ParamError::new(name, "RESPONSEFORMAT may only be given once"));
                    }
                    format_seen = true;
                    query.response_format = value
                        .parse::<ResponseFormat>()
                        .map_err(|message| ParamError::new(name, message))?;
                }
                _ => {}
            }
        }

        Ok(query)
    }

    /// True when no constraint parameter was supplied.
    pub fn is_unconstrained(&self) -> bool {
        self.pos.is_empty()
            && self.band.is_empty()
            && self.time.is_empty()
            && self.pol.is_empty()
            && self.fov.is_empty()
            && self.spatres.is_empty()
            && self.specrp.is_empty()
            && self.exptime.is_empty()
            && self.timeres.is_empty()
            && self.id.is_empty()
            && self.collection.is_empty()
            && self.facility.is_empty()
            && self.instrument.is_empty()
            && self.dptype.is_empty()
            && self.calib.is_empty()
            && self.target.is_empty()
            && self.format.is_empty()
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod query_tests;
