//! ObsCore 1.1 observation record.
//!
//! See <https://www.ivoa.net/documents/ObsCore/> for the column definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ObsCore `dataproduct_type` vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataProductType {
    Image,
    Cube,
    Spectrum,
    Sed,
    #[serde(rename = "timeseries")]
    TimeSeries,
    Visibility,
    Event,
    Measurements,
}

impl DataProductType {
    pub const ALL: [DataProductType; 8] = [
        DataProductType::Image,
        DataProductType::Cube,
        DataProductType::Spectrum,
        DataProductType::Sed,
        DataProductType::TimeSeries,
        DataProductType::Visibility,
        DataProductType::Event,
        DataProductType::Measurements,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataProductType::Image => "image",
            DataProductType::Cube => "cube",
            DataProductType::Spectrum => "spectrum",
            DataProductType::Sed => "sed",
            DataProductType::TimeSeries => "timeseries",
            DataProductType::Visibility => "visibility",
            DataProductType::Event => "event",
            DataProductType::Measurements => "measurements",
        }
    }

    /// SIA only serves images and cubes.
    pub fn is_sia_searchable(&self) -> bool {
        matches!(self, DataProductType::Image | DataProductType::Cube)
    }
}

impl fmt::Display for DataProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataProductType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown data product type: {}", s))
    }
}

/// Polarization labels allowed by the SIA `POL` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolarizationState {
    I,
    Q,
    U,
    V,
    RR,
    LL,
    RL,
    LR,
    XX,
    YY,
    XY,
    YX,
    POLI,
    POLA,
}

impl PolarizationState {
    pub const ALL: [PolarizationState; 14] = [
        PolarizationState::I,
        PolarizationState::Q,
        PolarizationState::U,
        PolarizationState::V,
        PolarizationState::RR,
        PolarizationState::LL,
        PolarizationState::RL,
        PolarizationState::LR,
        PolarizationState::XX,
        PolarizationState::YY,
        PolarizationState::XY,
        PolarizationState::YX,
        PolarizationState::POLI,
        PolarizationState::POLA,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PolarizationState::I => "I",
            PolarizationState::Q => "Q",
            PolarizationState::U => "U",
            PolarizationState::V => "V",
            PolarizationState::RR => "RR",
            PolarizationState::LL => "LL",
            PolarizationState::RL => "RL",
            PolarizationState::LR => "LR",
            PolarizationState::XX => "XX",
            PolarizationState::YY => "YY",
            PolarizationState::XY => "XY",
            PolarizationState::YX => "YX",
            PolarizationState::POLI => "POLI",
            PolarizationState::POLA => "POLA",
        }
    }

    /// Encode a set of states the way ObsCore stores them: `/I/Q/U/`.
    pub fn encode_list(states: &[PolarizationState]) -> Option<String> {
        if states.is_empty() {
            return None;
        }
        let joined: Vec<&str> = states.iter().map(|s| s.as_str()).collect();
        Some(format!("/{}/", joined.join("/")))
    }

    /// Whether an encoded `pol_states` column value lists this state.
    pub fn is_listed_in(&self, encoded: &str) -> bool {
        encoded.contains(&format!("/{}/", self.as_str()))
    }
}

impl FromStr for PolarizationState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("Invalid polarization label: {}", s))
    }
}

/// A stored ObsCore row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObsCoreRecord {
    pub id: i32,
    pub dataproduct_type: DataProductType,
    pub calib_level: i32,
    pub obs_collection: String,
    pub obs_id: String,
    pub obs_publisher_did: String,
    pub access_url: Option<String>,
    pub access_format: Option<String>,
    /// Estimated size in kbytes
    pub access_estsize: Option<i64>,
    pub target_name: Option<String>,
    pub s_ra: Option<f64>,
    pub s_dec: Option<f64>,
    pub s_fov: Option<f64>,
    /// STC-S region string
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

/// An ObsCore row before insertion (no primary key yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewObsCoreRecord {
    pub dataproduct_type: DataProductType,
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

impl NewObsCoreRecord {
    /// Attach a primary key.
    pub fn with_id(self, id: i32) -> ObsCoreRecord {
        ObsCoreRecord {
            id,
            dataproduct_type: self.dataproduct_type,
            calib_level: self.calib_level,
            obs_collection: self.obs_collection,
            obs_id: self.obs_id,
            obs_publisher_did: self.obs_publisher_did,
            access_url: self.access_url,
            access_format: self.access_format,
            access_estsize: self.access_estsize,
            target_name: self.target_name,
            s_ra: self.s_ra,
            s_dec: self.s_dec,
            s_fov: self.s_fov,
            s_region: self.s_region,
            s_resolution: self.s_resolution,
            s_xel1: self.s_xel1,
            s_xel2: self.s_xel2,
            t_min: self.t_min,
            t_max: self.t_max,
            t_exptime: self.t_exptime,
            t_resolution: self.t_resolution,
            t_xel: self.t_xel,
            em_min: self.em_min,
            em_max: self.em_max,
            em_res_power: self.em_res_power,
            em_xel: self.em_xel,
            o_ucd: self.o_ucd,
            pol_states: self.pol_states,
            pol_xel: self.pol_xel,
            facility_name: self.facility_name,
            instrument_name: self.instrument_name,
        }
    }
}

/// VOTable primitive type of an ObsCore column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Char,
    Int,
    Long,
    Double,
}

impl ColumnType {
    pub fn votable_datatype(&self) -> &'static str {
        match self {
            ColumnType::Char => "char",
            ColumnType::Int => "int",
            ColumnType::Long => "long",
            ColumnType::Double => "double",
        }
    }
}

/// Static description of one ObsCore column.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMeta {
    pub name: &'static str,
    pub datatype: ColumnType,
    pub ucd: &'static str,
    pub unit: Option<&'static str>,
}

const fn col(
    name: &'static str,
    datatype: ColumnType,
    ucd: &'static str,
    unit: Option<&'static str>,
) -> ColumnMeta {
    ColumnMeta {
        name,
        datatype,
        ucd,
        unit,
    }
}

/// Output columns, in table order.
pub const OBSCORE_COLUMNS: [ColumnMeta; 31] = [
    col("id", ColumnType::Int, "meta.record", None),
    col("dataproduct_type", ColumnType::Char, "meta.code.class", None),
    col("calib_level", ColumnType::Int, "meta.code;obs.calib", None),
    col("obs_collection", ColumnType::Char, "meta.id", None),
    col("obs_id", ColumnType::Char, "meta.id", None),
    col("obs_publisher_did", ColumnType::Char, "meta.ref.ivoid", None),
    col("access_url", ColumnType::Char, "meta.ref.url", None),
    col("access_format", ColumnType::Char, "meta.code.mime", None),
    col("access_estsize", ColumnType::Long, "phys.size;meta.file", Some("kbyte")),
    col("target_name", ColumnType::Char, "meta.id;src", None),
    col("s_ra", ColumnType::Double, "pos.eq.ra", Some("deg")),
    col("s_dec", ColumnType::Double, "pos.eq.dec", Some("deg")),
    col("s_fov", ColumnType::Double, "phys.angSize;instr.fov", Some("deg")),
    col("s_region", ColumnType::Char, "pos.outline;obs.field", None),
    col("s_resolution", ColumnType::Double, "pos.angResolution", Some("arcsec")),
    col("s_xel1", ColumnType::Long, "meta.number", None),
    col("s_xel2", ColumnType::Long, "meta.number", None),
    col("t_min", ColumnType::Double, "time.start;obs.exposure", Some("d")),
    col("t_max", ColumnType::Double, "time.end;obs.exposure", Some("d")),
    col("t_exptime", ColumnType::Double, "time.duration;obs.exposure", Some("s")),
    col("t_resolution", ColumnType::Double, "time.resolution", Some("s")),
    col("t_xel", ColumnType::Long, "meta.number", None),
    col("em_min", ColumnType::Double, "em.wl;stat.min", Some("m")),
    col("em_max", ColumnType::Double, "em.wl;stat.max", Some("m")),
    col("em_res_power", ColumnType::Double, "spect.resolution", None),
    col("em_xel", ColumnType::Long, "meta.number", None),
    col("o_ucd", ColumnType::Char, "meta.ucd", None),
    col("pol_states", ColumnType::Char, "meta.code;phys.polarization", None),
    col("pol_xel", ColumnType::Long, "meta.number", None),
    col("facility_name", ColumnType::Char, "meta.id;instr.tel", None),
    col("instrument_name", ColumnType::Char, "meta.id;instr", None),
];

/// A single cell value, used to serialize rows column by column.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue<'a> {
    Null,
    Int(i64),
    Double(f64),
    Text(&'a str),
}

impl ObsCoreRecord {
    /// Cell values in [`OBSCORE_COLUMNS`] order.
    pub fn cells(&self) -> [CellValue<'_>; 31] {
        fn text(v: &Option<String>) -> CellValue<'_> {
            v.as_deref().map_or(CellValue::Null, CellValue::Text)
        }
        fn double(v: Option<f64>) -> CellValue<'static> {
            v.map_or(CellValue::Null, CellValue::Double)
        }
        fn long(v: Option<i64>) -> CellValue<'static> {
            v.map_or(CellValue::Null, CellValue::Int)
        }

        [
            CellValue::Int(self.id as i64),
            CellValue::Text(self.dataproduct_type.as_str()),
            CellValue::Int(self.calib_level as i64),
            CellValue::Text(&self.obs_collection),
            CellValue::Text(&self.obs_id),
            CellValue::Text(&self.obs_publisher_did),
            text(&self.access_url),
            text(&self.access_format),
            long(self.access_estsize),
            text(&self.target_name),
            double(self.s_ra),
            double(self.s_dec),
            double(self.s_fov),
            text(&self.s_region),
            double(self.s_resolution),
            long(self.s_xel1),
            long(self.s_xel2),
            double(self.t_min),
            double(self.t_max),
            double(self.t_exptime),
            double(self.t_resolution),
            long(self.t_xel),
            double(self.em_min),
            double(self.em_max),
            double(self.em_res_power),
            long(self.em_xel),
            text(&self.o_ucd),
            text(&self.pol_states),
            long(self.pol_xel),
            text(&self.facility_name),
            text(&self.instrument_name),
        ]
    }
}
