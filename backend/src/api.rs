//! Public API surface: the types a client of the service or library needs.

pub use crate::db::{ObsCoreRepository, RepositoryError, RepositoryFactory, RepositoryType};
pub use crate::models::{
    CalibrationLevel, DataProductType, Interval, NewObsCoreRecord, ObsCoreRecord, ParamError,
    PolarizationState, ResponseFormat, Shape, SiaQuery, TimeInterval,
};
pub use crate::services::SearchResult;

#[cfg(feature = "http-server")]
pub use crate::http::dto::HealthResponse;
