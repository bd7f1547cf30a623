//! # SIA Rust
//!
//! IVOA Simple Image Access v2 query service over an ObsCore table.
//!
//! ## Architecture
//!
//! - [`models`]: query parameters, POS shapes, intervals and the ObsCore record
//! - [`db`]: repository pattern, Q3C SQL translation, readiness gate
//! - [`services`]: MAXREC handling, VOTable output, fake data
//! - [`http`]: axum router and handlers (feature `http-server`)
//! - [`startup`]: readiness gate, repository creation, bind and serve
//! - [`config`]: process configuration from the environment

// RepositoryError carries context for debugging.
#![allow(clippy::result_large_err)]

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
#[cfg(feature = "http-server")]
pub mod startup;
