#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Municipality boundary loading and map layer construction.
//!
//! Loads municipality polygons from a `GeoJSON` feature collection once at
//! startup and joins per-municipality statistics onto them by normalized
//! name. Every loaded boundary appears in every map layer, with zeroed
//! statistics where the survey has no rows for it.

pub mod join;
pub mod load;

use thiserror::Error;

/// Errors that can occur during geography operations.
#[derive(Debug, Error)]
pub enum GeographyError {
    /// Reading the geometry source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The geometry source is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Data conversion error.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}
