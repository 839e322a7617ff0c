#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation and ranking engine for the youth demographics dashboard.
//!
//! Takes the raw survey rows of a state's municipalities and, for each
//! age-group selector, produces per-municipality and state-wide summaries,
//! top/bottom rankings per metric and a boundary-joined map layer.
//!
//! The pipeline is pure and synchronous: [`columns`] resolves the raw
//! columns of a selector, [`aggregate`] sums them per municipality,
//! [`weighted`] computes the population-weighted income and vulnerability
//! means, [`ranking`] orders municipalities by a metric and [`format`]
//! shapes the dashboard output. [`engine::Engine`] ties these together over
//! one immutable dataset loaded at startup.

pub mod aggregate;
pub mod columns;
pub mod engine;
pub mod format;
pub mod load;
pub mod progress;
pub mod provider;
pub mod ranking;
pub mod weighted;

#[cfg(test)]
pub(crate) mod fixtures;

use thiserror::Error;
use youth_map_demographics_models::{AgeGroup, RankingMetric};

pub use engine::{Engine, Slice};
pub use provider::StatsProvider;

/// Errors that can occur in the engine and its read contract.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Unrecognized age-group selector.
    #[error("Invalid age group '{value}': expected one of geral, 15-19, 20-24, 25-29")]
    InvalidSelector {
        /// The rejected selector.
        value: String,
    },

    /// Unrecognized ranking metric.
    #[error(
        "Invalid ranking metric '{value}': expected one of vulnerabilidade, renda, alfabetizacao, populacao"
    )]
    InvalidMetric {
        /// The rejected metric name.
        value: String,
    },

    /// No municipality with this name exists in the survey data.
    #[error("Municipality not found: {name}")]
    NotFound {
        /// The requested name, as given.
        name: String,
    },

    /// The survey dataset or the geometry source could not be loaded.
    #[error("Input data unavailable ({origin}): {message}")]
    MissingInputData {
        /// Path or name of the unavailable input.
        origin: String,
        /// Description of what went wrong.
        message: String,
    },

    /// The generated column table failed its startup check.
    #[error("Invalid column table: {message}")]
    InvalidColumnTable {
        /// Description of what went wrong.
        message: String,
    },
}

/// Parses an age-group selector coming from a client.
///
/// # Errors
///
/// Returns [`EngineError::InvalidSelector`] for anything outside the four
/// fixed selectors.
pub fn parse_age_group(value: &str) -> Result<AgeGroup, EngineError> {
    value.parse().map_err(|_| EngineError::InvalidSelector {
        value: value.to_string(),
    })
}

/// Parses a ranking metric name coming from a client.
///
/// # Errors
///
/// Returns [`EngineError::InvalidMetric`] for anything outside the four
/// fixed metrics.
pub fn parse_metric(value: &str) -> Result<RankingMetric, EngineError> {
    value.parse().map_err(|_| EngineError::InvalidMetric {
        value: value.to_string(),
    })
}
