#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the youth dashboard server.
//!
//! Summaries, rankings and maps are served in the shapes defined by the
//! demographics and geography model crates; this crate only holds the
//! types specific to the HTTP surface.

use serde::{Deserialize, Serialize};

/// Selector used when a request names no age group.
pub const DEFAULT_AGE_GROUP: &str = "geral";

/// Query parameters shared by every per-age-group endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgeGroupQuery {
    /// Age-group selector (`geral`, `15-19`, `20-24` or `25-29`).
    pub age_group: Option<String>,
}

impl AgeGroupQuery {
    /// The requested selector, `geral` when absent.
    #[must_use]
    pub fn selector(&self) -> &str {
        self.age_group.as_deref().unwrap_or(DEFAULT_AGE_GROUP)
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the server is up.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable error message.
    pub error: String,
}

impl ApiError {
    /// Wraps a message.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
