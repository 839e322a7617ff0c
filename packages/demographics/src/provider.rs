//! The read contract shared by the live engine and the cache reader.

use geojson::FeatureCollection;
use youth_map_demographics_models::{AgeGroup, Ranking, RankingMetric, Summary};

use crate::EngineError;

/// Serves dashboard outputs for any age-group selector.
///
/// Implemented by [`crate::Engine`], which computes on every call, and by
/// the cache reader of the generate crate, which formats pre-computed
/// aggregates. Both produce identical outputs for the same dataset.
pub trait StatsProvider: Send + Sync {
    /// State-wide summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the slice for `age_group` is unavailable.
    fn state_summary(&self, age_group: AgeGroup) -> Result<Summary, EngineError>;

    /// Summary of one municipality, matched after name normalization.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if no municipality has this
    /// normalized name.
    fn municipality_summary(&self, name: &str, age_group: AgeGroup)
    -> Result<Summary, EngineError>;

    /// Every distinct normalized municipality name, sorted ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the name list is unavailable.
    fn municipality_names(&self) -> Result<Vec<String>, EngineError>;

    /// The boundary map with statistics attached, one feature per geometry.
    ///
    /// # Errors
    ///
    /// Returns an error if the slice for `age_group` is unavailable.
    fn map(&self, age_group: AgeGroup) -> Result<FeatureCollection, EngineError>;

    /// Top and bottom municipalities by `metric`.
    ///
    /// # Errors
    ///
    /// Returns an error if the slice for `age_group` is unavailable.
    fn ranking(&self, metric: RankingMetric, age_group: AgeGroup)
    -> Result<Ranking, EngineError>;
}
