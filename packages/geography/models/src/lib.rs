#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Municipality boundary and map feature types.
//!
//! Geometries come from a source independent of the survey dataset and are
//! treated as opaque: they are carried through to the map output exactly
//! as loaded.

use geojson::{Geometry, JsonObject};
use serde::{Deserialize, Serialize};
use youth_map_demographics_models::YouthStats;

/// Name of the feature property holding the municipality display name in
/// both the geometry source and the map output.
pub const NAME_PROPERTY: &str = "nome";

/// A municipality polygon as loaded from the geometry source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MunicipalityGeometry {
    /// Display name as spelled in the geometry source.
    pub name: String,
    /// `Polygon` or `MultiPolygon` geometry.
    pub geometry: Geometry,
}

/// Statistics attached to each map feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapFeatureProperties {
    /// Display name from the geometry source.
    pub nome: String,
    /// Total youth in the selected age group.
    pub total_jovens: u64,
    /// Population-weighted mean income.
    pub renda_media_final: f64,
    /// Population-weighted mean vulnerability score.
    pub vul_score_final: f64,
    /// Literacy rate in percent.
    pub taxa_alfabetizacao_jovens: f64,
}

impl MapFeatureProperties {
    /// Builds the properties for a municipality from its statistics.
    ///
    /// Pass [`YouthStats::default()`] for municipalities without data.
    #[must_use]
    pub fn new(nome: impl Into<String>, stats: &YouthStats) -> Self {
        Self {
            nome: nome.into(),
            total_jovens: stats.total_youth,
            renda_media_final: stats.income,
            vul_score_final: stats.vulnerability,
            taxa_alfabetizacao_jovens: stats.literacy_rate,
        }
    }

    /// Converts into a `GeoJSON` properties object.
    #[must_use]
    pub fn into_json_object(self) -> JsonObject {
        let mut properties = JsonObject::new();
        properties.insert(NAME_PROPERTY.to_string(), self.nome.into());
        properties.insert("total_jovens".to_string(), self.total_jovens.into());
        properties.insert(
            "renda_media_final".to_string(),
            self.renda_media_final.into(),
        );
        properties.insert("vul_score_final".to_string(), self.vul_score_final.into());
        properties.insert(
            "taxa_alfabetizacao_jovens".to_string(),
            self.taxa_alfabetizacao_jovens.into(),
        );
        properties
    }
}
