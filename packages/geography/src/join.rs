//! Joins municipality statistics onto boundary geometries.

use std::collections::BTreeMap;

use geojson::{Feature, FeatureCollection};
use youth_map_demographics_models::{MunicipalityAggregate, YouthStats, normalize_name};
use youth_map_geography_models::{MapFeatureProperties, MunicipalityGeometry};

/// Builds one map feature per geometry, in geometry order.
///
/// `aggregates` is keyed by normalized municipality name. Geometries whose
/// normalized name has no aggregate get all-zero statistics; no geometry is
/// ever dropped.
#[must_use]
pub fn join(
    geometries: &[MunicipalityGeometry],
    aggregates: &BTreeMap<String, MunicipalityAggregate>,
) -> FeatureCollection {
    let zero = YouthStats::default();
    let mut unmatched = 0_usize;

    let features: Vec<Feature> = geometries
        .iter()
        .map(|municipality| {
            let stats = match aggregates.get(&normalize_name(&municipality.name)) {
                Some(aggregate) => &aggregate.stats,
                None => {
                    unmatched += 1;
                    &zero
                }
            };

            Feature {
                bbox: None,
                geometry: Some(municipality.geometry.clone()),
                id: None,
                properties: Some(
                    MapFeatureProperties::new(municipality.name.as_str(), stats)
                        .into_json_object(),
                ),
                foreign_members: None,
            }
        })
        .collect();

    if unmatched > 0 {
        log::debug!(
            "{unmatched} of {} boundaries have no survey data; attached zeroed statistics",
            geometries.len()
        );
    }

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}
