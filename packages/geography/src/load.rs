//! Loads municipality boundaries from a `GeoJSON` feature collection.
//!
//! Each feature must carry a `Polygon` or `MultiPolygon` geometry; features
//! that do not are skipped with a warning rather than failing the whole
//! load. The display name comes from the `nome` property. A polygon without
//! one is still kept, under an empty name, so it reaches the map with zeroed
//! statistics.

use std::path::Path;

use geojson::{Feature, GeoJson};
use youth_map_geography_models::{MunicipalityGeometry, NAME_PROPERTY};

use crate::GeographyError;

/// Reads and parses the geometry source at `path`.
///
/// # Errors
///
/// Returns [`GeographyError`] if the file cannot be read, is not valid
/// `GeoJSON`, or is not a `FeatureCollection`.
pub fn load_geometries(path: &Path) -> Result<Vec<MunicipalityGeometry>, GeographyError> {
    log::info!("Loading municipality boundaries from {}...", path.display());
    let contents = std::fs::read_to_string(path)?;
    let geometries = parse_geometries(&contents)?;
    log::info!("Loaded {} municipality boundaries", geometries.len());
    Ok(geometries)
}

/// Parses municipality boundaries from a `GeoJSON` string.
///
/// # Errors
///
/// Returns [`GeographyError`] if the input is not valid `GeoJSON` or is
/// not a `FeatureCollection`.
pub fn parse_geometries(geojson_str: &str) -> Result<Vec<MunicipalityGeometry>, GeographyError> {
    let geojson: GeoJson = geojson_str.parse()?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(GeographyError::Conversion {
            message: "Geometry source is not a FeatureCollection".to_string(),
        });
    };

    Ok(collection
        .features
        .into_iter()
        .enumerate()
        .filter_map(|(index, feature)| normalize_feature(index, feature))
        .collect())
}

fn normalize_feature(index: usize, feature: Feature) -> Option<MunicipalityGeometry> {
    let name = feature
        .properties
        .as_ref()
        .and_then(|props| props.get(NAME_PROPERTY))
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    let Some(geometry) = feature.geometry else {
        log::warn!("Skipping boundary feature #{index} ('{name}'): null geometry");
        return None;
    };

    match geometry.value {
        geojson::Value::Polygon(_) | geojson::Value::MultiPolygon(_) => {
            if name.is_empty() {
                log::warn!(
                    "Boundary feature #{index} has no '{NAME_PROPERTY}' property; keeping it unnamed"
                );
            }
            Some(MunicipalityGeometry { name, geometry })
        }
        _ => {
            log::warn!("Skipping boundary feature #{index} ('{name}'): geometry is not a polygon");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "nome": "Manaus", "code_muni": 1302603 },
                "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]] }
            },
            {
                "type": "Feature",
                "properties": { "nome": " Tefé " },
                "geometry": { "type": "MultiPolygon", "coordinates": [[[[2,2],[3,2],[3,3],[2,2]]]] }
            },
            {
                "type": "Feature",
                "properties": { "nome": "" },
                "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]] }
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": { "type": "Polygon", "coordinates": [[[5,5],[6,5],[6,6],[5,5]]] }
            },
            {
                "type": "Feature",
                "properties": { "nome": "Sem Geometria" },
                "geometry": null
            },
            {
                "type": "Feature",
                "properties": { "nome": "Ponto" },
                "geometry": { "type": "Point", "coordinates": [1, 1] }
            }
        ]
    }"#;

    #[test]
    fn keeps_every_polygon() {
        let geometries = parse_geometries(COLLECTION).unwrap();
        let names: Vec<&str> = geometries.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Manaus", "Tefé", "", ""]);
    }

    #[test]
    fn unnamed_polygon_joins_with_zeroed_stats() {
        let geometries = parse_geometries(COLLECTION).unwrap();
        let collection = crate::join::join(&geometries, &std::collections::BTreeMap::new());
        assert_eq!(collection.features.len(), 4);

        let props = collection.features[3].properties.as_ref().unwrap();
        assert_eq!(props["nome"], "");
        assert_eq!(props["total_jovens"], 0);
        assert_eq!(props["renda_media_final"], 0.0);
    }

    #[test]
    fn geometry_is_carried_unchanged() {
        let geometries = parse_geometries(COLLECTION).unwrap();
        assert!(matches!(
            geometries[1].geometry.value,
            geojson::Value::MultiPolygon(_)
        ));
    }

    #[test]
    fn rejects_non_collection() {
        let err = parse_geometries(r#"{ "type": "Point", "coordinates": [1, 1] }"#).unwrap_err();
        assert!(matches!(err, GeographyError::Conversion { .. }));
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            parse_geometries("not geojson").unwrap_err(),
            GeographyError::GeoJson(_)
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_geometries(Path::new("/nonexistent/boundaries.geojson")).unwrap_err();
        assert!(matches!(err, GeographyError::Io(_)));
    }
}
