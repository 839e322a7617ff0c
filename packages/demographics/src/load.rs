//! Loads raw survey rows from the source `GeoJSON` dataset.
//!
//! The dataset is a feature collection with one feature per demographic
//! sub-group; all survey fields live in the feature properties and the
//! geometry is ignored. Only the columns the engine can resolve are kept.

use std::path::Path;

use geojson::{GeoJson, JsonObject};
use serde_json::Value;
use youth_map_demographics_models::{AgeGroup, RawRecord};

use crate::EngineError;
use crate::columns::resolve;

/// Municipality name field.
pub const MUNICIPALITY_FIELD: &str = "NM_MUN_demanda";
/// Population weight field.
pub const POPULATION_FIELD: &str = "N_PESSOAS";
/// Average income field.
pub const INCOME_FIELD: &str = "RENDA_MEDIA";
/// Vulnerability score field.
pub const VULNERABILITY_FIELD: &str = "VUL_SCORE";

/// Reads and parses the survey dataset at `path`.
///
/// # Errors
///
/// Returns [`EngineError::MissingInputData`] if the file cannot be read or
/// is not a `GeoJSON` feature collection.
pub fn load_raw_records(path: &Path) -> Result<Vec<RawRecord>, EngineError> {
    log::info!("Loading raw survey dataset from {}...", path.display());
    let origin = path.display().to_string();
    let contents =
        std::fs::read_to_string(path).map_err(|e| EngineError::MissingInputData {
            origin: origin.clone(),
            message: e.to_string(),
        })?;
    let records = parse_raw_records(&contents, &origin)?;
    log::info!("Loaded {} raw survey rows", records.len());
    Ok(records)
}

/// Parses survey rows from a `GeoJSON` string. `origin` names the input in
/// error messages.
///
/// # Errors
///
/// Returns [`EngineError::MissingInputData`] if the input is not a `GeoJSON`
/// feature collection.
pub fn parse_raw_records(geojson_str: &str, origin: &str) -> Result<Vec<RawRecord>, EngineError> {
    let missing = |message: String| EngineError::MissingInputData {
        origin: origin.to_string(),
        message,
    };

    let geojson: GeoJson = geojson_str.parse().map_err(|e| missing(format!("{e}")))?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(missing("dataset is not a FeatureCollection".to_string()));
    };

    let columns = resolve(AgeGroup::All);
    let mut skipped = 0_usize;
    let records: Vec<RawRecord> = collection
        .features
        .iter()
        .filter_map(|feature| {
            let record = feature
                .properties
                .as_ref()
                .and_then(|props| record_from_properties(props, columns.all_columns()));
            if record.is_none() {
                skipped += 1;
            }
            record
        })
        .collect();

    if skipped > 0 {
        log::warn!("Skipped {skipped} survey rows without a municipality name");
    }

    Ok(records)
}

fn record_from_properties<'a>(
    props: &JsonObject,
    columns: impl Iterator<Item = &'a str>,
) -> Option<RawRecord> {
    let municipality = props
        .get(MUNICIPALITY_FIELD)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())?;

    let mut record = RawRecord::new(municipality)
        .with_population(number(props, POPULATION_FIELD).max(0.0))
        .with_income(number(props, INCOME_FIELD))
        .with_vulnerability(number(props, VULNERABILITY_FIELD));

    for column in columns {
        if props.contains_key(column) {
            record.counts.insert(column.to_string(), count(props, column));
        }
    }

    Some(record)
}

/// Reads a numeric property. Accepts numbers and numeric strings (with `.`
/// or `,` as decimal separator); anything else, including non-finite
/// values, reads as 0.
fn number(props: &JsonObject, key: &str) -> f64 {
    let value = match props.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Reads a count property, rounding fractional counts and clamping
/// negatives to 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn count(props: &JsonObject, key: &str) -> u64 {
    if let Some(n) = props.get(key).and_then(Value::as_u64) {
        return n;
    }
    let value = number(props, key);
    if value <= 0.0 { 0 } else { value.round() as u64 }
}
