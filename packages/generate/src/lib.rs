#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pre-computes every age-group slice and writes it as a JSON cache.
//!
//! The four slices are computed on parallel threads over one shared
//! [`Engine`], then written to the output directory:
//!
//! * `municipios_data.json`: municipality aggregates per age group
//! * `state_data.json`: the state aggregate per age group
//! * `map_data.json`: the boundary map per age group
//! * `municipio_list.json`: the sorted municipality names
//! * `manifest.json`: what was generated, from how many inputs, and when
//!
//! The cache holds aggregates rather than formatted summaries;
//! [`cache::CachedStats`] runs the same formatter on read.

pub mod cache;

use std::collections::BTreeMap;
use std::path::Path;

use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use youth_map_demographics::progress::ProgressCallback;
use youth_map_demographics::{Engine, EngineError, Slice, StatsProvider};
use youth_map_demographics_models::{AgeGroup, MunicipalityAggregate, YouthStats};

/// Current manifest schema version. Bump this when the cache layout
/// changes in a backward-incompatible way.
pub const MANIFEST_VERSION: u32 = 1;

/// Municipality aggregates, keyed by age group then normalized name.
pub const MUNICIPALITIES_FILE: &str = "municipios_data.json";
/// State aggregates, keyed by age group.
pub const STATE_FILE: &str = "state_data.json";
/// Boundary maps, keyed by age group.
pub const MAP_FILE: &str = "map_data.json";
/// Sorted municipality names.
pub const NAMES_FILE: &str = "municipio_list.json";
/// Generation manifest.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Every file a run writes, manifest last.
pub const CACHE_FILES: [&str; 5] = [
    MUNICIPALITIES_FILE,
    STATE_FILE,
    MAP_FILE,
    NAMES_FILE,
    MANIFEST_FILE,
];

/// Number of progress steps in one run: one per slice, one per file.
#[must_use]
pub const fn total_steps() -> u64 {
    (AgeGroup::all().len() + CACHE_FILES.len()) as u64
}

/// Errors that can occur while writing or reading the cache.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cache file could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The engine rejected a request.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// The cache contents do not match the expected layout.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Generation manifest stored at `manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Cache layout version, see [`MANIFEST_VERSION`].
    pub version: u32,
    /// RFC 3339 timestamp of the run.
    pub generated_at: String,
    /// Raw survey rows the cache was computed from.
    pub record_count: usize,
    /// Boundary geometries the maps were joined onto.
    pub geometry_count: usize,
    /// Output file name to RFC 3339 timestamp of when it was written.
    pub outputs: BTreeMap<String, String>,
}

/// Computes all four slices and writes the cache to `dir`.
///
/// `progress` sees each computed slice and each written file, then
/// [`ProgressCallback::finish`]; [`total_steps`] counts those steps.
///
/// # Errors
///
/// Returns an error if a slice worker panics or a cache file cannot be
/// written.
pub fn generate(
    engine: &Engine,
    dir: &Path,
    progress: &dyn ProgressCallback,
) -> Result<Manifest, GenerateError> {
    std::fs::create_dir_all(dir)?;

    let age_groups = AgeGroup::all();
    log::info!("Computing {} age-group slices...", age_groups.len());
    let slices = compute_slices(engine, age_groups, progress)?;

    let mut municipalities: BTreeMap<String, &BTreeMap<String, MunicipalityAggregate>> =
        BTreeMap::new();
    let mut states: BTreeMap<String, &YouthStats> = BTreeMap::new();
    let mut maps: BTreeMap<String, &FeatureCollection> = BTreeMap::new();
    for slice in &slices {
        let key = slice.age_group.to_string();
        municipalities.insert(key.clone(), &slice.municipalities);
        states.insert(key.clone(), &slice.state);
        maps.insert(key, &slice.map);
    }
    let names = engine.municipality_names()?;

    let mut manifest = Manifest {
        version: MANIFEST_VERSION,
        generated_at: chrono::Utc::now().to_rfc3339(),
        record_count: engine.record_count(),
        geometry_count: engine.geometry_count(),
        outputs: BTreeMap::new(),
    };

    write_output(dir, MUNICIPALITIES_FILE, &municipalities, &mut manifest)?;
    progress.file_written(MUNICIPALITIES_FILE);
    write_output(dir, STATE_FILE, &states, &mut manifest)?;
    progress.file_written(STATE_FILE);
    write_output(dir, MAP_FILE, &maps, &mut manifest)?;
    progress.file_written(MAP_FILE);
    write_output(dir, NAMES_FILE, &names, &mut manifest)?;
    progress.file_written(NAMES_FILE);
    write_json(dir, MANIFEST_FILE, &manifest)?;
    progress.file_written(MANIFEST_FILE);
    progress.finish();

    log::info!(
        "Wrote cache for {} municipalities to {}",
        names.len(),
        dir.display()
    );

    Ok(manifest)
}

/// Computes one slice per age group, each on its own scoped thread.
fn compute_slices(
    engine: &Engine,
    age_groups: &[AgeGroup],
    progress: &dyn ProgressCallback,
) -> Result<Vec<Slice>, GenerateError> {
    std::thread::scope(|scope| {
        let handles: Vec<_> = age_groups
            .iter()
            .map(|&age_group| {
                scope.spawn(move || {
                    let slice = engine.slice(age_group);
                    progress.slice_computed(age_group);
                    slice
                })
            })
            .collect();

        handles
            .into_iter()
            .zip(age_groups)
            .map(|(handle, age_group)| {
                handle.join().map_err(|_| GenerateError::Conversion {
                    message: format!("slice worker for '{age_group}' panicked"),
                })
            })
            .collect()
    })
}

fn write_output<T: Serialize + ?Sized>(
    dir: &Path,
    file_name: &str,
    value: &T,
    manifest: &mut Manifest,
) -> Result<(), GenerateError> {
    write_json(dir, file_name, value)?;
    manifest
        .outputs
        .insert(file_name.to_string(), chrono::Utc::now().to_rfc3339());
    Ok(())
}

/// Writes `value` to `dir/file_name` through a `.tmp` file and a rename, so
/// readers never see a partial file.
fn write_json<T: Serialize + ?Sized>(
    dir: &Path,
    file_name: &str,
    value: &T,
) -> Result<(), GenerateError> {
    let path = dir.join(file_name);
    let tmp_path = dir.join(format!("{file_name}.tmp"));
    let contents = serde_json::to_string(value)?;
    std::fs::write(&tmp_path, contents)?;
    std::fs::rename(&tmp_path, &path)?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}

/// Reads the manifest from `dir`, or `None` if there is none.
///
/// # Errors
///
/// Returns an error if the manifest exists but cannot be read or parsed.
pub fn load_manifest(dir: &Path) -> Result<Option<Manifest>, GenerateError> {
    let path = dir.join(MANIFEST_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path)?;
    Ok(Some(serde_json::from_str(&contents)?))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;

    use geojson::{Geometry, Value};
    use youth_map_demographics::Engine;
    use youth_map_demographics_models::RawRecord;
    use youth_map_geography_models::MunicipalityGeometry;

    /// A fresh directory under the system temp dir, unique per test.
    pub fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "youth_map_generate_{name}_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn square(x: f64) -> Geometry {
        Geometry::new(Value::Polygon(vec![vec![
            vec![x, 0.0],
            vec![x + 1.0, 0.0],
            vec![x + 1.0, 1.0],
            vec![x, 1.0],
            vec![x, 0.0],
        ]]))
    }

    /// Two surveyed municipalities, one surveyed twice under different
    /// spellings, plus a boundary without survey rows.
    pub fn engine() -> Engine {
        let records = vec![
            RawRecord::new("Manaus")
                .with_population(100.0)
                .with_income(1000.0)
                .with_vulnerability(0.2)
                .with_count("15-19 ANOS", 12)
                .with_count("15-19 ANOS, RAÇA PARDA", 12)
                .with_count("15 A 19 ANOS, ALFABETIZADAS", 11)
                .with_count("20-24 ANOS", 7)
                .with_count("20-24 ANOS, RAÇA BRANCA", 7)
                .with_count("20 A 24 ANOS, ALFABETIZADAS", 7),
            RawRecord::new("manaus ")
                .with_population(20.0)
                .with_income(1300.0)
                .with_vulnerability(0.4)
                .with_count("25-29 ANOS", 3)
                .with_count("25-29 ANOS, RAÇA PRETA", 3)
                .with_count("25 A 29 ANOS, ALFABETIZADAS", 2),
            RawRecord::new("Tefé")
                .with_population(300.0)
                .with_income(2000.0)
                .with_vulnerability(0.8)
                .with_count("15-19 ANOS", 9)
                .with_count("15-19 ANOS, RAÇA INDÍGENA", 9)
                .with_count("15 A 19 ANOS, ALFABETIZADAS", 3),
        ];
        let geometries = ["Manaus", "Tefé", "Japurá"]
            .iter()
            .enumerate()
            .map(|(i, name)| {
                #[allow(clippy::cast_precision_loss)]
                let x = i as f64;
                MunicipalityGeometry {
                    name: (*name).to_string(),
                    geometry: square(x),
                }
            })
            .collect();
        Engine::new(records, geometries).unwrap()
    }
}
