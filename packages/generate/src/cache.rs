//! Serves the dashboard from a cache written by [`crate::generate`].

use std::collections::BTreeMap;
use std::path::Path;

use geojson::FeatureCollection;
use serde::de::DeserializeOwned;
use youth_map_demographics::format::summarize;
use youth_map_demographics::ranking::{DEFAULT_TOP_N, build_ranking};
use youth_map_demographics::columns::validate_table;
use youth_map_demographics::{EngineError, StatsProvider, parse_age_group};
use youth_map_demographics_models::{
    AgeGroup, MunicipalityAggregate, Ranking, RankingMetric, Summary, YouthStats, normalize_name,
};

use crate::{
    GenerateError, MANIFEST_VERSION, MAP_FILE, MUNICIPALITIES_FILE, NAMES_FILE, STATE_FILE,
    load_manifest,
};

/// Pre-computed aggregates of every age group, loaded into memory.
#[derive(Debug, Clone)]
pub struct CachedStats {
    municipalities: BTreeMap<AgeGroup, BTreeMap<String, MunicipalityAggregate>>,
    states: BTreeMap<AgeGroup, YouthStats>,
    maps: BTreeMap<AgeGroup, FeatureCollection>,
    names: Vec<String>,
}

impl CachedStats {
    /// Loads the cache in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the column table fails its startup check, if the
    /// manifest is missing or from another layout version, if a cache file
    /// cannot be read or parsed, or if any age group is missing from it.
    pub fn open(dir: &Path) -> Result<Self, GenerateError> {
        log::info!("Loading cached statistics from {}...", dir.display());
        validate_table()?;

        let manifest = load_manifest(dir)?.ok_or_else(|| GenerateError::Conversion {
            message: format!("no manifest in {}", dir.display()),
        })?;
        if manifest.version != MANIFEST_VERSION {
            return Err(GenerateError::Conversion {
                message: format!(
                    "cache layout version {} is not supported (expected {MANIFEST_VERSION})",
                    manifest.version
                ),
            });
        }

        let stats = Self {
            municipalities: read_slices(dir, MUNICIPALITIES_FILE)?,
            states: read_slices(dir, STATE_FILE)?,
            maps: read_slices(dir, MAP_FILE)?,
            names: read_json(dir, NAMES_FILE)?,
        };

        log::info!(
            "Loaded cache generated at {} from {} rows ({} municipalities)",
            manifest.generated_at,
            manifest.record_count,
            stats.names.len()
        );

        Ok(stats)
    }
}

fn read_json<T: DeserializeOwned>(dir: &Path, file_name: &str) -> Result<T, GenerateError> {
    let contents = std::fs::read_to_string(dir.join(file_name))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Reads a file keyed by age-group selector and checks that every selector
/// is present.
fn read_slices<T: DeserializeOwned>(
    dir: &Path,
    file_name: &str,
) -> Result<BTreeMap<AgeGroup, T>, GenerateError> {
    let raw: BTreeMap<String, T> = read_json(dir, file_name)?;
    let slices = raw
        .into_iter()
        .map(|(key, value)| Ok((parse_age_group(&key)?, value)))
        .collect::<Result<BTreeMap<_, _>, GenerateError>>()?;

    if let Some(missing) = AgeGroup::all().iter().find(|g| !slices.contains_key(*g)) {
        return Err(GenerateError::Conversion {
            message: format!("{file_name} has no '{missing}' slice"),
        });
    }

    Ok(slices)
}

fn slice<T>(slices: &BTreeMap<AgeGroup, T>, age_group: AgeGroup) -> Result<&T, EngineError> {
    slices
        .get(&age_group)
        .ok_or_else(|| EngineError::MissingInputData {
            origin: "cache".to_string(),
            message: format!("no '{age_group}' slice"),
        })
}

impl StatsProvider for CachedStats {
    fn state_summary(&self, age_group: AgeGroup) -> Result<Summary, EngineError> {
        Ok(summarize(slice(&self.states, age_group)?))
    }

    fn municipality_summary(
        &self,
        name: &str,
        age_group: AgeGroup,
    ) -> Result<Summary, EngineError> {
        slice(&self.municipalities, age_group)?
            .get(&normalize_name(name))
            .map(|aggregate| summarize(&aggregate.stats))
            .ok_or_else(|| EngineError::NotFound {
                name: name.to_string(),
            })
    }

    fn municipality_names(&self) -> Result<Vec<String>, EngineError> {
        Ok(self.names.clone())
    }

    fn map(&self, age_group: AgeGroup) -> Result<FeatureCollection, EngineError> {
        slice(&self.maps, age_group).cloned()
    }

    fn ranking(
        &self,
        metric: RankingMetric,
        age_group: AgeGroup,
    ) -> Result<Ranking, EngineError> {
        Ok(build_ranking(
            slice(&self.municipalities, age_group)?,
            metric,
            DEFAULT_TOP_N,
        ))
    }
}
