//! The aggregation engine over one immutable dataset.
//!
//! An [`Engine`] owns the raw survey rows and the boundary geometries loaded
//! at startup. Every output is recomputed from them on request; nothing is
//! mutated after construction, so one engine can be shared across threads.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use geojson::FeatureCollection;
use youth_map_demographics_models::{
    AgeGroup, MunicipalityAggregate, Ranking, RankingMetric, RawRecord, Summary, YouthStats,
    normalize_name,
};
use youth_map_geography::join::join;
use youth_map_geography::load::load_geometries;
use youth_map_geography_models::MunicipalityGeometry;

use crate::EngineError;
use crate::aggregate::{aggregate_municipalities, state_totals};
use crate::columns::{resolve, validate_table};
use crate::format::summarize;
use crate::load::load_raw_records;
use crate::provider::StatsProvider;
use crate::ranking::{DEFAULT_TOP_N, build_ranking};
use crate::weighted::WeightedStats;

/// Every output of one age-group selector.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    /// The selector this slice was computed for.
    pub age_group: AgeGroup,
    /// Aggregates keyed by normalized municipality name.
    pub municipalities: BTreeMap<String, MunicipalityAggregate>,
    /// The state-wide aggregate.
    pub state: YouthStats,
    /// The boundary map with statistics attached.
    pub map: FeatureCollection,
}

/// Aggregation engine over the survey rows and boundary geometries.
#[derive(Debug, Clone)]
pub struct Engine {
    records: Vec<RawRecord>,
    geometries: Vec<MunicipalityGeometry>,
    weighted: WeightedStats,
    names: Vec<String>,
}

impl Engine {
    /// Builds an engine over already-loaded inputs.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidColumnTable`] if the column table fails
    /// its startup check.
    pub fn new(
        records: Vec<RawRecord>,
        geometries: Vec<MunicipalityGeometry>,
    ) -> Result<Self, EngineError> {
        validate_table()?;

        let weighted = WeightedStats::compute(&records);
        let names = records
            .iter()
            .map(|record| normalize_name(&record.municipality))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();

        log::debug!(
            "Engine ready: {} rows, {} municipalities, {} boundaries",
            records.len(),
            names.len(),
            geometries.len()
        );

        Ok(Self {
            records,
            geometries,
            weighted,
            names,
        })
    }

    /// Loads the survey dataset and the boundary file, then builds the
    /// engine.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingInputData`] if either input cannot be
    /// read or parsed, or holds no usable rows.
    pub fn load(raw_path: &Path, map_path: &Path) -> Result<Self, EngineError> {
        let records = load_raw_records(raw_path)?;
        if records.is_empty() {
            return Err(EngineError::MissingInputData {
                origin: raw_path.display().to_string(),
                message: "dataset has no survey rows".to_string(),
            });
        }

        let geometries =
            load_geometries(map_path).map_err(|e| EngineError::MissingInputData {
                origin: map_path.display().to_string(),
                message: e.to_string(),
            })?;
        if geometries.is_empty() {
            return Err(EngineError::MissingInputData {
                origin: map_path.display().to_string(),
                message: "boundary file has no usable municipality geometries".to_string(),
            });
        }

        Self::new(records, geometries)
    }

    /// Number of raw survey rows.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Number of boundary geometries.
    #[must_use]
    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    /// Municipality aggregates for `age_group`.
    #[must_use]
    pub fn aggregates(&self, age_group: AgeGroup) -> BTreeMap<String, MunicipalityAggregate> {
        aggregate_municipalities(&self.records, &resolve(age_group), &self.weighted)
    }

    /// The state-wide aggregate for `age_group`.
    #[must_use]
    pub fn state_aggregate(&self, age_group: AgeGroup) -> YouthStats {
        let columns = resolve(age_group);
        let aggregates = aggregate_municipalities(&self.records, &columns, &self.weighted);
        state_totals(&aggregates, &columns, &self.weighted)
    }

    /// Computes every output of `age_group` in one pass.
    #[must_use]
    pub fn slice(&self, age_group: AgeGroup) -> Slice {
        let columns = resolve(age_group);
        let municipalities = aggregate_municipalities(&self.records, &columns, &self.weighted);
        let state = state_totals(&municipalities, &columns, &self.weighted);
        let map = join(&self.geometries, &municipalities);

        log::debug!(
            "Slice {age_group}: {} municipalities, {} youth, {} map features",
            municipalities.len(),
            state.total_youth,
            map.features.len()
        );

        Slice {
            age_group,
            municipalities,
            state,
            map,
        }
    }
}

impl StatsProvider for Engine {
    fn state_summary(&self, age_group: AgeGroup) -> Result<Summary, EngineError> {
        Ok(summarize(&self.state_aggregate(age_group)))
    }

    fn municipality_summary(
        &self,
        name: &str,
        age_group: AgeGroup,
    ) -> Result<Summary, EngineError> {
        let key = normalize_name(name);
        if self.names.binary_search(&key).is_err() {
            return Err(EngineError::NotFound {
                name: name.to_string(),
            });
        }

        self.aggregates(age_group)
            .get(&key)
            .map(|aggregate| summarize(&aggregate.stats))
            .ok_or_else(|| EngineError::NotFound {
                name: name.to_string(),
            })
    }

    fn municipality_names(&self) -> Result<Vec<String>, EngineError> {
        Ok(self.names.clone())
    }

    fn map(&self, age_group: AgeGroup) -> Result<FeatureCollection, EngineError> {
        Ok(join(&self.geometries, &self.aggregates(age_group)))
    }

    fn ranking(
        &self,
        metric: RankingMetric,
        age_group: AgeGroup,
    ) -> Result<Ranking, EngineError> {
        Ok(build_ranking(
            &self.aggregates(age_group),
            metric,
            DEFAULT_TOP_N,
        ))
    }
}
