//! Groups raw rows by municipality and sums the columns of one age group.
//!
//! The state-wide aggregate is a reduction of the municipality aggregates,
//! so state and municipality figures always agree.

use std::collections::BTreeMap;

use youth_map_demographics_models::{
    MunicipalityAggregate, RaceCounts, RawRecord, YouthStats, normalize_name,
};

use crate::columns::ColumnSet;
use crate::weighted::{WeightedMeans, WeightedStats};

/// Literate share of youth in percent. Exactly 0 when there are no youth.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn literacy_rate(literate: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        literate as f64 / total as f64 * 100.0
    }
}

fn saturating_sum(counts: impl Iterator<Item = u64>) -> u64 {
    counts.fold(0, u64::saturating_add)
}

/// Running column sums for one group of rows. Sums saturate at `u64::MAX`.
#[derive(Debug, Clone)]
struct ColumnSums {
    ages: BTreeMap<String, u64>,
    literate: u64,
    race: RaceCounts,
}

impl ColumnSums {
    fn new(columns: &ColumnSet) -> Self {
        Self {
            ages: columns.age.iter().map(|c| (c.clone(), 0)).collect(),
            literate: 0,
            race: RaceCounts::default(),
        }
    }

    fn add(&mut self, record: &RawRecord, columns: &ColumnSet) {
        for (column, total) in &mut self.ages {
            *total = total.saturating_add(record.count(column));
        }
        self.literate = self.literate.saturating_add(saturating_sum(
            columns.literacy.iter().map(|column| record.count(column)),
        ));
        for (race, race_columns) in &columns.race {
            let count = saturating_sum(race_columns.iter().map(|column| record.count(column)));
            self.race.add(*race, count);
        }
    }

    fn finish(self, means: WeightedMeans) -> YouthStats {
        let total_youth = saturating_sum(self.ages.values().copied());
        YouthStats {
            total_youth,
            literate_youth: self.literate,
            literacy_rate: literacy_rate(self.literate, total_youth),
            race: self.race,
            ages: self.ages,
            population: means.population,
            income: means.income,
            vulnerability: means.vulnerability,
        }
    }
}

/// Aggregates `records` per normalized municipality name.
///
/// Returns one entry per distinct municipality present in `records`,
/// ordered by name. Columns missing from a row count as 0.
#[must_use]
pub fn aggregate_municipalities(
    records: &[RawRecord],
    columns: &ColumnSet,
    weighted: &WeightedStats,
) -> BTreeMap<String, MunicipalityAggregate> {
    let mut groups: BTreeMap<String, ColumnSums> = BTreeMap::new();

    for record in records {
        groups
            .entry(normalize_name(&record.municipality))
            .or_insert_with(|| ColumnSums::new(columns))
            .add(record, columns);
    }

    groups
        .into_iter()
        .map(|(name, sums)| {
            let stats = sums.finish(weighted.municipality(&name));
            (name.clone(), MunicipalityAggregate { name, stats })
        })
        .collect()
}

/// Reduces municipality aggregates into the state aggregate.
///
/// Counts are summed and the literacy rate recomputed from the sums; income
/// and vulnerability come from the state-wide weighting over raw rows.
#[must_use]
pub fn state_totals(
    aggregates: &BTreeMap<String, MunicipalityAggregate>,
    columns: &ColumnSet,
    weighted: &WeightedStats,
) -> YouthStats {
    let mut sums = ColumnSums::new(columns);

    for aggregate in aggregates.values() {
        let stats = &aggregate.stats;
        for (column, count) in &stats.ages {
            let total = sums.ages.entry(column.clone()).or_default();
            *total = total.saturating_add(*count);
        }
        sums.literate = sums.literate.saturating_add(stats.literate_youth);
        sums.race.merge(&stats.race);
    }

    sums.finish(weighted.state())
}
