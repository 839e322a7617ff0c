#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Survey vocabularies, raw record and aggregate types.
//!
//! This crate defines the closed vocabularies of the youth dashboard (age
//! group selectors, race categories and ranking metrics), the raw survey
//! row as loaded from the source dataset, the per-municipality aggregates
//! computed from it, and the output shapes served to the dashboard.

pub mod normalize;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use normalize::normalize_name;

/// Age-group selector. Determines which raw columns take part in every sum.
///
/// The three bracket variants map to one survey bracket each; [`Self::All`]
/// (`geral`) is the union of the three.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum AgeGroup {
    /// All three brackets combined.
    #[serde(rename = "geral")]
    #[strum(serialize = "geral")]
    All,
    /// Youth aged 15 to 19.
    #[serde(rename = "15-19")]
    #[strum(serialize = "15-19")]
    Ages15To19,
    /// Youth aged 20 to 24.
    #[serde(rename = "20-24")]
    #[strum(serialize = "20-24")]
    Ages20To24,
    /// Youth aged 25 to 29.
    #[serde(rename = "25-29")]
    #[strum(serialize = "25-29")]
    Ages25To29,
}

impl AgeGroup {
    /// Returns all selectors, `geral` first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::All,
            Self::Ages15To19,
            Self::Ages20To24,
            Self::Ages25To29,
        ]
    }

    /// Returns the single-bracket selectors, youngest first.
    #[must_use]
    pub const fn brackets() -> &'static [Self] {
        &[Self::Ages15To19, Self::Ages20To24, Self::Ages25To29]
    }

    /// Whether this selector covers the given bracket.
    #[must_use]
    pub fn includes(self, bracket: Self) -> bool {
        self == Self::All || self == bracket
    }
}

/// Racial category as recorded by the survey. Closed set; there is no
/// "other" bucket.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Race {
    /// Branca
    Branca,
    /// Preta
    Preta,
    /// Parda
    Parda,
    /// Indígena
    Indigena,
    /// Amarela
    Amarela,
}

impl Race {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Branca,
            Self::Preta,
            Self::Parda,
            Self::Indigena,
            Self::Amarela,
        ]
    }

    /// The spelling used for this race inside raw column names
    /// (e.g. `"15-19 ANOS, RAÇA INDÍGENA"`).
    #[must_use]
    pub const fn column_label(self) -> &'static str {
        match self {
            Self::Branca => "BRANCA",
            Self::Preta => "PRETA",
            Self::Parda => "PARDA",
            Self::Indigena => "INDÍGENA",
            Self::Amarela => "AMARELA",
        }
    }
}

/// Metric a ranking can be built on.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RankingMetric {
    /// Population-weighted vulnerability score. Lower is better.
    Vulnerabilidade,
    /// Population-weighted mean income.
    Renda,
    /// Youth literacy rate.
    Alfabetizacao,
    /// Total youth count.
    Populacao,
}

impl RankingMetric {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Vulnerabilidade,
            Self::Renda,
            Self::Alfabetizacao,
            Self::Populacao,
        ]
    }

    /// Whether ascending order defines the top of the ranking.
    #[must_use]
    pub const fn ascending(self) -> bool {
        matches!(self, Self::Vulnerabilidade)
    }
}

/// One raw survey row: a demographic sub-group within a municipality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Municipality name as spelled in the source.
    pub municipality: String,
    /// Count columns keyed by raw column name. Absent columns read as 0.
    pub counts: BTreeMap<String, u64>,
    /// Number of people the row represents. Used as the weight for income
    /// and vulnerability.
    pub population: f64,
    /// Average income of the row.
    pub income: f64,
    /// Vulnerability score of the row.
    pub vulnerability: f64,
}

impl RawRecord {
    /// Creates an empty record for a municipality.
    #[must_use]
    pub fn new(municipality: impl Into<String>) -> Self {
        Self {
            municipality: municipality.into(),
            counts: BTreeMap::new(),
            population: 0.0,
            income: 0.0,
            vulnerability: 0.0,
        }
    }

    /// Sets a count column.
    #[must_use]
    pub fn with_count(mut self, column: impl Into<String>, count: u64) -> Self {
        self.counts.insert(column.into(), count);
        self
    }

    /// Sets the population weight.
    #[must_use]
    pub const fn with_population(mut self, population: f64) -> Self {
        self.population = population;
        self
    }

    /// Sets the average income.
    #[must_use]
    pub const fn with_income(mut self, income: f64) -> Self {
        self.income = income;
        self
    }

    /// Sets the vulnerability score.
    #[must_use]
    pub const fn with_vulnerability(mut self, vulnerability: f64) -> Self {
        self.vulnerability = vulnerability;
        self
    }

    /// Reads a count column, 0 when absent.
    #[must_use]
    pub fn count(&self, column: &str) -> u64 {
        self.counts.get(column).copied().unwrap_or(0)
    }
}

/// Youth counts per race. Field order is the output order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceCounts {
    /// Branca
    pub branca: u64,
    /// Preta
    pub preta: u64,
    /// Parda
    pub parda: u64,
    /// Indígena
    pub indigena: u64,
    /// Amarela
    pub amarela: u64,
}

impl RaceCounts {
    /// Returns the count for one race.
    #[must_use]
    pub const fn get(&self, race: Race) -> u64 {
        match race {
            Race::Branca => self.branca,
            Race::Preta => self.preta,
            Race::Parda => self.parda,
            Race::Indigena => self.indigena,
            Race::Amarela => self.amarela,
        }
    }

    /// Adds `count` to one race, saturating at `u64::MAX`.
    pub const fn add(&mut self, race: Race, count: u64) {
        match race {
            Race::Branca => self.branca = self.branca.saturating_add(count),
            Race::Preta => self.preta = self.preta.saturating_add(count),
            Race::Parda => self.parda = self.parda.saturating_add(count),
            Race::Indigena => self.indigena = self.indigena.saturating_add(count),
            Race::Amarela => self.amarela = self.amarela.saturating_add(count),
        }
    }

    /// Adds every race of `other` into `self`.
    pub fn merge(&mut self, other: &Self) {
        for race in Race::all() {
            self.add(*race, other.get(*race));
        }
    }

    /// Sum over all races.
    #[must_use]
    pub fn total(&self) -> u64 {
        Race::all()
            .iter()
            .fold(0, |total: u64, race| total.saturating_add(self.get(*race)))
    }
}

/// Aggregated youth statistics for one area (a municipality or the whole
/// state) and one age group.
///
/// All zero ([`Default`]) is the value attached to areas without data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YouthStats {
    /// Sum of the selected age columns.
    pub total_youth: u64,
    /// Sum of the selected literacy columns.
    pub literate_youth: u64,
    /// `literate_youth / total_youth * 100`, exactly 0 when there are no
    /// youth.
    pub literacy_rate: f64,
    /// Youth per race over the selected brackets.
    pub race: RaceCounts,
    /// Youth per selected age column, keyed by raw column name.
    pub ages: BTreeMap<String, u64>,
    /// Sum of the population weights of the raw rows.
    pub population: f64,
    /// Population-weighted mean income.
    pub income: f64,
    /// Population-weighted mean vulnerability score.
    pub vulnerability: f64,
}

/// [`YouthStats`] of one municipality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MunicipalityAggregate {
    /// Normalized municipality name.
    pub name: String,
    /// Statistics for the age group this aggregate was computed for.
    pub stats: YouthStats,
}

/// Dashboard summary of a municipality or of the state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Total youth in the selected age group.
    pub total_jovens: u64,
    /// Weighted mean income, rounded to 2 decimals.
    pub renda_media: f64,
    /// Literacy rate in percent, rounded to 2 decimals.
    pub taxa_alfabetizacao_jovens: f64,
    /// Youth per age bracket keyed by display label (e.g. `"15 a 19"`).
    pub distribuicao_etaria: BTreeMap<String, u64>,
    /// Youth per race.
    pub distribuicao_raca: RaceCounts,
}

/// Value attached to a ranking entry. Counts stay integral on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RankingValue {
    /// An integral count (`populacao`).
    Count(u64),
    /// A rate or mean.
    Measure(f64),
}

impl RankingValue {
    /// The value as a float, for ordering.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(self) -> f64 {
        match self {
            Self::Count(count) => count as f64,
            Self::Measure(value) => value,
        }
    }
}

/// One municipality in a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    /// Normalized municipality name.
    pub municipio: String,
    /// Metric value.
    pub value: RankingValue,
}

/// Top and bottom entries for one metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    /// Best entries, best first.
    pub top_5: Vec<RankingEntry>,
    /// Worst entries, sorted opposite to `top_5` (worst first).
    pub bottom_5: Vec<RankingEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_group_parses_selectors() {
        assert_eq!("geral".parse::<AgeGroup>().unwrap(), AgeGroup::All);
        assert_eq!("15-19".parse::<AgeGroup>().unwrap(), AgeGroup::Ages15To19);
        assert_eq!("20-24".parse::<AgeGroup>().unwrap(), AgeGroup::Ages20To24);
        assert_eq!("25-29".parse::<AgeGroup>().unwrap(), AgeGroup::Ages25To29);
        assert!("30-34".parse::<AgeGroup>().is_err());
        assert!("GERAL".parse::<AgeGroup>().is_err());
    }

    #[test]
    fn age_group_display_roundtrip() {
        for group in AgeGroup::all() {
            assert_eq!(group.to_string().parse::<AgeGroup>().unwrap(), *group);
        }
    }

    #[test]
    fn age_group_serializes_as_selector() {
        assert_eq!(
            serde_json::to_string(&AgeGroup::Ages20To24).unwrap(),
            "\"20-24\""
        );
        assert_eq!(serde_json::to_string(&AgeGroup::All).unwrap(), "\"geral\"");
    }

    #[test]
    fn race_counts_saturate() {
        let mut counts = RaceCounts::default();
        counts.add(Race::Parda, u64::MAX);
        counts.add(Race::Parda, 1);
        counts.add(Race::Preta, 5);
        assert_eq!(counts.get(Race::Parda), u64::MAX);
        assert_eq!(counts.total(), u64::MAX);

        let mut merged = counts;
        merged.merge(&counts);
        assert_eq!(merged.get(Race::Preta), 10);
        assert_eq!(merged.get(Race::Parda), u64::MAX);
    }

    #[test]
    fn all_covers_every_bracket() {
        for bracket in AgeGroup::brackets() {
            assert!(AgeGroup::All.includes(*bracket));
            assert!(bracket.includes(*bracket));
        }
        assert!(!AgeGroup::Ages15To19.includes(AgeGroup::Ages20To24));
    }

    #[test]
    fn metric_parses_and_orders() {
        assert_eq!(
            "vulnerabilidade".parse::<RankingMetric>().unwrap(),
            RankingMetric::Vulnerabilidade
        );
        assert!("idade".parse::<RankingMetric>().is_err());
        for metric in RankingMetric::all() {
            assert_eq!(
                metric.ascending(),
                *metric == RankingMetric::Vulnerabilidade,
                "{metric} has the wrong sort direction"
            );
        }
    }

    #[test]
    fn race_counts_total_and_merge() {
        let mut counts = RaceCounts::default();
        counts.add(Race::Parda, 7);
        counts.add(Race::Indigena, 3);

        let mut other = RaceCounts::default();
        other.add(Race::Parda, 1);
        counts.merge(&other);

        assert_eq!(counts.get(Race::Parda), 8);
        assert_eq!(counts.total(), 11);
    }

    #[test]
    fn missing_count_reads_zero() {
        let record = RawRecord::new("Manaus").with_count("15-19 ANOS", 4);
        assert_eq!(record.count("15-19 ANOS"), 4);
        assert_eq!(record.count("20-24 ANOS"), 0);
    }

    #[test]
    fn ranking_value_keeps_counts_integral() {
        assert_eq!(serde_json::to_string(&RankingValue::Count(12)).unwrap(), "12");
        assert_eq!(
            serde_json::to_string(&RankingValue::Measure(0.5)).unwrap(),
            "0.5"
        );
    }
}
