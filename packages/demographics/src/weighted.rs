//! Population-weighted income and vulnerability means.
//!
//! Income and vulnerability do not vary by age bracket in the survey, so
//! they are weighted over raw rows once per dataset and shared by every
//! age-group slice. State-wide means are weighted over all rows directly,
//! never averaged from municipality means.

use std::collections::BTreeMap;

use youth_map_demographics_models::{RawRecord, normalize_name};

/// Weighted means for one area.
///
/// Both means are 0 when the area's total population weight is 0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightedMeans {
    /// `Σ(income × population) / Σ population`
    pub income: f64,
    /// `Σ(vulnerability × population) / Σ population`
    pub vulnerability: f64,
    /// `Σ population`
    pub population: f64,
}

#[derive(Debug, Clone, Copy, Default)]
struct WeightedSum {
    income: f64,
    vulnerability: f64,
    population: f64,
}

impl WeightedSum {
    fn add(&mut self, record: &RawRecord) {
        self.income += record.income * record.population;
        self.vulnerability += record.vulnerability * record.population;
        self.population += record.population;
    }

    fn means(self) -> WeightedMeans {
        if self.population > 0.0 {
            WeightedMeans {
                income: self.income / self.population,
                vulnerability: self.vulnerability / self.population,
                population: self.population,
            }
        } else {
            WeightedMeans {
                population: self.population,
                ..WeightedMeans::default()
            }
        }
    }
}

/// Weighted means per municipality and for the whole state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightedStats {
    municipalities: BTreeMap<String, WeightedMeans>,
    state: WeightedMeans,
}

impl WeightedStats {
    /// Weights every raw row by its population.
    #[must_use]
    pub fn compute(records: &[RawRecord]) -> Self {
        let mut municipalities: BTreeMap<String, WeightedSum> = BTreeMap::new();
        let mut state = WeightedSum::default();

        for record in records {
            municipalities
                .entry(normalize_name(&record.municipality))
                .or_default()
                .add(record);
            state.add(record);
        }

        Self {
            municipalities: municipalities
                .into_iter()
                .map(|(name, sum)| (name, sum.means()))
                .collect(),
            state: state.means(),
        }
    }

    /// Means of one municipality by normalized name, zero when unknown.
    #[must_use]
    pub fn municipality(&self, name: &str) -> WeightedMeans {
        self.municipalities.get(name).copied().unwrap_or_default()
    }

    /// State-wide means over all rows.
    #[must_use]
    pub const fn state(&self) -> WeightedMeans {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn weights_state_by_population() {
        let records = vec![
            RawRecord::new("A")
                .with_population(100.0)
                .with_income(1000.0)
                .with_vulnerability(0.2),
            RawRecord::new("B")
                .with_population(300.0)
                .with_income(2000.0)
                .with_vulnerability(0.8),
        ];

        let stats = WeightedStats::compute(&records);
        assert!(close(stats.state().income, 1750.0));
        assert!(close(stats.state().vulnerability, 0.65));
        assert!(close(stats.state().population, 400.0));
    }

    #[test]
    fn state_mean_differs_from_mean_of_means() {
        let records = vec![
            RawRecord::new("A").with_population(100.0).with_income(1000.0),
            RawRecord::new("B").with_population(300.0).with_income(2000.0),
        ];
        let stats = WeightedStats::compute(&records);
        let unweighted =
            (stats.municipality("A").income + stats.municipality("B").income) / 2.0;

        assert!(close(unweighted, 1500.0));
        assert!(!close(stats.state().income, unweighted));
    }

    #[test]
    fn weights_rows_within_a_municipality() {
        let records = vec![
            RawRecord::new("Coari").with_population(1.0).with_income(100.0),
            RawRecord::new(" coari ").with_population(3.0).with_income(500.0),
        ];
        let means = WeightedStats::compute(&records).municipality("COARI");
        assert!(close(means.income, 400.0));
        assert!(close(means.population, 4.0));
    }

    #[test]
    fn zero_population_yields_zero_means() {
        let records = vec![
            RawRecord::new("Vazio")
                .with_population(0.0)
                .with_income(5000.0)
                .with_vulnerability(0.9),
        ];
        let stats = WeightedStats::compute(&records);
        let means = stats.municipality("VAZIO");
        assert!(close(means.income, 0.0));
        assert!(close(means.vulnerability, 0.0));
        assert!(close(stats.state().income, 0.0));
        assert!(!means.income.is_nan());
    }

    #[test]
    fn empty_dataset() {
        let stats = WeightedStats::compute(&[]);
        assert_eq!(stats.state(), WeightedMeans::default());
        assert_eq!(stats.municipality("MANAUS"), WeightedMeans::default());
    }
}
