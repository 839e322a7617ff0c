//! Shapes aggregates into the dashboard [`Summary`].
//!
//! Runs on read in both live and cached modes, so a summary built from a
//! cached aggregate is identical to one built from a fresh aggregation.

use youth_map_demographics_models::{Summary, YouthStats};

/// Rounds to 2 decimal places, halves away from zero.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Display label of a raw age column: `"15-19 ANOS"` becomes `"15 a 19"`.
#[must_use]
pub fn age_label(column: &str) -> String {
    column.replace(" ANOS", "").replace('-', " a ")
}

/// Builds the summary of a municipality or of the state.
#[must_use]
pub fn summarize(stats: &YouthStats) -> Summary {
    Summary {
        total_jovens: stats.total_youth,
        renda_media: round2(stats.income),
        taxa_alfabetizacao_jovens: round2(stats.literacy_rate),
        distribuicao_etaria: stats
            .ages
            .iter()
            .map(|(column, count)| (age_label(column), *count))
            .collect(),
        distribuicao_raca: stats.race,
    }
}
