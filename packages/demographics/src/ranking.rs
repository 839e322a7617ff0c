//! Top/bottom rankings of municipalities by one metric.
//!
//! `vulnerabilidade` ranks ascending (lower is better); the other metrics
//! rank descending. Ties order by municipality name. The bottom list is the
//! tail of that order reversed, so it reads worst first, opposite to the
//! top list.
//!
//! Which municipalities take part depends on the metric:
//!
//! * `populacao`: all of them; zero youth is a real count.
//! * `alfabetizacao`: only those with youth, since the rate of a
//!   municipality without youth is a zero placeholder.
//! * `renda` and `vulnerabilidade`: only those with a positive population
//!   weight, since their weighted means are placeholders otherwise.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use youth_map_demographics_models::{
    MunicipalityAggregate, Ranking, RankingEntry, RankingMetric, RankingValue, YouthStats,
};

/// Number of entries in each list of a dashboard ranking.
pub const DEFAULT_TOP_N: usize = 5;

/// Reads the metric from a municipality's statistics.
#[must_use]
pub const fn metric_value(stats: &YouthStats, metric: RankingMetric) -> RankingValue {
    match metric {
        RankingMetric::Vulnerabilidade => RankingValue::Measure(stats.vulnerability),
        RankingMetric::Renda => RankingValue::Measure(stats.income),
        RankingMetric::Alfabetizacao => RankingValue::Measure(stats.literacy_rate),
        RankingMetric::Populacao => RankingValue::Count(stats.total_youth),
    }
}

/// Whether a municipality takes part in the ranking of `metric`.
#[must_use]
pub fn is_eligible(stats: &YouthStats, metric: RankingMetric) -> bool {
    match metric {
        RankingMetric::Populacao => true,
        RankingMetric::Alfabetizacao => stats.total_youth > 0,
        RankingMetric::Renda | RankingMetric::Vulnerabilidade => stats.population > 0.0,
    }
}

fn compare(metric: RankingMetric, a: &RankingEntry, b: &RankingEntry) -> Ordering {
    let (a_value, b_value) = (a.value.as_f64(), b.value.as_f64());
    let primary = if metric.ascending() {
        a_value.total_cmp(&b_value)
    } else {
        b_value.total_cmp(&a_value)
    };
    primary.then_with(|| a.municipio.cmp(&b.municipio))
}

/// Builds the top-`top_n` and bottom-`top_n` lists for `metric`.
///
/// With fewer than `top_n` eligible municipalities both lists are shorter;
/// with fewer than `2 * top_n` they overlap.
#[must_use]
pub fn build_ranking(
    aggregates: &BTreeMap<String, MunicipalityAggregate>,
    metric: RankingMetric,
    top_n: usize,
) -> Ranking {
    let mut entries: Vec<RankingEntry> = aggregates
        .values()
        .filter(|aggregate| is_eligible(&aggregate.stats, metric))
        .map(|aggregate| RankingEntry {
            municipio: aggregate.name.clone(),
            value: metric_value(&aggregate.stats, metric),
        })
        .collect();

    entries.sort_by(|a, b| compare(metric, a, b));

    let top_5 = entries.iter().take(top_n).cloned().collect();
    let bottom_5 = entries[entries.len().saturating_sub(top_n)..]
        .iter()
        .rev()
        .cloned()
        .collect();

    Ranking { top_5, bottom_5 }
}
