//! Resolves an [`AgeGroup`] selector to the raw dataset columns it sums.
//!
//! Column names are generated from one table of survey brackets rather than
//! spelled out per selector, so `geral` is by construction the union of the
//! three single-bracket selectors.

use std::collections::{BTreeMap, BTreeSet};

use youth_map_demographics_models::{AgeGroup, Race};

use crate::EngineError;

/// Survey brackets as `(selector, lower age, upper age)`, youngest first.
const BRACKETS: [(AgeGroup, u8, u8); 3] = [
    (AgeGroup::Ages15To19, 15, 19),
    (AgeGroup::Ages20To24, 20, 24),
    (AgeGroup::Ages25To29, 25, 29),
];

/// The raw columns one selector sums.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSet {
    /// Youth count columns, one per bracket (e.g. `"15-19 ANOS"`).
    pub age: Vec<String>,
    /// Per race, its youth count columns, one per bracket
    /// (e.g. `"15-19 ANOS, RAÇA PARDA"`).
    pub race: BTreeMap<Race, Vec<String>>,
    /// Literate youth columns, one per bracket
    /// (e.g. `"15 A 19 ANOS, ALFABETIZADAS"`).
    pub literacy: Vec<String>,
}

impl ColumnSet {
    /// Every column of the set: age, then race, then literacy.
    pub fn all_columns(&self) -> impl Iterator<Item = &str> {
        self.age
            .iter()
            .chain(self.race.values().flatten())
            .chain(self.literacy.iter())
            .map(String::as_str)
    }
}

fn age_column(lower: u8, upper: u8) -> String {
    format!("{lower}-{upper} ANOS")
}

fn race_column(lower: u8, upper: u8, race: Race) -> String {
    format!("{lower}-{upper} ANOS, RAÇA {}", race.column_label())
}

fn literacy_column(lower: u8, upper: u8) -> String {
    format!("{lower} A {upper} ANOS, ALFABETIZADAS")
}

/// Resolves the columns of `age_group`.
#[must_use]
pub fn resolve(age_group: AgeGroup) -> ColumnSet {
    let mut set = ColumnSet::default();

    for &(bracket, lower, upper) in &BRACKETS {
        if !age_group.includes(bracket) {
            continue;
        }
        set.age.push(age_column(lower, upper));
        for race in Race::all() {
            set.race
                .entry(*race)
                .or_default()
                .push(race_column(lower, upper, *race));
        }
        set.literacy.push(literacy_column(lower, upper));
    }

    set
}

/// Checks the generated table once at startup.
///
/// Every bracket must be covered by `geral`, every generated name must be
/// distinct, and the `geral` set must equal the concatenation of the
/// single-bracket sets.
///
/// # Errors
///
/// Returns [`EngineError::InvalidColumnTable`] describing the first
/// violation found.
pub fn validate_table() -> Result<(), EngineError> {
    let invalid = |message: String| EngineError::InvalidColumnTable { message };

    let brackets: Vec<AgeGroup> = BRACKETS.iter().map(|(bracket, ..)| *bracket).collect();
    if brackets != AgeGroup::brackets() {
        return Err(invalid(format!(
            "bracket table {brackets:?} does not match the age-group selectors"
        )));
    }

    let all = resolve(AgeGroup::All);
    let mut seen = BTreeSet::new();
    for column in all.all_columns() {
        if !seen.insert(column) {
            return Err(invalid(format!("duplicate column '{column}'")));
        }
    }

    let mut union = ColumnSet::default();
    for bracket in AgeGroup::brackets() {
        let set = resolve(*bracket);
        union.age.extend(set.age);
        for (race, columns) in set.race {
            union.race.entry(race).or_default().extend(columns);
        }
        union.literacy.extend(set.literacy);
    }
    if union != all {
        return Err(invalid(
            "'geral' columns differ from the union of the single brackets".to_string(),
        ));
    }

    Ok(())
}
