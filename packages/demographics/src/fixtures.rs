//! Small in-code survey dataset shared by the unit tests.
//!
//! | municipality | rows | population | income | vulnerability | 15-19 | 20-24 | 25-29 |
//! |---|---|---|---|---|---|---|---|
//! | MANAUS | 2 | 150 | 1000 | 0.2 | 16 | 20 | 30 |
//! | TEFÉ | 1 | 300 | 2000 | 0.8 | 8 | 4 | 2 |
//! | COARI | 1 | 0 | 0 | 0 | 5 | 0 | 0 |
//!
//! Race columns always add up to the age column of the same bracket.

use geojson::{Geometry, Value};
use youth_map_demographics_models::RawRecord;
use youth_map_geography_models::MunicipalityGeometry;

pub fn records() -> Vec<RawRecord> {
    vec![
        RawRecord::new("Manaus")
            .with_population(100.0)
            .with_income(1000.0)
            .with_vulnerability(0.2)
            .with_count("15-19 ANOS", 10)
            .with_count("15-19 ANOS, RAÇA BRANCA", 2)
            .with_count("15-19 ANOS, RAÇA PARDA", 6)
            .with_count("15-19 ANOS, RAÇA INDÍGENA", 2)
            .with_count("15 A 19 ANOS, ALFABETIZADAS", 9)
            .with_count("20-24 ANOS", 20)
            .with_count("20-24 ANOS, RAÇA PARDA", 15)
            .with_count("20-24 ANOS, RAÇA PRETA", 5)
            .with_count("20 A 24 ANOS, ALFABETIZADAS", 18)
            .with_count("25-29 ANOS", 30)
            .with_count("25-29 ANOS, RAÇA PARDA", 20)
            .with_count("25-29 ANOS, RAÇA BRANCA", 5)
            .with_count("25-29 ANOS, RAÇA AMARELA", 5)
            .with_count("25 A 29 ANOS, ALFABETIZADAS", 25),
        RawRecord::new(" manaus")
            .with_population(50.0)
            .with_income(1000.0)
            .with_vulnerability(0.2)
            .with_count("15-19 ANOS", 6)
            .with_count("15-19 ANOS, RAÇA PARDA", 6)
            .with_count("15 A 19 ANOS, ALFABETIZADAS", 6),
        RawRecord::new("Tefé")
            .with_population(300.0)
            .with_income(2000.0)
            .with_vulnerability(0.8)
            .with_count("15-19 ANOS", 8)
            .with_count("15-19 ANOS, RAÇA INDÍGENA", 8)
            .with_count("15 A 19 ANOS, ALFABETIZADAS", 4)
            .with_count("20-24 ANOS", 4)
            .with_count("20-24 ANOS, RAÇA PARDA", 4)
            .with_count("20 A 24 ANOS, ALFABETIZADAS", 4)
            .with_count("25-29 ANOS", 2)
            .with_count("25-29 ANOS, RAÇA PARDA", 2)
            .with_count("25 A 29 ANOS, ALFABETIZADAS", 1),
        RawRecord::new("COARI ")
            .with_count("15-19 ANOS", 5)
            .with_count("15-19 ANOS, RAÇA PARDA", 5)
            .with_count("15 A 19 ANOS, ALFABETIZADAS", 5),
    ]
}

/// Boundaries for the three surveyed municipalities plus `Japurá`, which
/// has no survey rows.
pub fn geometries() -> Vec<MunicipalityGeometry> {
    ["Manaus", "Tefé", "Coari", "Japurá"]
        .iter()
        .enumerate()
        .map(|(i, name)| {
            #[allow(clippy::cast_precision_loss)]
            let x = i as f64;
            MunicipalityGeometry {
                name: (*name).to_string(),
                geometry: Geometry::new(Value::Polygon(vec![vec![
                    vec![x, 0.0],
                    vec![x + 1.0, 0.0],
                    vec![x + 1.0, 1.0],
                    vec![x, 0.0],
                ]])),
            }
        })
        .collect()
}
