//! Municipality name normalization.
//!
//! The survey dataset and the geometry source spell municipality names
//! independently. Every grouping and join keys on [`normalize_name`], so
//! both sides must go through the same function.

/// Normalizes a municipality name into its grouping/join key.
///
/// Trims surrounding whitespace and uppercases (Unicode-aware, so
/// `"São Gabriel"` becomes `"SÃO GABRIEL"`).
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_uppercase()
}
