//! Progress reporting for cache generation.
//!
//! A generation run computes one slice per age group and then writes the
//! cache files. [`ProgressCallback`] receives one event per step, so the
//! caller decides how they are rendered: a terminal bar in the cache
//! generator, nothing in tests.

use youth_map_demographics_models::AgeGroup;

/// Receives the steps of a generation run.
///
/// Slices are computed on parallel threads, so implementations must be
/// `Send + Sync`.
pub trait ProgressCallback: Send + Sync {
    /// The slice of `age_group` has been computed.
    fn slice_computed(&self, age_group: AgeGroup);

    /// `file_name` has been written to the cache directory.
    fn file_written(&self, file_name: &str);

    /// Every step of the run has completed.
    fn finish(&self);
}

/// Ignores every step.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn slice_computed(&self, _age_group: AgeGroup) {}
    fn file_written(&self, _file_name: &str) {}
    fn finish(&self) {}
}
