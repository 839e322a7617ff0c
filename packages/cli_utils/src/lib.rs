#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal helpers for the youth map command-line tools.
//!
//! [`init_logger`] installs `pretty_env_logger` behind
//! `indicatif-log-bridge`, and [`IndicatifProgress`] renders the engine's
//! [`ProgressCallback`] as an `indicatif` bar on the same [`MultiProgress`],
//! so log lines and bars never overwrite each other.

use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use youth_map_demographics::progress::ProgressCallback;
use youth_map_demographics_models::AgeGroup;

pub use indicatif::MultiProgress;

/// A [`ProgressCallback`] drawn as an `indicatif` bar. Each step advances
/// the bar by one and names itself in the message.
pub struct IndicatifProgress {
    bar: ProgressBar,
    title: String,
}

impl IndicatifProgress {
    /// A bar counting `total` steps, e.g. the slices and files of a
    /// generation run.
    #[must_use]
    pub fn steps_bar(
        multi: &MultiProgress,
        message: &str,
        total: u64,
    ) -> Arc<dyn ProgressCallback> {
        let bar = multi.add(ProgressBar::new(total));
        bar.set_style(
            ProgressStyle::with_template(
                "{msg} {wide_bar:.green/dim} {pos}/{len} [{elapsed_precise}]",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
        );
        bar.set_message(message.to_string());

        Arc::new(Self {
            bar,
            title: message.to_string(),
        })
    }
}

impl ProgressCallback for IndicatifProgress {
    fn slice_computed(&self, age_group: AgeGroup) {
        self.bar
            .set_message(format!("{}: computed {age_group}", self.title));
        self.bar.inc(1);
    }

    fn file_written(&self, file_name: &str) {
        self.bar
            .set_message(format!("{}: wrote {file_name}", self.title));
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish_with_message(format!("{}: done", self.title));
    }
}

/// Installs the global logger, configured from `RUST_LOG`, behind
/// `indicatif-log-bridge`.
///
/// Every progress bar must be added to the returned [`MultiProgress`].
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    // A logger may already be installed when called more than once.
    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok();

    log::set_max_level(level);

    multi
}
