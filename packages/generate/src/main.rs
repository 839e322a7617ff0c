#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pre-computes the dashboard statistics of every age group and writes them
//! as a JSON cache the server can read with `STATS_MODE=cache`.

use std::path::PathBuf;

use clap::Parser;
use youth_map_cli_utils::IndicatifProgress;
use youth_map_demographics::Engine;

#[derive(Parser)]
#[command(name = "youth_map_generate", about = "Dashboard cache generation tool")]
struct Cli {
    /// Raw survey dataset (`GeoJSON` feature collection)
    #[arg(long, default_value = "data/juventude_amazonas_AM.geojson")]
    raw_data: PathBuf,

    /// Municipality boundaries (`GeoJSON` feature collection)
    #[arg(long, default_value = "data/br_geobr_mapas_municipio_am.geojson")]
    map: PathBuf,

    /// Directory the cache files are written to
    #[arg(long, default_value = "processed_data")]
    output_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = youth_map_cli_utils::init_logger();
    let cli = Cli::parse();

    let engine = Engine::load(&cli.raw_data, &cli.map).inspect_err(|e| {
        log::error!("Failed to load input data: {e}");
    })?;

    let progress = IndicatifProgress::steps_bar(
        &multi,
        "Generating cache",
        youth_map_generate::total_steps(),
    );
    let manifest = youth_map_generate::generate(&engine, &cli.output_dir, progress.as_ref())?;

    log::info!(
        "Wrote {} cache files from {} rows and {} boundaries into {}",
        manifest.outputs.len(),
        manifest.record_count,
        manifest.geometry_count,
        cli.output_dir.display()
    );

    Ok(())
}
