#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the youth demographics dashboard.
//!
//! Serves state and municipality summaries, rankings and the boundary map
//! for any age group, plus the static frontend. Statistics come from a
//! [`StatsProvider`]: either a live [`Engine`] built from the raw inputs at
//! startup, or the JSON cache written by `youth_map_generate`.

mod handlers;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use strum_macros::{AsRefStr, Display, EnumString};
use youth_map_demographics::{Engine, EngineError, StatsProvider};
use youth_map_generate::cache::CachedStats;

/// Where the server takes its statistics from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum StatsMode {
    /// Aggregate the raw survey dataset on every request.
    Live,
    /// Read the pre-computed cache.
    Cache,
}

/// Server configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `BIND_ADDR`
    pub bind_addr: String,
    /// `PORT`
    pub port: u16,
    /// `RAW_DATA_PATH`: the raw survey dataset.
    pub raw_data_path: PathBuf,
    /// `MAP_PATH`: the municipality boundaries.
    pub map_path: PathBuf,
    /// `PROCESSED_DATA_DIR`: the cache written by `youth_map_generate`.
    pub processed_data_dir: PathBuf,
    /// `STATS_MODE`
    pub stats_mode: StatsMode,
    /// `STATIC_DIR`: the frontend files.
    pub static_dir: PathBuf,
}

impl ServerConfig {
    /// Reads the configuration, falling back to defaults for unset or
    /// unparsable variables.
    #[must_use]
    pub fn from_env() -> Self {
        let var = |name: &str, default: &str| {
            std::env::var(name).unwrap_or_else(|_| default.to_string())
        };

        let stats_mode = var("STATS_MODE", "live");
        let stats_mode = stats_mode.parse().unwrap_or_else(|_| {
            log::warn!("Unknown STATS_MODE '{stats_mode}', using live");
            StatsMode::Live
        });

        Self {
            bind_addr: var("BIND_ADDR", "127.0.0.1"),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            raw_data_path: var("RAW_DATA_PATH", "data/juventude_amazonas_AM.geojson").into(),
            map_path: var("MAP_PATH", "data/br_geobr_mapas_municipio_am.geojson").into(),
            processed_data_dir: var("PROCESSED_DATA_DIR", "processed_data").into(),
            stats_mode,
            static_dir: var("STATIC_DIR", "static").into(),
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// Source of every statistic the API serves.
    pub stats: Arc<dyn StatsProvider>,
}

/// Builds the statistics provider selected by `config`.
///
/// # Errors
///
/// Returns [`EngineError::MissingInputData`] if the inputs of the selected
/// mode cannot be loaded.
pub fn load_stats(config: &ServerConfig) -> Result<Arc<dyn StatsProvider>, EngineError> {
    match config.stats_mode {
        StatsMode::Live => Ok(Arc::new(Engine::load(
            &config.raw_data_path,
            &config.map_path,
        )?)),
        StatsMode::Cache => open_cache(&config.processed_data_dir),
    }
}

fn open_cache(dir: &Path) -> Result<Arc<dyn StatsProvider>, EngineError> {
    let cached = CachedStats::open(dir).map_err(|e| EngineError::MissingInputData {
        origin: dir.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(Arc::new(cached))
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/geral", web::get().to(handlers::state_summary))
            .route("/municipios", web::get().to(handlers::municipalities))
            .route("/municipio/{nome}", web::get().to(handlers::municipality))
            .route("/mapa", web::get().to(handlers::map))
            .route("/ranking/{metric}", web::get().to(handlers::ranking)),
    );
}

/// Starts the dashboard API server.
///
/// Loads the statistics once, then serves them until shut down. This is a
/// regular async function; the caller provides the runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an error if the statistics cannot be loaded, or if the HTTP
/// server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = ServerConfig::from_env();
    log::info!("Loading statistics ({} mode)...", config.stats_mode);

    let stats = load_stats(&config).map_err(|e| {
        log::error!("Failed to load statistics: {e}");
        std::io::Error::other(e.to_string())
    })?;

    let state = web::Data::new(AppState { stats });
    let static_dir = config.static_dir.clone();

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
            .service(Files::new("/static", &static_dir))
            .service(Files::new("/", &static_dir).index_file("index.html"))
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await
}
