#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server for the stray map application.
//!
//! Serves the web client's static files (`public/` and the `dist/`
//! bundle) plus a small read-only JSON API over the animal sightings and
//! the region geometry. There is no write path; marking an animal as fed
//! is left to the client's backend.

mod assets;
mod handlers;
pub mod interactive;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use stray_map_animal::RecordStoreError;
use stray_map_animal::store::RecordStore;
use stray_map_geography::GeometryError;
use stray_map_geography::registry::{DEFAULT_REGION_ID, load_region};
use stray_map_geography_models::{RegionDefinition, RegionGeometry};
use thiserror::Error;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3000;

/// Errors that can occur while starting the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Binding or running the HTTP server failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The sighting data could not be loaded.
    #[error("Record store error: {0}")]
    Records(#[from] RecordStoreError),

    /// The region geometry could not be built.
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),
}

/// Where and what to serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub bind_addr: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory with `index.html` and other public files.
    pub public_dir: PathBuf,
    /// Directory with the built client bundle, served under `/dist/`.
    pub dist_dir: PathBuf,
    /// Region whose geometry `/api/region` returns.
    pub region_id: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            public_dir: PathBuf::from("public"),
            dist_dir: PathBuf::from("dist"),
            region_id: DEFAULT_REGION_ID.to_string(),
        }
    }
}

impl ServerConfig {
    /// Reads `BIND_ADDR`, `PORT`, `STRAY_MAP_PUBLIC_DIR`,
    /// `STRAY_MAP_DIST_DIR` and `STRAY_MAP_REGION`, falling back to the
    /// defaults for anything unset or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            public_dir: std::env::var("STRAY_MAP_PUBLIC_DIR")
                .map_or(defaults.public_dir, PathBuf::from),
            dist_dir: std::env::var("STRAY_MAP_DIST_DIR").map_or(defaults.dist_dir, PathBuf::from),
            region_id: std::env::var("STRAY_MAP_REGION").unwrap_or(defaults.region_id),
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// All sightings.
    pub store: RecordStore,
    /// The served region.
    pub region: RegionDefinition,
    /// Mask and bounds of the served region.
    pub geometry: Arc<RegionGeometry>,
}

impl AppState {
    /// Loads the seed sightings and the configured region.
    ///
    /// # Errors
    ///
    /// * [`ServerError::Records`] if the seed data is invalid
    /// * [`ServerError::Geometry`] if the region is unknown or its boundary
    ///   is malformed
    pub fn load(config: &ServerConfig) -> Result<Self, ServerError> {
        let store = RecordStore::seed()?;
        let (region, geometry) = load_region(&config.region_id)?;

        Ok(Self {
            store,
            region,
            geometry: Arc::new(geometry),
        })
    }
}

/// Registers the API routes, then the static files from `public_dir` and
/// `dist_dir`.
pub fn configure(cfg: &mut web::ServiceConfig, public_dir: &Path, dist_dir: &Path) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/animals", web::get().to(handlers::animals))
            .route("/region", web::get().to(handlers::region)),
    );
    assets::mount(cfg, public_dir, dist_dir);
}

/// Starts the stray map server.
///
/// This is a regular async function; the caller provides the async
/// runtime (e.g. via `#[actix_web::main]`) and initialises logging.
///
/// # Errors
///
/// Returns [`ServerError`] if the data cannot be loaded or the HTTP server
/// fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    log::info!("Loading sightings and region {}...", config.region_id);
    let state = web::Data::new(AppState::load(&config)?);

    log::info!(
        "Serving {} from {} and /dist/ from {}",
        state.region.name,
        config.public_dir.display(),
        config.dist_dir.display()
    );
    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    let public_dir = config.public_dir.clone();
    let dist_dir = config.dist_dir.clone();
    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(|cfg| configure(cfg, &public_dir, &dist_dir))
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
