#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server for the WebGIS infrastructure dashboard.
//!
//! Serves the dashboard page (`Leaflet` map, `Plotly` chart, report table)
//! as static files and the JSON API it polls. A background task refreshes
//! the render snapshot from the survey API on a fixed interval; request
//! handlers only read the latest published snapshot.

mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use webgis_dashboard::presenter::RenderSettings;
use webgis_dashboard::{DashboardConfig, Presenter, SnapshotStore};
use webgis_server_models::ApiMapConfig;
use webgis_source::ReportSource;
use webgis_source::kobo::KoboSource;
use webgis_source::parsing::parse_gps_location;

/// Shared application state.
pub struct AppState {
    /// Latest published snapshot.
    pub store: Arc<SnapshotStore>,
    /// Initial map view served to the page.
    pub map: ApiMapConfig,
}

impl AppState {
    /// Builds the state served alongside `store` from the configuration.
    #[must_use]
    pub fn new(store: Arc<SnapshotStore>, config: &DashboardConfig) -> Self {
        Self {
            store,
            map: ApiMapConfig {
                center: config.map.center,
                zoom: config.map.zoom,
                refresh_interval_ms: config.refresh.interval_ms,
            },
        }
    }
}

/// Registers the `/api` routes.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/dashboard", web::get().to(handlers::dashboard))
            .route("/map", web::get().to(handlers::map_config))
            .route("/heatmap", web::get().to(handlers::heatmap))
            .route("/reports", web::get().to(handlers::reports))
            .route("/reports.csv", web::get().to(handlers::reports_csv)),
    );
}

/// Starts the dashboard server.
///
/// Loads the configuration, wires the survey source and coordinate
/// normalizer into the presenter, spawns the refresh loop and starts the
/// Actix-Web HTTP server. This is a regular async function; the caller is
/// responsible for providing the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the configuration cannot be
/// loaded, or the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    log::info!("Loading configuration...");
    let config = DashboardConfig::load().map_err(std::io::Error::other)?;

    let kobo = KoboSource::new(
        &config.source.base_url,
        &config.source.form_id,
        config.source.api_token.clone(),
    );
    log::info!("Survey endpoint: {}", kobo.url());
    let source: Arc<dyn ReportSource> = Arc::new(kobo);

    let presenter = Arc::new(Presenter::new(
        source,
        parse_gps_location,
        RenderSettings::from_config(&config),
    ));
    let state = web::Data::new(AppState::new(presenter.store(), &config));

    actix_web::rt::spawn(Arc::clone(&presenter).run(config.refresh.interval()));

    let bind_addr = config.server.bind_addr.clone();
    let port = config.server.port;
    let static_dir = config.server.static_dir.clone();

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api)
            // Serve the dashboard page
            .service(Files::new("/", static_dir.clone()).index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
