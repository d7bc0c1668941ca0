#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Entry point for the WebGIS dashboard server.
//!
//! Starts the survey refresh loop and serves the dashboard page and its
//! JSON API. Configuration comes from `WEBGIS_CONFIG` and the environment.

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    webgis_server::run_server().await
}
