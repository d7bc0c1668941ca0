#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the WebGIS dashboard server.
//!
//! These types are serialized to JSON for the REST API. They wrap the
//! render snapshot types so the snapshot itself stays free of transport
//! concerns such as cycle numbers and timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use webgis_dashboard_models::RenderSnapshot;

/// The currently published dashboard snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDashboard {
    /// Refresh cycle that produced the snapshot (`0` before the first).
    pub cycle: u64,
    /// When the snapshot was published (ISO 8601).
    pub refreshed_at: Option<DateTime<Utc>>,
    /// Table rows, map layers, chart and urgency breakdown.
    #[serde(flatten)]
    pub snapshot: RenderSnapshot,
}

/// Initial map view and refresh period for the dashboard page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMapConfig {
    /// `[latitude, longitude]` of the initial view.
    pub center: [f64; 2],
    /// Initial zoom level.
    pub zoom: u8,
    /// Milliseconds between page refreshes.
    pub refresh_interval_ms: u64,
}

/// Query parameters for the reports endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQueryParams {
    /// Issue type to include (case-insensitive).
    pub issue_type: Option<String>,
    /// Urgency level to include (`high`, `medium`, `low`, `unspecified`).
    pub urgency: Option<String>,
    /// Earliest detection date (`YYYY-MM-DD`, inclusive).
    pub from: Option<String>,
    /// Latest detection date (`YYYY-MM-DD`, inclusive).
    pub to: Option<String>,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}
