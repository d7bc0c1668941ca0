#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Survey API fetcher and report normalization logic.
//!
//! A report provider implements the [`ReportSource`] trait to fetch the
//! current submissions and project them onto the declared
//! [`ReportTable`] schema. [`kobo::KoboSource`] is the `KoboToolbox`
//! implementation; [`parsing`] holds the coordinate normalizer.

pub mod kobo;
pub mod parsing;

use async_trait::async_trait;
use webgis_source_models::ReportTable;

/// Errors that can occur while fetching reports.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed (connection refused, timeout, TLS, ...).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("{url} responded with HTTP {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// Response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response body was JSON but not the expected envelope.
    #[error("Unexpected response body: {message}")]
    Envelope {
        /// Description of what went wrong.
        message: String,
    },
}

/// Trait that all report providers must implement.
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Returns a unique identifier for this source (e.g., `"kobo"`).
    fn id(&self) -> &str;

    /// Performs one fetch and projects the result onto the declared columns.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on transport failure, a non-2xx status, or a
    /// body that is not a JSON object.
    async fn fetch_reports(&self) -> Result<ReportTable, SourceError>;

    /// Fetches reports, converting any failure into an empty table.
    ///
    /// This is the failure policy of the dashboard: a failed fetch is logged
    /// and the next render shows no data. The returned table still carries
    /// the declared columns.
    async fn fetch_or_empty(&self) -> ReportTable {
        match self.fetch_reports().await {
            Ok(table) => table,
            Err(e) => {
                log::error!("Failed to fetch reports from {}: {e}", self.id());
                ReportTable::empty()
            }
        }
    }
}
