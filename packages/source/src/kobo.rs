//! `KoboToolbox` form-data fetcher.
//!
//! Issues a single authenticated `GET <base_url>/<form_id>/data/` and
//! projects the `results` array of the response onto the declared report
//! columns. There is no pagination and no retry: one call per fetch.
//!
//! See <https://support.kobotoolbox.org/api.html>

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value;
use webgis_source_models::{REPORT_COLUMNS, ReportRecord, ReportTable};

use crate::{ReportSource, SourceError};

/// Builds the form-data endpoint URL for a form.
#[must_use]
pub fn form_data_url(base_url: &str, form_id: &str) -> String {
    format!("{}/{form_id}/data/", base_url.trim_end_matches('/'))
}

/// Report source backed by a `KoboToolbox` form.
pub struct KoboSource {
    client: reqwest::Client,
    url: String,
    api_token: String,
}

impl KoboSource {
    /// Creates a source for the form `form_id` on the server at `base_url`
    /// (e.g. `"https://kf.kobotoolbox.org/api/v2/assets"`).
    #[must_use]
    pub fn new(base_url: &str, form_id: &str, api_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: form_data_url(base_url, form_id),
            api_token: api_token.into(),
        }
    }

    /// The endpoint this source fetches from.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ReportSource for KoboSource {
    fn id(&self) -> &str {
        "kobo"
    }

    async fn fetch_reports(&self) -> Result<ReportTable, SourceError> {
        log::debug!("Fetching form data from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header(AUTHORIZATION, format!("Token {}", self.api_token))
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text)?;
        let table = parse_envelope(&body)?;

        log::info!("Fetched {} reports from {}", table.len(), self.url);
        Ok(table)
    }
}

/// Parses the `{"results": [...]}` envelope into a [`ReportTable`].
///
/// A missing or non-array `results` is treated as no results. Elements that
/// are not objects are skipped with a warning. Declared columns that no
/// element carries are reported as schema drift.
///
/// # Errors
///
/// Returns [`SourceError::Envelope`] if `body` is not a JSON object.
pub fn parse_envelope(body: &Value) -> Result<ReportTable, SourceError> {
    let Value::Object(envelope) = body else {
        return Err(SourceError::Envelope {
            message: "response is not a JSON object".to_string(),
        });
    };

    let results: &[Value] = match envelope.get("results") {
        Some(Value::Array(items)) => items.as_slice(),
        Some(other) => {
            log::warn!("Ignoring non-array `results` field: {other}");
            &[]
        }
        None => &[],
    };

    warn_on_missing_columns(results);

    let table = results
        .iter()
        .filter_map(|item| match ReportRecord::from_json(item) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping malformed submission: {e}");
                None
            }
        })
        .collect();

    Ok(table)
}

/// Logs declared columns that are absent from every submission.
fn warn_on_missing_columns(results: &[Value]) {
    let objects: Vec<_> = results.iter().filter_map(Value::as_object).collect();
    if objects.is_empty() {
        return;
    }

    let missing: Vec<&str> = REPORT_COLUMNS
        .iter()
        .copied()
        .filter(|column| !objects.iter().any(|obj| obj.contains_key(*column)))
        .collect();

    if !missing.is_empty() {
        log::warn!(
            "Form submissions do not carry declared columns {missing:?}; \
             check the form schema"
        );
    }
}
