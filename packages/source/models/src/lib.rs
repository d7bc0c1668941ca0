#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Survey report record types and the declared report column schema.
//!
//! Every submission returned by the survey API is projected onto
//! [`ReportRecord`], which carries exactly the columns listed in
//! [`REPORT_COLUMNS`]. Fields the remote form adds are dropped and fields it
//! omits stay `None`; nothing is defaulted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{AsRefStr, Display, EnumString};

/// The declared column schema, in display order.
pub const REPORT_COLUMNS: [&str; 10] = [
    "_id",
    "report_name",
    "contact_info",
    "location",
    "issue_type",
    "location_desc",
    "urgency_level",
    "issue_description",
    "detection_date",
    "photo_evidence",
];

/// One survey submission projected onto the declared columns.
///
/// Serializes as a row mapping keyed by the column names, with `null` for
/// absent values, so every row always carries all ten keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    /// Submission identifier assigned by the survey server.
    #[serde(rename = "_id")]
    pub id: Option<String>,
    /// Name of the person reporting.
    pub report_name: Option<String>,
    /// Email or phone of the reporter.
    pub contact_info: Option<String>,
    /// Geopoint as free text (`"lat lon alt accuracy"`).
    pub location: Option<String>,
    /// Issue category (open set, e.g. `"structural"`).
    pub issue_type: Option<String>,
    /// Free-text description of where the issue is.
    pub location_desc: Option<String>,
    /// Urgency as entered on the form.
    pub urgency_level: Option<String>,
    /// Free-text description of the issue.
    pub issue_description: Option<String>,
    /// Date the issue was detected (`YYYY-MM-DD`).
    pub detection_date: Option<String>,
    /// Photo attachment name or URL.
    pub photo_evidence: Option<String>,
}

/// Error returned when a payload element cannot be projected onto a
/// [`ReportRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionError {
    /// JSON type name of the offending element.
    pub found: &'static str,
}

impl std::fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "expected a JSON object for a report, found {}", self.found)
    }
}

impl std::error::Error for ProjectionError {}

impl ReportRecord {
    /// Projects one element of the `results` array onto the declared columns.
    ///
    /// String values are kept as-is, numbers and booleans are rendered to
    /// text (the survey server sends `_id` as an integer), and nested
    /// objects or arrays are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError`] if `value` is not a JSON object.
    pub fn from_json(value: &Value) -> Result<Self, ProjectionError> {
        let Value::Object(obj) = value else {
            return Err(ProjectionError {
                found: json_type_name(value),
            });
        };

        Ok(Self {
            id: project_field(obj, "_id"),
            report_name: project_field(obj, "report_name"),
            contact_info: project_field(obj, "contact_info"),
            location: project_field(obj, "location"),
            issue_type: project_field(obj, "issue_type"),
            location_desc: project_field(obj, "location_desc"),
            urgency_level: project_field(obj, "urgency_level"),
            issue_description: project_field(obj, "issue_description"),
            detection_date: project_field(obj, "detection_date"),
            photo_evidence: project_field(obj, "photo_evidence"),
        })
    }

    /// Returns the value of a declared column by name, or `None` if the
    /// value is absent or `column` is not a declared column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        let value = match column {
            "_id" => &self.id,
            "report_name" => &self.report_name,
            "contact_info" => &self.contact_info,
            "location" => &self.location,
            "issue_type" => &self.issue_type,
            "location_desc" => &self.location_desc,
            "urgency_level" => &self.urgency_level,
            "issue_description" => &self.issue_description,
            "detection_date" => &self.detection_date,
            "photo_evidence" => &self.photo_evidence,
            _ => return None,
        };
        value.as_deref()
    }

    /// Returns all values in [`REPORT_COLUMNS`] order.
    #[must_use]
    pub fn values(&self) -> [Option<&str>; 10] {
        REPORT_COLUMNS.map(|column| self.get(column))
    }

    /// Classifies this record's urgency field.
    #[must_use]
    pub fn urgency(&self) -> UrgencyLevel {
        UrgencyLevel::classify(self.urgency_level.as_deref())
    }
}

fn project_field(obj: &Map<String, Value>, column: &str) -> Option<String> {
    match obj.get(column)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A set of report records that always exposes the declared column schema.
///
/// The fetch stage returns this type on success and failure alike, so
/// consumers never branch on a missing column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportTable {
    rows: Vec<ReportRecord>,
}

impl ReportTable {
    /// Creates a table with no rows and the declared columns.
    #[must_use]
    pub const fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    /// Creates a table from already projected rows.
    #[must_use]
    pub const fn new(rows: Vec<ReportRecord>) -> Self {
        Self { rows }
    }

    /// The column schema of this table. Always [`REPORT_COLUMNS`].
    #[must_use]
    pub const fn columns(&self) -> &'static [&'static str] {
        &REPORT_COLUMNS
    }

    /// The rows of this table.
    #[must_use]
    pub fn rows(&self) -> &[ReportRecord] {
        &self.rows
    }

    /// Consumes the table, returning its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<ReportRecord> {
        self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<ReportRecord> for ReportTable {
    fn from_iter<T: IntoIterator<Item = ReportRecord>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// An ordered `(latitude, longitude)` pair in WGS84 degrees.
///
/// Serializes as a two-element array `[latitude, longitude]`, the order map
/// widgets expect for a marker position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 2]", from = "[f64; 2]")]
pub struct CoordinatePair {
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
}

impl CoordinatePair {
    /// Creates a new pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<CoordinatePair> for [f64; 2] {
    fn from(pair: CoordinatePair) -> Self {
        [pair.latitude, pair.longitude]
    }
}

impl From<[f64; 2]> for CoordinatePair {
    fn from([latitude, longitude]: [f64; 2]) -> Self {
        Self::new(latitude, longitude)
    }
}

/// Urgency classification of a report.
///
/// Accepts both the form's choice names (`high`, `medium`, `low`) and the
/// Spanish labels shown to reporters (`Alto`, `Medio`, `Bajo`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum UrgencyLevel {
    /// Needs immediate attention.
    #[strum(to_string = "high", serialize = "alto", serialize = "alta")]
    High,
    /// Should be scheduled soon.
    #[strum(to_string = "medium", serialize = "medio", serialize = "media")]
    Medium,
    /// Can wait for routine maintenance.
    #[strum(to_string = "low", serialize = "bajo", serialize = "baja")]
    Low,
    /// Missing or unrecognized urgency.
    #[strum(to_string = "unspecified")]
    Unspecified,
}

impl UrgencyLevel {
    /// Classifies a raw urgency string. Missing or unrecognized values map to
    /// [`UrgencyLevel::Unspecified`].
    #[must_use]
    pub fn classify(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.trim().parse().ok())
            .unwrap_or(Self::Unspecified)
    }

    /// Marker color used on the map for this urgency.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::High => "red",
            Self::Medium => "orange",
            Self::Low => "yellow",
            Self::Unspecified => "gray",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::High, Self::Medium, Self::Low, Self::Unspecified]
    }
}
