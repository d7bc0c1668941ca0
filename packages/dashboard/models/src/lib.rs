#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Render snapshot types published to the dashboard display surface.
//!
//! A [`RenderSnapshot`] is rebuilt from scratch on every refresh cycle and
//! replaces the previous one as a whole. The map and chart descriptors are
//! shaped after what the browser page hands to `Leaflet` and `Plotly`.

use serde::{Deserialize, Serialize};
use webgis_source_models::{CoordinatePair, ReportRecord, UrgencyLevel};

/// Everything the display surface draws for one refresh cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSnapshot {
    /// Table rows keyed by the declared report columns.
    pub table: Vec<ReportRecord>,
    /// Map layers: the base tile layer first, then one marker per located
    /// report.
    pub layers: Vec<MapLayer>,
    /// Issue-type bar chart.
    pub chart: ChartPayload,
    /// Report counts by urgency.
    pub urgency: UrgencyBreakdown,
}

impl RenderSnapshot {
    /// Iterates over the marker layers, skipping tile layers.
    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.layers.iter().filter_map(|layer| match layer {
            MapLayer::Marker(marker) => Some(marker),
            MapLayer::TileLayer(_) => None,
        })
    }

    /// Density points for the heat-map overlay, one `[lat, lon, weight]`
    /// per marker with unit weight.
    #[must_use]
    pub fn heat_points(&self) -> Vec<[f64; 3]> {
        self.markers()
            .map(|marker| [marker.position.latitude, marker.position.longitude, 1.0])
            .collect()
    }
}

/// A single layer on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MapLayer {
    /// Raster base map.
    TileLayer(TileLayer),
    /// Point annotation for one report.
    Marker(Marker),
}

/// Raster tile layer descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayer {
    /// URL template with `{s}`, `{z}`, `{x}`, `{y}` placeholders.
    pub url: String,
    /// Attribution HTML shown in the map corner.
    pub attribution: String,
}

/// Map marker for a located report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// Identifier of the report this marker belongs to.
    pub report_id: Option<String>,
    /// `[latitude, longitude]`.
    pub position: CoordinatePair,
    /// Short hover label, `"<issue type> - <urgency>"`.
    pub tooltip: String,
    /// Popup body shown on click.
    pub popup: String,
    /// Urgency classification, drives the marker color.
    pub urgency: UrgencyLevel,
    /// CSS color name for the marker.
    pub color: String,
}

/// Bar chart descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPayload {
    /// Chart series. Empty when there are no reports.
    pub data: Vec<BarSeries>,
    /// Chart layout.
    pub layout: ChartLayout,
}

impl ChartPayload {
    /// Creates a chart with no series and the given title.
    #[must_use]
    pub fn empty(title: impl Into<String>) -> Self {
        Self {
            data: Vec::new(),
            layout: ChartLayout {
                title: title.into(),
            },
        }
    }

    /// Category labels of the first series.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        self.data
            .first()
            .map(|series| series.x.as_slice())
            .unwrap_or_default()
    }

    /// Sum of all counts across all series.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.data.iter().flat_map(|series| &series.y).sum()
    }
}

/// A single bar series: categories on `x`, counts on `y`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarSeries {
    /// Category labels.
    pub x: Vec<String>,
    /// Count per category, aligned with `x`.
    pub y: Vec<u64>,
    /// Series type. Always [`SeriesKind::Bar`].
    #[serde(rename = "type")]
    pub kind: SeriesKind,
    /// Series legend name.
    pub name: String,
}

/// Chart series type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    /// Vertical bars.
    Bar,
}

/// Chart layout options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartLayout {
    /// Chart title.
    pub title: String,
}

/// Report counts by urgency level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgencyBreakdown {
    /// Total number of reports.
    pub total: u64,
    /// Reports with high urgency.
    pub high: u64,
    /// Reports with medium urgency.
    pub medium: u64,
    /// Reports with low urgency.
    pub low: u64,
    /// Reports with a missing or unrecognized urgency.
    pub unspecified: u64,
}

impl UrgencyBreakdown {
    /// Counts one report with the given urgency.
    pub const fn record(&mut self, urgency: UrgencyLevel) {
        self.total += 1;
        match urgency {
            UrgencyLevel::High => self.high += 1,
            UrgencyLevel::Medium => self.medium += 1,
            UrgencyLevel::Low => self.low += 1,
            UrgencyLevel::Unspecified => self.unspecified += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_chart_has_title_and_no_categories() {
        let chart = ChartPayload::empty("Distribución de Afectaciones por Tipo");
        assert!(chart.categories().is_empty());
        assert_eq!(chart.total(), 0);
        assert_eq!(
            serde_json::to_value(&chart).unwrap(),
            serde_json::json!({
                "data": [],
                "layout": {"title": "Distribución de Afectaciones por Tipo"}
            })
        );
    }

    #[test]
    fn layers_are_tagged_by_type() {
        let layer = MapLayer::TileLayer(TileLayer {
            url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: String::new(),
        });
        let value = serde_json::to_value(&layer).unwrap();
        assert_eq!(value["type"], "tileLayer");

        let marker = MapLayer::Marker(Marker {
            report_id: Some("7".to_string()),
            position: CoordinatePair::new(-37.47, -72.34),
            tooltip: "structural - high".to_string(),
            popup: "Grieta".to_string(),
            urgency: UrgencyLevel::High,
            color: "red".to_string(),
        });
        let value = serde_json::to_value(&marker).unwrap();
        assert_eq!(value["type"], "marker");
        assert_eq!(value["position"], serde_json::json!([-37.47, -72.34]));
        assert_eq!(value["urgency"], "high");
    }

    fn marker(id: &str, latitude: f64, longitude: f64) -> MapLayer {
        MapLayer::Marker(Marker {
            report_id: Some(id.to_string()),
            position: CoordinatePair::new(latitude, longitude),
            tooltip: String::new(),
            popup: String::new(),
            urgency: UrgencyLevel::Unspecified,
            color: "gray".to_string(),
        })
    }

    #[test]
    fn heat_points_follow_markers() {
        let snapshot = RenderSnapshot {
            table: Vec::new(),
            layers: vec![
                MapLayer::TileLayer(TileLayer {
                    url: String::new(),
                    attribution: String::new(),
                }),
                marker("1", -37.47, -72.34),
                marker("2", -37.48, -72.35),
            ],
            chart: ChartPayload::empty("t"),
            urgency: UrgencyBreakdown::default(),
        };
        assert_eq!(
            snapshot.heat_points(),
            vec![[-37.47, -72.34, 1.0], [-37.48, -72.35, 1.0]]
        );
    }

    #[test]
    fn breakdown_counts_each_level() {
        let mut breakdown = UrgencyBreakdown::default();
        for level in [
            UrgencyLevel::High,
            UrgencyLevel::High,
            UrgencyLevel::Low,
            UrgencyLevel::Unspecified,
        ] {
            breakdown.record(level);
        }
        assert_eq!(breakdown.total, 4);
        assert_eq!(breakdown.high, 2);
        assert_eq!(breakdown.medium, 0);
        assert_eq!(breakdown.low, 1);
        assert_eq!(breakdown.unspecified, 1);
    }
}
