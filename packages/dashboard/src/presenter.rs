//! Render snapshot assembly.
//!
//! Turns a [`ReportTable`] into the table rows, map layers, chart and
//! urgency breakdown the display surface draws. Everything here is a pure
//! function of its inputs, so identical tables produce identical snapshots.

use std::collections::BTreeMap;

use webgis_dashboard_models::{
    BarSeries, ChartLayout, ChartPayload, MapLayer, Marker, RenderSnapshot, SeriesKind,
    TileLayer, UrgencyBreakdown,
};
use webgis_source_models::{CoordinatePair, ReportRecord, ReportTable};

use crate::config::DashboardConfig;

/// Signature of the coordinate normalizer used to locate markers.
pub type Normalizer = fn(Option<&str>) -> Option<CoordinatePair>;

/// Label used in tooltips for a missing issue type or urgency.
const MISSING_LABEL: &str = "N/A";

/// Popup body for a report without a description.
const MISSING_DESCRIPTION: &str = "Descripción no disponible";

/// Fixed presentation inputs for snapshot assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Base map layer, always the first layer.
    pub base_layer: TileLayer,
    /// Fixed chart title.
    pub chart_title: String,
    /// Legend name of the bar series.
    pub series_name: String,
}

impl RenderSettings {
    /// Extracts the render settings from the dashboard configuration.
    #[must_use]
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            base_layer: TileLayer {
                url: config.map.tile_url.clone(),
                attribution: config.map.tile_attribution.clone(),
            },
            chart_title: config.chart.title.clone(),
            series_name: config.chart.series_name.clone(),
        }
    }
}

/// Snapshot shown when there are no reports: no rows, the base layer only,
/// and a titled chart with no series.
#[must_use]
pub fn empty_snapshot(settings: &RenderSettings) -> RenderSnapshot {
    RenderSnapshot {
        table: Vec::new(),
        layers: vec![MapLayer::TileLayer(settings.base_layer.clone())],
        chart: ChartPayload::empty(settings.chart_title.clone()),
        urgency: UrgencyBreakdown::default(),
    }
}

/// Builds the render snapshot for one refresh cycle.
#[must_use]
pub fn build_snapshot(
    table: ReportTable,
    settings: &RenderSettings,
    normalize: Normalizer,
) -> RenderSnapshot {
    if table.is_empty() {
        return empty_snapshot(settings);
    }

    let rows = table.into_rows();

    let mut layers = Vec::with_capacity(rows.len() + 1);
    layers.push(MapLayer::TileLayer(settings.base_layer.clone()));
    layers.extend(build_markers(&rows, normalize).into_iter().map(MapLayer::Marker));

    let chart = build_chart(&rows, settings);
    let urgency = tally_urgency(&rows);

    RenderSnapshot {
        table: rows,
        layers,
        chart,
        urgency,
    }
}

/// One marker per report whose `location` normalizes to a coordinate pair.
fn build_markers(rows: &[ReportRecord], normalize: Normalizer) -> Vec<Marker> {
    rows.iter()
        .filter_map(|row| {
            let position = normalize(row.location.as_deref())?;
            let urgency = row.urgency();
            Some(Marker {
                report_id: row.id.clone(),
                position,
                tooltip: format!(
                    "{} - {}",
                    row.issue_type.as_deref().unwrap_or(MISSING_LABEL),
                    row.urgency_level.as_deref().unwrap_or(MISSING_LABEL),
                ),
                popup: row
                    .issue_description
                    .clone()
                    .unwrap_or_else(|| MISSING_DESCRIPTION.to_string()),
                urgency,
                color: urgency.color().to_string(),
            })
        })
        .collect()
}

/// Counts reports per issue type, most frequent first.
///
/// Reports without an issue type are not counted. Ties keep the order in
/// which the categories first appear.
#[must_use]
pub fn issue_type_counts(rows: &[ReportRecord]) -> Vec<(String, u64)> {
    // issue type -> (first-seen position, count)
    let mut tally: BTreeMap<&str, (usize, u64)> = BTreeMap::new();
    for issue_type in rows.iter().filter_map(|row| row.issue_type.as_deref()) {
        let next = tally.len();
        tally.entry(issue_type).or_insert((next, 0)).1 += 1;
    }

    let mut counts: Vec<(usize, &str, u64)> = tally
        .into_iter()
        .map(|(issue_type, (first_seen, count))| (first_seen, issue_type, count))
        .collect();
    counts.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));

    counts
        .into_iter()
        .map(|(_, issue_type, count)| (issue_type.to_string(), count))
        .collect()
}

fn build_chart(rows: &[ReportRecord], settings: &RenderSettings) -> ChartPayload {
    let (x, y) = issue_type_counts(rows).into_iter().unzip();
    ChartPayload {
        data: vec![BarSeries {
            x,
            y,
            kind: SeriesKind::Bar,
            name: settings.series_name.clone(),
        }],
        layout: ChartLayout {
            title: settings.chart_title.clone(),
        },
    }
}

fn tally_urgency(rows: &[ReportRecord]) -> UrgencyBreakdown {
    let mut breakdown = UrgencyBreakdown::default();
    for row in rows {
        breakdown.record(row.urgency());
    }
    breakdown
}
