//! HTTP handler functions for the dashboard API.

use actix_web::http::header;
use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde_json::json;
use webgis_dashboard::export::to_csv_bytes;
use webgis_dashboard::filter::ReportFilter;
use webgis_server_models::{ApiDashboard, ApiHealth, ReportQueryParams};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/dashboard`
///
/// Returns the latest published snapshot: table rows, map layers, chart
/// and urgency breakdown.
pub async fn dashboard(state: web::Data<AppState>) -> HttpResponse {
    let current = state.store.current();

    HttpResponse::Ok().json(ApiDashboard {
        cycle: current.cycle,
        refreshed_at: current.refreshed_at,
        snapshot: current.snapshot.clone(),
    })
}

/// `GET /api/map`
pub async fn map_config(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(&state.map)
}

/// `GET /api/heatmap`
///
/// Returns `[lat, lon, weight]` density points for the located reports of
/// the latest snapshot.
pub async fn heatmap(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.store.current().snapshot.heat_points())
}

/// `GET /api/reports`
///
/// Returns the table rows of the latest snapshot that match the filters.
pub async fn reports(
    state: web::Data<AppState>,
    params: web::Query<ReportQueryParams>,
) -> HttpResponse {
    let filter = match parse_filter(&params) {
        Ok(filter) => filter,
        Err(response) => return response,
    };

    let current = state.store.current();
    HttpResponse::Ok().json(filter.apply(&current.snapshot.table))
}

/// `GET /api/reports.csv`
///
/// Same rows as `/api/reports`, as a CSV download.
pub async fn reports_csv(
    state: web::Data<AppState>,
    params: web::Query<ReportQueryParams>,
) -> HttpResponse {
    let filter = match parse_filter(&params) {
        Ok(filter) => filter,
        Err(response) => return response,
    };

    let current = state.store.current();
    let rows = filter.apply(&current.snapshot.table);

    match to_csv_bytes(&rows) {
        Ok(body) => {
            let filename = format!("reportes_{}.csv", Utc::now().format("%Y-%m-%d"));
            HttpResponse::Ok()
                .content_type("text/csv; charset=utf-8")
                .insert_header((
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{filename}\""),
                ))
                .body(body)
        }
        Err(e) => {
            log::error!("CSV export failed: {e}");
            HttpResponse::InternalServerError().json(json!({"error": e.to_string()}))
        }
    }
}

fn parse_filter(params: &ReportQueryParams) -> Result<ReportFilter, HttpResponse> {
    ReportFilter::parse(
        params.issue_type.as_deref(),
        params.urgency.as_deref(),
        params.from.as_deref(),
        params.to.as_deref(),
    )
    .map_err(|e| HttpResponse::BadRequest().json(json!({"error": e.to_string()})))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test};
    use webgis_dashboard::presenter::{RenderSettings, build_snapshot, empty_snapshot};
    use webgis_dashboard::refresh::PublishedSnapshot;
    use webgis_dashboard::{DashboardConfig, SnapshotStore};
    use webgis_source::parsing::parse_gps_location;
    use webgis_source_models::{ReportRecord, ReportTable};

    use super::*;
    use crate::configure_api;

    fn record(id: &str, issue_type: &str, urgency: &str, date: &str) -> ReportRecord {
        ReportRecord {
            id: Some(id.to_string()),
            location: Some("-37.47 -72.34".to_string()),
            issue_type: Some(issue_type.to_string()),
            urgency_level: Some(urgency.to_string()),
            detection_date: Some(date.to_string()),
            ..ReportRecord::default()
        }
    }

    fn state() -> web::Data<AppState> {
        let config = DashboardConfig::embedded_default().unwrap();
        let settings = RenderSettings::from_config(&config);
        let table = ReportTable::new(vec![
            record("1", "structural", "high", "2024-11-02"),
            record("2", "electrical", "low", "2024-11-20"),
            record("3", "structural", "medio", "2024-12-05"),
        ]);
        let store = Arc::new(SnapshotStore::new(empty_snapshot(&settings)));
        store.publish(PublishedSnapshot {
            cycle: 4,
            refreshed_at: Some(Utc::now()),
            snapshot: build_snapshot(table, &settings, parse_gps_location),
        });
        web::Data::new(AppState::new(store, &config))
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = test::init_service(App::new().configure(configure_api)).await;
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn dashboard_returns_published_snapshot() {
        let app =
            test::init_service(App::new().app_data(state()).configure(configure_api)).await;
        let req = test::TestRequest::get().uri("/api/dashboard").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["cycle"], 4);
        assert!(body["refreshedAt"].is_string());
        assert_eq!(body["table"].as_array().unwrap().len(), 3);
        // Base layer plus one marker per located report
        assert_eq!(body["layers"].as_array().unwrap().len(), 4);
        assert_eq!(body["chart"]["data"][0]["x"][0], "structural");
        assert_eq!(body["chart"]["data"][0]["y"][0], 2);
        assert_eq!(body["urgency"]["high"], 1);
    }

    #[actix_web::test]
    async fn map_returns_configured_view() {
        let app =
            test::init_service(App::new().app_data(state()).configure(configure_api)).await;
        let req = test::TestRequest::get().uri("/api/map").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["zoom"], 17);
        assert_eq!(body["refreshIntervalMs"], 60_000);
    }

    #[actix_web::test]
    async fn heatmap_has_a_point_per_marker() {
        let app =
            test::init_service(App::new().app_data(state()).configure(configure_api)).await;
        let req = test::TestRequest::get().uri("/api/heatmap").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let points = body.as_array().unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], serde_json::json!([-37.47, -72.34, 1.0]));
    }

    #[actix_web::test]
    async fn reports_applies_filters() {
        let app =
            test::init_service(App::new().app_data(state()).configure(configure_api)).await;
        let req = test::TestRequest::get()
            .uri("/api/reports?issueType=Structural&from=2024-11-01&to=2024-11-30")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["_id"], "1");
    }

    #[actix_web::test]
    async fn reports_rejects_bad_date() {
        let app =
            test::init_service(App::new().app_data(state()).configure(configure_api)).await;
        let req = test::TestRequest::get()
            .uri("/api/reports?from=yesterday")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("yesterday"));
    }

    #[actix_web::test]
    async fn reports_csv_is_an_attachment() {
        let app =
            test::init_service(App::new().app_data(state()).configure(configure_api)).await;
        let req = test::TestRequest::get()
            .uri("/api/reports.csv?urgency=low")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let disposition = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"reportes_"));

        let body = test::read_body(resp).await;
        let text = std::str::from_utf8(&body).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).unwrap().starts_with("2,"));
    }
}
