use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use mentor_map::error::AppError;
use mentor_map::matching::{
    auto_assign, build_matches, roster_router, AutoAssignOptions, AutoAssignReport,
    MentorMapService, Roster, ScholarMatches, SignalReport, SnapshotStore, DEFAULT_TOP_N,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// One-shot analysis of a roster supplied in the request body. Nothing is stored.
#[derive(Debug, Deserialize)]
pub(crate) struct RosterReportRequest {
    pub(crate) roster: serde_json::Value,
    #[serde(default)]
    pub(crate) auto_assign: bool,
    #[serde(default)]
    pub(crate) top_n: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RosterReportResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) auto_assign: Option<AutoAssignReport>,
    pub(crate) signals: SignalReport,
    pub(crate) matches: Vec<ScholarMatches>,
    pub(crate) roster: Roster,
}

pub(crate) fn with_roster_routes<S>(service: Arc<MentorMapService<S>>) -> axum::Router
where
    S: SnapshotStore + 'static,
{
    roster_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/report",
            axum::routing::post(roster_report_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn roster_report_endpoint(
    Json(payload): Json<RosterReportRequest>,
) -> Result<Json<RosterReportResponse>, AppError> {
    let RosterReportRequest {
        roster,
        auto_assign: run_auto_assign,
        top_n,
    } = payload;

    let mut roster = Roster::from_value(roster)?;
    let placements = if run_auto_assign {
        Some(auto_assign(&mut roster, AutoAssignOptions::default()))
    } else {
        None
    };

    let signals = SignalReport::build(&roster);
    let matches = build_matches(&roster, top_n.unwrap_or(DEFAULT_TOP_N));

    Ok(Json(RosterReportResponse {
        auto_assign: placements,
        signals,
        matches,
        roster,
    }))
}
