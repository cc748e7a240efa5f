use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::domain::{MentorDraft, MentorId, ScholarDraft, ScholarId};
use super::engine::AutoAssignOptions;
use super::roster::Roster;
use super::service::{MentorMapService, MentorMapServiceError};
use super::snapshots::{SnapshotError, SnapshotStore};

/// Router builder exposing the roster, matching, signal and snapshot endpoints.
pub fn roster_router<S>(service: Arc<MentorMapService<S>>) -> Router
where
    S: SnapshotStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/roster",
            get(roster_handler::<S>).put(replace_roster_handler::<S>),
        )
        .route("/api/v1/roster/notes", put(notes_handler::<S>))
        .route("/api/v1/mentors", post(add_mentor_handler::<S>))
        .route("/api/v1/mentors/:mentor_id", put(update_mentor_handler::<S>))
        .route("/api/v1/scholars", post(add_scholar_handler::<S>))
        .route(
            "/api/v1/scholars/:scholar_id",
            put(update_scholar_handler::<S>),
        )
        .route(
            "/api/v1/scholars/:scholar_id/backups",
            get(backups_handler::<S>),
        )
        .route("/api/v1/matches", get(matches_handler::<S>))
        .route("/api/v1/assignments", post(assign_handler::<S>))
        .route(
            "/api/v1/assignments/auto",
            post(auto_assign_handler::<S>),
        )
        .route(
            "/api/v1/assignments/:scholar_id",
            axum::routing::delete(unassign_handler::<S>),
        )
        .route("/api/v1/signals", get(signals_handler::<S>))
        .route("/api/v1/snapshots", post(save_snapshot_handler::<S>))
        .route("/api/v1/snapshots/:key", get(snapshot_handler::<S>))
        .route(
            "/api/v1/snapshots/:key/restore",
            post(restore_snapshot_handler::<S>),
        )
        .route(
            "/api/v1/snapshots/:key/history",
            get(history_handler::<S>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MatchesQuery {
    pub(crate) top_n: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SnapshotQuery {
    pub(crate) key: Option<String>,
    pub(crate) limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssignmentRequest {
    pub(crate) scholar_id: ScholarId,
    pub(crate) mentor_id: MentorId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NotesRequest {
    #[serde(default)]
    pub(crate) notes: String,
}

fn error_payload(status: StatusCode, message: String) -> Response {
    (status, axum::Json(json!({ "error": message }))).into_response()
}

fn service_error(error: MentorMapServiceError) -> Response {
    match error {
        MentorMapServiceError::MentorNotFound(_)
        | MentorMapServiceError::ScholarNotFound(_)
        | MentorMapServiceError::Snapshot(SnapshotError::NotFound) => {
            error_payload(StatusCode::NOT_FOUND, error.to_string())
        }
        other => {
            warn!(error = %other, "mentor map request failed");
            error_payload(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

fn respond<T: serde::Serialize>(
    status: StatusCode,
    result: Result<T, MentorMapServiceError>,
) -> Response {
    match result {
        Ok(body) => (status, axum::Json(body)).into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn roster_handler<S>(State(service): State<Arc<MentorMapService<S>>>) -> Response
where
    S: SnapshotStore + 'static,
{
    respond(StatusCode::OK, service.roster())
}

/// Accepts any JSON value so a structurally wrong roster reads as 400 with the parse error.
pub(crate) async fn replace_roster_handler<S>(
    State(service): State<Arc<MentorMapService<S>>>,
    axum::Json(payload): axum::Json<serde_json::Value>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    match Roster::from_value(payload) {
        Ok(roster) => respond(StatusCode::OK, service.replace_roster(roster)),
        Err(error) => error_payload(StatusCode::BAD_REQUEST, error.to_string()),
    }
}

pub(crate) async fn notes_handler<S>(
    State(service): State<Arc<MentorMapService<S>>>,
    axum::Json(request): axum::Json<NotesRequest>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    respond(StatusCode::OK, service.set_notes(request.notes))
}

pub(crate) async fn add_mentor_handler<S>(
    State(service): State<Arc<MentorMapService<S>>>,
    axum::Json(draft): axum::Json<MentorDraft>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    respond(StatusCode::CREATED, service.add_mentor(draft))
}

pub(crate) async fn update_mentor_handler<S>(
    State(service): State<Arc<MentorMapService<S>>>,
    Path(mentor_id): Path<String>,
    axum::Json(draft): axum::Json<MentorDraft>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    respond(
        StatusCode::OK,
        service.update_mentor(&MentorId::new(mentor_id), draft),
    )
}

pub(crate) async fn add_scholar_handler<S>(
    State(service): State<Arc<MentorMapService<S>>>,
    axum::Json(draft): axum::Json<ScholarDraft>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    respond(StatusCode::CREATED, service.add_scholar(draft))
}

pub(crate) async fn update_scholar_handler<S>(
    State(service): State<Arc<MentorMapService<S>>>,
    Path(scholar_id): Path<String>,
    axum::Json(draft): axum::Json<ScholarDraft>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    respond(
        StatusCode::OK,
        service.update_scholar(&ScholarId::new(scholar_id), draft),
    )
}

pub(crate) async fn backups_handler<S>(
    State(service): State<Arc<MentorMapService<S>>>,
    Path(scholar_id): Path<String>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    respond(StatusCode::OK, service.backups(&ScholarId::new(scholar_id)))
}

pub(crate) async fn matches_handler<S>(
    State(service): State<Arc<MentorMapService<S>>>,
    Query(query): Query<MatchesQuery>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    respond(StatusCode::OK, service.matches(query.top_n))
}

pub(crate) async fn assign_handler<S>(
    State(service): State<Arc<MentorMapService<S>>>,
    axum::Json(request): axum::Json<AssignmentRequest>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    respond(
        StatusCode::OK,
        service.assign(&request.scholar_id, &request.mentor_id),
    )
}

pub(crate) async fn unassign_handler<S>(
    State(service): State<Arc<MentorMapService<S>>>,
    Path(scholar_id): Path<String>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    respond(StatusCode::OK, service.unassign(&ScholarId::new(scholar_id)))
}

pub(crate) async fn auto_assign_handler<S>(
    State(service): State<Arc<MentorMapService<S>>>,
    Query(options): Query<AutoAssignOptions>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    respond(StatusCode::OK, service.auto_assign(options))
}

pub(crate) async fn signals_handler<S>(State(service): State<Arc<MentorMapService<S>>>) -> Response
where
    S: SnapshotStore + 'static,
{
    respond(StatusCode::OK, service.report())
}

pub(crate) async fn save_snapshot_handler<S>(
    State(service): State<Arc<MentorMapService<S>>>,
    Query(query): Query<SnapshotQuery>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    respond(
        StatusCode::CREATED,
        service.save_snapshot(query.key.as_deref()),
    )
}

pub(crate) async fn snapshot_handler<S>(
    State(service): State<Arc<MentorMapService<S>>>,
    Path(key): Path<String>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    respond(StatusCode::OK, service.snapshot(Some(key.as_str())))
}

pub(crate) async fn restore_snapshot_handler<S>(
    State(service): State<Arc<MentorMapService<S>>>,
    Path(key): Path<String>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    respond(StatusCode::OK, service.restore_snapshot(Some(key.as_str())))
}

pub(crate) async fn history_handler<S>(
    State(service): State<Arc<MentorMapService<S>>>,
    Path(key): Path<String>,
    Query(query): Query<SnapshotQuery>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    respond(StatusCode::OK, service.history(Some(key.as_str()), query.limit))
}
