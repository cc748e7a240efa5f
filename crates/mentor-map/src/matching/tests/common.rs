use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use serde_json::Value;

use crate::matching::roster::Roster;
use crate::matching::sample::sample_roster;
use crate::matching::service::{MentorMapService, ServiceSettings};
use crate::matching::snapshots::{
    next_record, SnapshotError, SnapshotRecord, SnapshotStore, SnapshotSummary,
};

#[derive(Default, Clone)]
pub(super) struct MemorySnapshots {
    pub(super) records: Arc<Mutex<HashMap<String, Vec<SnapshotRecord>>>>,
}

impl SnapshotStore for MemorySnapshots {
    fn save(&self, key: &str, roster: Roster) -> Result<SnapshotRecord, SnapshotError> {
        let mut guard = self.records.lock().expect("snapshot mutex poisoned");
        let history = guard.entry(key.to_string()).or_default();
        let record = next_record(key, history.last(), roster);
        history.push(record.clone());
        Ok(record)
    }

    fn latest(&self, key: &str) -> Result<Option<SnapshotRecord>, SnapshotError> {
        let guard = self.records.lock().expect("snapshot mutex poisoned");
        Ok(guard.get(key).and_then(|history| history.last().cloned()))
    }

    fn history(&self, key: &str, limit: usize) -> Result<Vec<SnapshotSummary>, SnapshotError> {
        let guard = self.records.lock().expect("snapshot mutex poisoned");
        Ok(guard
            .get(key)
            .map(|history| {
                history
                    .iter()
                    .rev()
                    .take(limit)
                    .map(SnapshotRecord::summary)
                    .collect()
            })
            .unwrap_or_default())
    }
}

pub(super) struct UnavailableSnapshots;

impl SnapshotStore for UnavailableSnapshots {
    fn save(&self, _key: &str, _roster: Roster) -> Result<SnapshotRecord, SnapshotError> {
        Err(SnapshotError::Unavailable("database offline".to_string()))
    }

    fn latest(&self, _key: &str) -> Result<Option<SnapshotRecord>, SnapshotError> {
        Err(SnapshotError::Unavailable("database offline".to_string()))
    }

    fn history(&self, _key: &str, _limit: usize) -> Result<Vec<SnapshotSummary>, SnapshotError> {
        Err(SnapshotError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (MentorMapService<MemorySnapshots>, Arc<MemorySnapshots>) {
    let store = Arc::new(MemorySnapshots::default());
    let service =
        MentorMapService::with_roster(store.clone(), sample_roster(), ServiceSettings::default());
    (service, store)
}

pub(super) fn unavailable_service() -> MentorMapService<UnavailableSnapshots> {
    MentorMapService::with_roster(
        Arc::new(UnavailableSnapshots),
        sample_roster(),
        ServiceSettings::default(),
    )
}

pub(super) fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_vec(&body).expect("request body encodes"),
        ))
        .expect("request builds")
}

pub(super) fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
