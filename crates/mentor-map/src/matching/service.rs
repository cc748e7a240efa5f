use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::info;

use super::analytics::views::SignalReport;
use super::domain::{Mentor, MentorDraft, MentorId, Scholar, ScholarDraft, ScholarId};
use super::engine::{self, AssignmentChange, AutoAssignOptions, AutoAssignReport};
use super::ranking::{self, BackupCandidate, ScholarMatches, DEFAULT_TOP_N};
use super::roster::Roster;
use super::snapshots::{
    SnapshotError, SnapshotRecord, SnapshotStore, SnapshotSummary, DEFAULT_SNAPSHOT_KEY,
};

pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Service-level knobs, usually lifted from `MatchingConfig`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    pub top_n: usize,
    pub snapshot_key: String,
    pub history_limit: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            snapshot_key: DEFAULT_SNAPSHOT_KEY.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Single-writer facade over one roster and a snapshot store.
pub struct MentorMapService<S> {
    roster: Mutex<Roster>,
    store: Arc<S>,
    settings: ServiceSettings,
    mentor_sequence: AtomicU64,
    scholar_sequence: AtomicU64,
}

impl<S> MentorMapService<S>
where
    S: SnapshotStore + 'static,
{
    pub fn new(store: Arc<S>, settings: ServiceSettings) -> Self {
        Self::with_roster(store, Roster::default(), settings)
    }

    pub fn with_roster(store: Arc<S>, roster: Roster, settings: ServiceSettings) -> Self {
        Self {
            roster: Mutex::new(roster),
            store,
            settings,
            mentor_sequence: AtomicU64::new(1),
            scholar_sequence: AtomicU64::new(1),
        }
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    fn state(&self) -> Result<MutexGuard<'_, Roster>, MentorMapServiceError> {
        self.roster
            .lock()
            .map_err(|_| MentorMapServiceError::StateUnavailable)
    }

    pub fn roster(&self) -> Result<Roster, MentorMapServiceError> {
        Ok(self.state()?.clone())
    }

    pub fn replace_roster(&self, roster: Roster) -> Result<Roster, MentorMapServiceError> {
        let mut state = self.state()?;
        *state = roster;
        info!(
            mentors = state.mentors.len(),
            scholars = state.scholars.len(),
            "roster replaced"
        );
        Ok(state.clone())
    }

    pub fn set_notes(&self, notes: String) -> Result<Roster, MentorMapServiceError> {
        let mut state = self.state()?;
        state.notes = notes;
        Ok(state.clone())
    }

    pub fn add_mentor(&self, draft: MentorDraft) -> Result<Mentor, MentorMapServiceError> {
        let mut state = self.state()?;
        let id = next_free_id(&self.mentor_sequence, "m", |candidate| {
            state.mentor(&MentorId::new(candidate)).is_some()
        });
        let mentor = draft.into_mentor(MentorId::new(id));
        state.upsert_mentor(mentor.clone());
        info!(mentor = %mentor.id, "mentor added");
        Ok(mentor)
    }

    pub fn update_mentor(
        &self,
        mentor_id: &MentorId,
        draft: MentorDraft,
    ) -> Result<Mentor, MentorMapServiceError> {
        let mut state = self.state()?;
        if state.mentor(mentor_id).is_none() {
            return Err(MentorMapServiceError::MentorNotFound(mentor_id.clone()));
        }
        let mentor = draft.into_mentor(mentor_id.clone());
        state.upsert_mentor(mentor.clone());
        Ok(mentor)
    }

    pub fn add_scholar(&self, draft: ScholarDraft) -> Result<Scholar, MentorMapServiceError> {
        let mut state = self.state()?;
        let id = next_free_id(&self.scholar_sequence, "s", |candidate| {
            state.scholar(&ScholarId::new(candidate)).is_some()
        });
        let scholar = draft.into_scholar(ScholarId::new(id));
        state.upsert_scholar(scholar.clone());
        info!(scholar = %scholar.id, "scholar added");
        Ok(scholar)
    }

    pub fn update_scholar(
        &self,
        scholar_id: &ScholarId,
        draft: ScholarDraft,
    ) -> Result<Scholar, MentorMapServiceError> {
        let mut state = self.state()?;
        if state.scholar(scholar_id).is_none() {
            return Err(MentorMapServiceError::ScholarNotFound(scholar_id.clone()));
        }
        let scholar = draft.into_scholar(scholar_id.clone());
        state.upsert_scholar(scholar.clone());
        Ok(scholar)
    }

    /// Ranked candidates for every scholar; `top_n` falls back to the configured default.
    pub fn matches(
        &self,
        top_n: Option<usize>,
    ) -> Result<Vec<ScholarMatches>, MentorMapServiceError> {
        let top_n = top_n.filter(|n| *n > 0).unwrap_or(self.settings.top_n);
        let state = self.state()?;
        Ok(ranking::build_matches(&state, top_n))
    }

    pub fn backups(
        &self,
        scholar_id: &ScholarId,
    ) -> Result<Vec<BackupCandidate>, MentorMapServiceError> {
        let state = self.state()?;
        if state.scholar(scholar_id).is_none() {
            return Err(MentorMapServiceError::ScholarNotFound(scholar_id.clone()));
        }
        Ok(ranking::backups_for(&state, scholar_id))
    }

    pub fn assign(
        &self,
        scholar_id: &ScholarId,
        mentor_id: &MentorId,
    ) -> Result<AssignmentChange, MentorMapServiceError> {
        let mut state = self.state()?;
        if state.scholar(scholar_id).is_none() {
            return Err(MentorMapServiceError::ScholarNotFound(scholar_id.clone()));
        }
        if state.mentor(mentor_id).is_none() {
            return Err(MentorMapServiceError::MentorNotFound(mentor_id.clone()));
        }
        let change = engine::assign(&mut state, scholar_id, mentor_id);
        info!(scholar = %scholar_id, mentor = %mentor_id, ?change, "assignment requested");
        Ok(change)
    }

    /// Clears a seat. Stale entries for scholars no longer on the roster can still be cleared.
    pub fn unassign(
        &self,
        scholar_id: &ScholarId,
    ) -> Result<AssignmentChange, MentorMapServiceError> {
        let mut state = self.state()?;
        if state.scholar(scholar_id).is_none() && !state.assignments.is_assigned(scholar_id) {
            return Err(MentorMapServiceError::ScholarNotFound(scholar_id.clone()));
        }
        let change = engine::unassign(&mut state, scholar_id);
        info!(scholar = %scholar_id, ?change, "unassignment requested");
        Ok(change)
    }

    pub fn auto_assign(
        &self,
        options: AutoAssignOptions,
    ) -> Result<AutoAssignReport, MentorMapServiceError> {
        let mut state = self.state()?;
        let report = engine::auto_assign(&mut state, options);
        info!(
            placed = report.placements.len(),
            unplaced = report.unplaced.len(),
            open_only = options.open_only,
            "auto-assign finished"
        );
        Ok(report)
    }

    pub fn report(&self) -> Result<SignalReport, MentorMapServiceError> {
        let state = self.state()?;
        Ok(SignalReport::build(&state))
    }

    fn key_or_default<'a>(&'a self, key: Option<&'a str>) -> &'a str {
        key.map(str::trim)
            .filter(|key| !key.is_empty())
            .unwrap_or(self.settings.snapshot_key.as_str())
    }

    /// Persist the current roster; the stored sync time is copied back into live state.
    pub fn save_snapshot(
        &self,
        key: Option<&str>,
    ) -> Result<SnapshotRecord, MentorMapServiceError> {
        let key = self.key_or_default(key);
        let mut state = self.state()?;
        let record = self.store.save(key, state.clone())?;
        state.last_synced_at = record.roster.last_synced_at;
        info!(key, revision = record.revision, "snapshot saved");
        Ok(record)
    }

    pub fn snapshot(&self, key: Option<&str>) -> Result<SnapshotRecord, MentorMapServiceError> {
        let key = self.key_or_default(key);
        self.store
            .latest(key)?
            .ok_or(MentorMapServiceError::Snapshot(SnapshotError::NotFound))
    }

    /// Replace live state with the latest stored revision.
    pub fn restore_snapshot(&self, key: Option<&str>) -> Result<Roster, MentorMapServiceError> {
        let record = self.snapshot(key)?;
        let mut state = self.state()?;
        *state = record.roster;
        info!(key = %record.key, revision = record.revision, "snapshot restored");
        Ok(state.clone())
    }

    pub fn history(
        &self,
        key: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<SnapshotSummary>, MentorMapServiceError> {
        let key = self.key_or_default(key);
        let limit = limit
            .filter(|limit| *limit > 0)
            .unwrap_or(self.settings.history_limit);
        Ok(self.store.history(key, limit)?)
    }
}

/// `prefix-000001` style ids, skipping any already taken on the roster.
fn next_free_id(sequence: &AtomicU64, prefix: &str, taken: impl Fn(&str) -> bool) -> String {
    loop {
        let value = sequence.fetch_add(1, Ordering::Relaxed);
        let candidate = format!("{prefix}-{value:06}");
        if !taken(&candidate) {
            return candidate;
        }
    }
}

/// Error raised by the mentor map service.
#[derive(Debug, thiserror::Error)]
pub enum MentorMapServiceError {
    #[error("mentor {0} not found")]
    MentorNotFound(MentorId),
    #[error("scholar {0} not found")]
    ScholarNotFound(ScholarId),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error("roster state unavailable")]
    StateUnavailable,
}
