use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::roster::Roster;

pub const DEFAULT_SNAPSHOT_KEY: &str = "default";

/// A stored revision of the whole roster under a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub key: String,
    /// Starts at 1 and increases by one per save under the same key.
    pub revision: u64,
    pub saved_at: DateTime<Utc>,
    pub roster: Roster,
}

impl SnapshotRecord {
    pub fn summary(&self) -> SnapshotSummary {
        SnapshotSummary {
            key: self.key.clone(),
            revision: self.revision,
            saved_at: self.saved_at,
            mentors: self.roster.mentors.len(),
            scholars: self.roster.scholars.len(),
            assignments: self.roster.assignments.len(),
        }
    }
}

/// History listing entry; omits the roster payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub key: String,
    pub revision: u64,
    pub saved_at: DateTime<Utc>,
    pub mentors: usize,
    pub scholars: usize,
    pub assignments: usize,
}

/// Storage abstraction for roster snapshots so the service can run against
/// memory, files or a database.
pub trait SnapshotStore: Send + Sync {
    /// Persist a new revision. Implementations stamp `lastSyncedAt` with the save time.
    fn save(&self, key: &str, roster: Roster) -> Result<SnapshotRecord, SnapshotError>;
    fn latest(&self, key: &str) -> Result<Option<SnapshotRecord>, SnapshotError>;
    /// Newest first, at most `limit` entries.
    fn history(&self, key: &str, limit: usize) -> Result<Vec<SnapshotSummary>, SnapshotError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot not found")]
    NotFound,
    #[error("snapshot store unavailable: {0}")]
    Unavailable(String),
    #[error("snapshot could not be serialized: {0}")]
    Serialization(String),
}

/// Builds the next revision for `key` given the current latest one.
pub fn next_record(key: &str, previous: Option<&SnapshotRecord>, mut roster: Roster) -> SnapshotRecord {
    let saved_at = Utc::now();
    roster.last_synced_at = Some(saved_at);
    SnapshotRecord {
        key: key.to_string(),
        revision: previous.map(|record| record.revision + 1).unwrap_or(1),
        saved_at,
        roster,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revisions_increase_and_stamp_sync_time() {
        let first = next_record(DEFAULT_SNAPSHOT_KEY, None, Roster::default());
        assert_eq!(first.revision, 1);
        assert_eq!(first.roster.last_synced_at, Some(first.saved_at));

        let second = next_record(DEFAULT_SNAPSHOT_KEY, Some(&first), Roster::default());
        assert_eq!(second.revision, 2);
        assert_eq!(second.summary().mentors, 0);
    }
}
