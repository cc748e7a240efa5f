use metrics_exporter_prometheus::PrometheusHandle;
use mentor_map::matching::snapshots::next_record;
use mentor_map::matching::{
    Roster, SnapshotError, SnapshotRecord, SnapshotStore, SnapshotSummary,
};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local snapshot history, lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemorySnapshotStore {
    records: Arc<Mutex<HashMap<String, Vec<SnapshotRecord>>>>,
    retain: Option<usize>,
}

impl InMemorySnapshotStore {
    pub(crate) fn with_retention(retain: usize) -> Self {
        Self {
            records: Arc::default(),
            retain: Some(retain.max(1)),
        }
    }

    fn guard(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<SnapshotRecord>>>, SnapshotError> {
        self.records
            .lock()
            .map_err(|_| SnapshotError::Unavailable("snapshot mutex poisoned".to_string()))
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn save(&self, key: &str, roster: Roster) -> Result<SnapshotRecord, SnapshotError> {
        let mut guard = self.guard()?;
        let history = guard.entry(key.to_string()).or_default();
        let record = next_record(key, history.last(), roster);
        history.push(record.clone());
        if let Some(retain) = self.retain {
            prune(history, retain);
        }
        Ok(record)
    }

    fn latest(&self, key: &str) -> Result<Option<SnapshotRecord>, SnapshotError> {
        let guard = self.guard()?;
        Ok(guard.get(key).and_then(|history| history.last().cloned()))
    }

    fn history(&self, key: &str, limit: usize) -> Result<Vec<SnapshotSummary>, SnapshotError> {
        let guard = self.guard()?;
        Ok(guard
            .get(key)
            .map(|history| summaries(history, limit))
            .unwrap_or_default())
    }
}

/// One JSON document per key under `dir`, holding that key's revisions oldest first.
pub(crate) struct FileSnapshotStore {
    dir: PathBuf,
    retain: usize,
    write_lock: Mutex<()>,
}

impl FileSnapshotStore {
    pub(crate) fn open(dir: impl Into<PathBuf>, retain: usize) -> Result<Self, SnapshotError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|err| unavailable(&dir, err))?;
        Ok(Self {
            dir,
            retain: retain.max(1),
            write_lock: Mutex::new(()),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_stem: String = key
            .chars()
            .map(|ch| {
                if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                    ch
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file_stem}.json"))
    }

    fn read(&self, key: &str) -> Result<Vec<SnapshotRecord>, SnapshotError> {
        let path = self.path_for(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(unavailable(&path, err)),
        };
        let records: Vec<SnapshotRecord> = serde_json::from_str(&raw)
            .map_err(|err| SnapshotError::Serialization(err.to_string()))?;
        // Files are keyed by a sanitized name, so two keys can share one file.
        Ok(records
            .into_iter()
            .filter(|record| record.key == key)
            .collect())
    }

    fn write(&self, key: &str, records: &[SnapshotRecord]) -> Result<(), SnapshotError> {
        let path = self.path_for(key);
        let encoded = serde_json::to_vec_pretty(records)
            .map_err(|err| SnapshotError::Serialization(err.to_string()))?;
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, encoded).map_err(|err| unavailable(&staging, err))?;
        fs::rename(&staging, &path).map_err(|err| unavailable(&path, err))?;
        debug!(path = %path.display(), revisions = records.len(), "snapshot file written");
        Ok(())
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn save(&self, key: &str, roster: Roster) -> Result<SnapshotRecord, SnapshotError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| SnapshotError::Unavailable("snapshot file lock poisoned".to_string()))?;
        let mut history = self.read(key)?;
        let record = next_record(key, history.last(), roster);
        history.push(record.clone());
        prune(&mut history, self.retain);
        self.write(key, &history)?;
        Ok(record)
    }

    fn latest(&self, key: &str) -> Result<Option<SnapshotRecord>, SnapshotError> {
        Ok(self.read(key)?.pop())
    }

    fn history(&self, key: &str, limit: usize) -> Result<Vec<SnapshotSummary>, SnapshotError> {
        Ok(summaries(&self.read(key)?, limit))
    }
}

fn prune(history: &mut Vec<SnapshotRecord>, retain: usize) {
    if history.len() > retain {
        let excess = history.len() - retain;
        history.drain(..excess);
    }
}

fn summaries(history: &[SnapshotRecord], limit: usize) -> Vec<SnapshotSummary> {
    history
        .iter()
        .rev()
        .take(limit)
        .map(SnapshotRecord::summary)
        .collect()
}

fn unavailable(path: &Path, err: std::io::Error) -> SnapshotError {
    SnapshotError::Unavailable(format!("{}: {}", path.display(), err))
}
