//! PersistenceGateway and StorageSlot implementations.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use thriveup_common::{DecodeError, EventRecord, PersistenceError, PersistenceResult};
use tracing::{debug, info, warn};

use crate::traits::StorageSlot;

// ---------------------------------------------------------------------------
// PersistenceGateway
// ---------------------------------------------------------------------------

/// Sole reader and writer of the bookmarked-events slot.
///
/// The accepted set is stored as one JSON array under a fixed key. Writes
/// through a gateway are serialized; the slot guarantees each write replaces
/// the previous contents atomically.
pub struct PersistenceGateway {
    slot: Arc<dyn StorageSlot>,
    key: String,
    write_lock: Mutex<()>,
}

impl PersistenceGateway {
    pub fn new(slot: Arc<dyn StorageSlot>, key: impl Into<String>) -> Self {
        Self {
            slot,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the accepted set. Never fails: a missing slot is an empty set, and
    /// unreadable or malformed bytes are logged and treated the same way.
    pub fn load(&self) -> Vec<EventRecord> {
        match self.try_load() {
            Ok(records) => {
                info!(key = %self.key, count = records.len(), "Loaded bookmarks");
                records
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Discarding unreadable bookmarks");
                Vec::new()
            }
        }
    }

    fn try_load(&self) -> Result<Vec<EventRecord>, DecodeError> {
        let bytes = self.slot.read(&self.key).map_err(|source| DecodeError::Read {
            key: self.key.clone(),
            source,
        })?;
        let Some(bytes) = bytes else {
            debug!(key = %self.key, "No bookmarks stored yet");
            return Ok(Vec::new());
        };
        serde_json::from_slice(&bytes).map_err(|source| DecodeError::Malformed {
            key: self.key.clone(),
            source,
        })
    }

    /// Overwrite the slot with `records`, de-duplicated by id (first occurrence
    /// wins). Returns the number of records written.
    pub fn save(&self, records: &[EventRecord]) -> PersistenceResult<usize> {
        let unique = dedupe_by_id(records);
        let bytes = serde_json::to_vec(&unique)?;

        let _guard = self.write_lock.lock().unwrap_or_else(|p| p.into_inner());
        self.slot
            .write(&self.key, &bytes)
            .map_err(|source| PersistenceError::Write {
                key: self.key.clone(),
                source,
            })?;

        info!(key = %self.key, count = unique.len(), "Saved bookmarks");
        Ok(unique.len())
    }
}

/// Drop records whose id was already seen, keeping the first occurrence and
/// the original order.
pub fn dedupe_by_id(records: &[EventRecord]) -> Vec<EventRecord> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.id.as_str()))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// FileSlot (production — one JSON file per key)
// ---------------------------------------------------------------------------

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Stores each key as `<dir>/<key>.json`. Writes go to a temporary sibling
/// which is then renamed over the target.
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> io::Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid slot key: {key:?}"),
            ));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl StorageSlot for FileSlot {
    fn read(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)?) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, key: &str, bytes: &[u8]) -> io::Result<()> {
        let target = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        let tmp = self.dir.join(format!(
            ".{key}.{}.{}.tmp",
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        let result = write_and_sync(&tmp, bytes).and_then(|()| fs::rename(&tmp, &target));
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }
}

fn write_and_sync(path: &Path, bytes: &[u8]) -> io::Result<()> {
    use std::io::Write;

    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

// ---------------------------------------------------------------------------
// MemorySlot (tests — no filesystem required)
// ---------------------------------------------------------------------------

/// In-memory slot for testing. Thread-safe. Can be switched into a mode where
/// every write fails, to exercise persistence error paths.
#[derive(Default)]
pub struct MemorySlot {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
    writes: AtomicU64,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed raw bytes under `key` (e.g. corrupt data).
    pub fn with_bytes(self, key: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.entries
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(key.into(), bytes.into());
        self
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Raw bytes currently stored under `key` (for test assertions).
    pub fn bytes(&self, key: &str) -> Option<Vec<u8>> {
        self.entries
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(key)
            .cloned()
    }
}

impl StorageSlot for MemorySlot {
    fn read(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.bytes(key))
    }

    fn write(&self, key: &str, bytes: &[u8]) -> io::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::Other, "simulated write failure"));
        }
        self.entries
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(key.to_string(), bytes.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Arc<S> blanket — lets tests share the slot for assertions
// ---------------------------------------------------------------------------

impl<S: StorageSlot + ?Sized> StorageSlot for Arc<S> {
    fn read(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, bytes: &[u8]) -> io::Result<()> {
        (**self).write(key, bytes)
    }
}
