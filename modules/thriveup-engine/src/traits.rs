//! Seams between the triage core and the outside world.

use std::io;

use async_trait::async_trait;
use thriveup_common::{EventRecord, SourceResult};

/// A byte-oriented key/value slot in durable storage.
///
/// Implemented by `FileSlot` (production) and `MemorySlot` (tests).
/// Also implemented for `Arc<S>` so a slot can be shared for assertions.
pub trait StorageSlot: Send + Sync {
    /// Read the bytes stored under `key`. `Ok(None)` when nothing is stored.
    fn read(&self, key: &str) -> io::Result<Option<Vec<u8>>>;

    /// Replace whatever is stored under `key`. A concurrent `read` must see
    /// either the old bytes or the new ones, never a mix.
    fn write(&self, key: &str, bytes: &[u8]) -> io::Result<()>;
}

/// The remote store that supplies candidate events.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch_all(&self) -> SourceResult<Vec<EventRecord>>;
}
