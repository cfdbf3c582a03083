//! Event triage and bookmark engine.
//!
//! A `TriageStack` of candidate events is worked from the top: accepted
//! events join the `BookmarkIndex` and are written through the
//! `PersistenceGateway` by a serialized `SaveQueue`; rejected events are
//! dropped. `TriageSession` ties these together.
//!
//! Storage and the remote event store sit behind the `StorageSlot` and
//! `EventSource` traits and are always passed in, never reached globally.

pub mod index;
pub mod persist;
pub mod session;
pub mod source;
pub mod traits;
pub mod triage;
pub mod writer;

pub use index::{rebuild, BookmarkIndex, CategorySection};
pub use persist::{dedupe_by_id, FileSlot, MemorySlot, PersistenceGateway};
pub use session::TriageSession;
pub use source::{decode_feed, HttpEventSource, JsonFileEventSource, MemoryEventSource};
pub use traits::{EventSource, StorageSlot};
pub use triage::{Decision, TriageStack, TriageState};
pub use writer::{SaveQueue, SaveTicket};
