//! Typed errors for bookmark persistence and event sources.

use thiserror::Error;

/// Stored bookmark bytes could not be turned back into records.
///
/// Never reaches callers of `load`: it is logged and the load falls back to
/// an empty set.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read slot {key}: {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed bookmark data in slot {key}: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Writing the accepted set to durable storage failed.
///
/// In-memory state is still valid when this is returned; the records just
/// may not survive a restart.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to encode bookmarks: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write slot {key}: {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The save worker panicked or was cancelled mid-write.
    #[error("save worker failed: {0}")]
    Worker(String),

    /// The save worker shut down before answering.
    #[error("save worker is gone")]
    WorkerGone,
}

/// Fetching candidate events from the remote store failed.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read events from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode events: {0}")]
    Decode(#[from] serde_json::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("event store responded with status {0}")]
    Status(u16),

    #[error("no event source configured")]
    Missing,
}

/// A triage session could not be started.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Loading bookmarks panicked or was cancelled. Starting anyway would let
    /// the next accept overwrite the stored set.
    #[error("failed to load bookmarks: {0}")]
    Load(String),
}

/// Result type alias for persistence operations.
pub type PersistenceResult<T> = std::result::Result<T, PersistenceError>;

/// Result type alias for event source operations.
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Result type alias for session startup.
pub type SessionResult<T> = std::result::Result<T, SessionError>;
