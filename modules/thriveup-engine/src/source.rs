//! EventSource implementations.

use std::path::PathBuf;

use async_trait::async_trait;
use thriveup_common::{EventRecord, SourceError, SourceResult};
use tracing::{info, warn};

use crate::traits::EventSource;

/// Decode a feed body. The body must be a JSON array; documents inside it that
/// don't decode as events are logged and skipped so one bad document never
/// hides the rest of the feed.
pub fn decode_feed(bytes: &[u8]) -> SourceResult<Vec<EventRecord>> {
    let documents: Vec<serde_json::Value> = serde_json::from_slice(bytes)?;
    let total = documents.len();
    let events: Vec<EventRecord> = documents
        .into_iter()
        .enumerate()
        .filter_map(|(position, doc)| match serde_json::from_value::<EventRecord>(doc) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!(position, error = %e, "Skipping malformed event");
                None
            }
        })
        .collect();
    if events.len() < total {
        warn!(skipped = total - events.len(), kept = events.len(), "Feed had malformed events");
    }
    Ok(events)
}

// ---------------------------------------------------------------------------
// HttpEventSource (production — JSON array over HTTP)
// ---------------------------------------------------------------------------

/// Fetches the full event feed as a JSON array from a URL.
pub struct HttpEventSource {
    client: reqwest::Client,
    url: String,
}

impl HttpEventSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl EventSource for HttpEventSource {
    async fn fetch_all(&self) -> SourceResult<Vec<EventRecord>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SourceError::Http(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SourceError::Http(Box::new(e)))?;
        let events = decode_feed(&body)?;
        info!(count = events.len(), "Fetched events over HTTP");
        Ok(events)
    }
}

// ---------------------------------------------------------------------------
// JsonFileEventSource (fixtures, offline use)
// ---------------------------------------------------------------------------

/// Reads the event feed from a JSON array on disk.
pub struct JsonFileEventSource {
    path: PathBuf,
}

impl JsonFileEventSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl EventSource for JsonFileEventSource {
    async fn fetch_all(&self) -> SourceResult<Vec<EventRecord>> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SourceError::Read {
                path: self.path.display().to_string(),
                source,
            })?;
        let events = decode_feed(&bytes)?;
        info!(path = %self.path.display(), count = events.len(), "Loaded events from file");
        Ok(events)
    }
}

// ---------------------------------------------------------------------------
// MemoryEventSource (tests)
// ---------------------------------------------------------------------------

/// Serves a fixed list of events.
#[derive(Default)]
pub struct MemoryEventSource {
    events: Vec<EventRecord>,
}

impl MemoryEventSource {
    pub fn new(events: Vec<EventRecord>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl EventSource for MemoryEventSource {
    async fn fetch_all(&self) -> SourceResult<Vec<EventRecord>> {
        Ok(self.events.clone())
    }
}
