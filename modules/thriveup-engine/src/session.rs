//! Wires the candidate stack, bookmark index and save queue together.

use std::sync::Arc;

use thriveup_common::{EventRecord, SessionError, SessionResult};
use tracing::{error, info};

use crate::index::BookmarkIndex;
use crate::persist::PersistenceGateway;
use crate::traits::EventSource;
use crate::triage::{TriageStack, TriageState};
use crate::writer::{SaveQueue, SaveTicket};

/// One triage session: the swipe screen's state plus the bookmarks it feeds.
///
/// Stack and index operations are synchronous and never block; every accept
/// queues a full save of the accepted set. If a save fails the in-memory
/// state is kept and the failure surfaces through the returned ticket.
pub struct TriageSession {
    stack: TriageStack,
    index: BookmarkIndex,
    saves: SaveQueue,
}

impl TriageSession {
    /// Load bookmarks (once), fetch candidates, and seed the stack with every
    /// event not already bookmarked. The feed's first event ends up on top.
    ///
    /// Fails if the feed can't be fetched or if loading bookmarks did not
    /// complete; a missing or corrupt slot is not a failure.
    ///
    /// Must be called within a tokio runtime.
    pub async fn start(
        source: &dyn EventSource,
        gateway: Arc<PersistenceGateway>,
    ) -> SessionResult<Self> {
        let load_gateway = Arc::clone(&gateway);
        let bookmarked = match tokio::task::spawn_blocking(move || load_gateway.load()).await {
            Ok(records) => records,
            Err(e) => {
                error!(key = %gateway.key(), error = %e, "Bookmark load did not complete");
                return Err(SessionError::Load(e.to_string()));
            }
        };
        let index = BookmarkIndex::new(bookmarked);

        let feed = source.fetch_all().await?;
        let fetched = feed.len();
        let mut candidates: Vec<EventRecord> = feed
            .into_iter()
            .filter(|event| !index.contains(&event.id))
            .collect();
        candidates.reverse();

        info!(
            fetched,
            candidates = candidates.len(),
            bookmarked = index.len(),
            "Triage session started"
        );

        Ok(Self::from_parts(TriageStack::new(candidates), index, SaveQueue::spawn(gateway)))
    }

    pub fn from_parts(stack: TriageStack, index: BookmarkIndex, saves: SaveQueue) -> Self {
        Self { stack, index, saves }
    }

    pub fn peek_top(&self) -> Option<&EventRecord> {
        self.stack.peek_top()
    }

    pub fn visible(&self, n: usize) -> impl Iterator<Item = &EventRecord> {
        self.stack.visible(n)
    }

    /// Bookmark the top candidate. Returns the record and the ticket for its
    /// save, or `None` when there is nothing left to triage.
    pub fn accept(&mut self) -> Option<(EventRecord, SaveTicket)> {
        let record = self.stack.accept()?;
        self.index.add(record.clone());
        let ticket = self.saves.submit(self.index.accepted().to_vec());
        Some((record, ticket))
    }

    /// Discard the top candidate. Nothing is persisted.
    pub fn reject(&mut self) -> Option<EventRecord> {
        self.stack.reject()
    }

    /// Queue another save of the current accepted set, e.g. after a failure.
    pub fn resave(&self) -> SaveTicket {
        self.saves.submit(self.index.accepted().to_vec())
    }

    pub fn index(&self) -> &BookmarkIndex {
        &self.index
    }

    /// Set the bookmark search text. An empty string clears it.
    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.index.set_filter(filter);
    }

    pub fn clear_filter(&mut self) {
        self.index.clear_filter();
    }

    pub fn remaining(&self) -> usize {
        self.stack.len()
    }

    pub fn state(&self) -> TriageState {
        self.stack.state()
    }
}
