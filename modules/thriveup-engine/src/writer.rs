//! Background save queue.

use std::sync::Arc;

use thriveup_common::{EventRecord, PersistenceError, PersistenceResult};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::persist::PersistenceGateway;

struct SaveRequest {
    records: Vec<EventRecord>,
    done: oneshot::Sender<PersistenceResult<usize>>,
}

/// Runs gateway saves off the interaction thread, strictly one at a time and
/// in submission order. A save submitted while another is running waits
/// behind it.
#[derive(Clone)]
pub struct SaveQueue {
    tx: mpsc::UnboundedSender<SaveRequest>,
}

impl SaveQueue {
    /// Spawn the worker on the current tokio runtime. The worker exits once
    /// every `SaveQueue` handle has been dropped and the queue is drained.
    pub fn spawn(gateway: Arc<PersistenceGateway>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<SaveRequest>();

        tokio::spawn(async move {
            while let Some(SaveRequest { records, done }) = rx.recv().await {
                let gw = Arc::clone(&gateway);
                let result = match tokio::task::spawn_blocking(move || gw.save(&records)).await {
                    Ok(result) => result,
                    Err(e) => Err(PersistenceError::Worker(e.to_string())),
                };
                if let Err(e) = &result {
                    warn!(key = %gateway.key(), error = %e, "Bookmark save failed");
                }
                // The submitter may have dropped its ticket; the save still counts.
                let _ = done.send(result);
            }
            debug!(key = %gateway.key(), "Save queue closed");
        });

        Self { tx }
    }

    /// Queue a full overwrite of the slot with `records`.
    pub fn submit(&self, records: Vec<EventRecord>) -> SaveTicket {
        let (done, rx) = oneshot::channel();
        if self.tx.send(SaveRequest { records, done }).is_err() {
            warn!("Save submitted after the queue shut down");
        }
        SaveTicket { rx }
    }
}

/// Completion handle for one queued save. Resolves exactly once.
#[must_use = "a dropped ticket hides save failures"]
pub struct SaveTicket {
    rx: oneshot::Receiver<PersistenceResult<usize>>,
}

impl SaveTicket {
    /// Wait for the save to finish. Returns the number of records written.
    pub async fn wait(self) -> PersistenceResult<usize> {
        self.rx.await.unwrap_or(Err(PersistenceError::WorkerGone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemorySlot;

    const KEY: &str = "bookmarkedEvents1";

    fn queue() -> (Arc<MemorySlot>, Arc<PersistenceGateway>, SaveQueue) {
        let slot = Arc::new(MemorySlot::new());
        let gateway = Arc::new(PersistenceGateway::new(slot.clone(), KEY));
        let queue = SaveQueue::spawn(gateway.clone());
        (slot, gateway, queue)
    }

    #[tokio::test]
    async fn saves_apply_in_submission_order() {
        let (slot, gateway, queue) = queue();

        let first = queue.submit(vec![EventRecord::new("e1", "Concert")]);
        let second = queue.submit(vec![
            EventRecord::new("e1", "Concert"),
            EventRecord::new("e2", "Dance"),
        ]);
        let third = queue.submit(vec![
            EventRecord::new("e1", "Concert"),
            EventRecord::new("e2", "Dance"),
            EventRecord::new("e3", "Hackathon"),
        ]);

        assert_eq!(first.wait().await.unwrap(), 1);
        assert_eq!(second.wait().await.unwrap(), 2);
        assert_eq!(third.wait().await.unwrap(), 3);

        let ids: Vec<String> = gateway.load().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["e1", "e2", "e3"]);
        assert_eq!(slot.write_count(), 3);
    }

    #[tokio::test]
    async fn failure_is_delivered_to_the_ticket() {
        let (slot, _gateway, queue) = queue();
        slot.set_fail_writes(true);

        let err = queue
            .submit(vec![EventRecord::new("e1", "Concert")])
            .wait()
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::Write { .. }));

        slot.set_fail_writes(false);
        let written = queue
            .submit(vec![EventRecord::new("e1", "Concert")])
            .wait()
            .await
            .unwrap();
        assert_eq!(written, 1);
    }

    #[tokio::test]
    async fn dropped_ticket_still_saves() {
        let (_slot, gateway, queue) = queue();
        drop(queue.submit(vec![EventRecord::new("e1", "Concert")]));
        queue
            .submit(vec![EventRecord::new("e1", "Concert"), EventRecord::new("e2", "Dance")])
            .wait()
            .await
            .unwrap();
        assert_eq!(gateway.load().len(), 2);
    }
}
