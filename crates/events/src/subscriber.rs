//! Event subscribers and the loop that drives them

use crate::error::EventError;
use crate::store::EventStore;
use async_trait::async_trait;
use multisig_approval::MultisigEvent;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::Mutex;

/// Trait for event subscribers
///
/// Subscribers run on their own task and never hold up the engine.
#[async_trait]
pub trait EventSubscriber: Send + Sync {
    /// Get the subscriber name (for logging)
    fn name(&self) -> &str;

    /// Handle one engine event
    async fn handle(&self, event: &MultisigEvent) -> Result<(), EventError>;
}

/// Drain `receiver` into `subscriber` until every sender is dropped.
///
/// Handler errors and lag are logged and skipped. Returns the number of
/// events handled successfully.
pub async fn run_subscriber(
    mut receiver: broadcast::Receiver<MultisigEvent>,
    subscriber: Arc<dyn EventSubscriber>,
) -> usize {
    let mut handled = 0;

    loop {
        match receiver.recv().await {
            Ok(event) => match subscriber.handle(&event).await {
                Ok(()) => handled += 1,
                Err(e) => {
                    tracing::error!(
                        subscriber = subscriber.name(),
                        event = event.name(),
                        error = %e,
                        "Subscriber failed to handle event"
                    );
                }
            },
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(subscriber = subscriber.name(), skipped, "Subscriber lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }

    tracing::debug!(subscriber = subscriber.name(), handled, "Subscriber stopped");
    handled
}

/// Subscriber that appends every event to the JSONL journal
pub struct JournalSubscriber {
    store: Mutex<EventStore>,
}

impl JournalSubscriber {
    pub fn new(journal_path: impl AsRef<Path>) -> Result<Self, EventError> {
        Ok(Self {
            store: Mutex::new(EventStore::new(journal_path)?),
        })
    }

    /// Sequence of the last journaled event
    pub async fn last_sequence(&self) -> u64 {
        self.store.lock().await.last_sequence()
    }
}

#[async_trait]
impl EventSubscriber for JournalSubscriber {
    fn name(&self) -> &str {
        "journal"
    }

    async fn handle(&self, event: &MultisigEvent) -> Result<(), EventError> {
        let record = self.store.lock().await.append(event)?;
        tracing::debug!(sequence = record.sequence, event = event.name(), "Event journaled");
        Ok(())
    }
}
