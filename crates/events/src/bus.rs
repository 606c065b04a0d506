//! In-process event bus backed by a tokio broadcast channel

use multisig_approval::{EventSink, MultisigEvent};
use tokio::sync::broadcast;

/// Default number of buffered events per subscriber
pub const DEFAULT_CAPACITY: usize = 1024;

/// Broadcast event bus.
///
/// `emit` never waits: with no subscribers the event is dropped, and a
/// subscriber that falls more than `capacity` events behind skips ahead.
pub struct EventBus {
    sender: broadcast::Sender<MultisigEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Receive every event emitted from now on
    pub fn subscribe(&self) -> broadcast::Receiver<MultisigEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl EventSink for EventBus {
    fn emit(&self, event: MultisigEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("No subscribers, event dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_reaches_subscribers() {
        let bus = EventBus::new(8);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.emit(MultisigEvent::QuorumUpdateInitiated { id: 1 });

        assert_eq!(rx1.recv().await.unwrap().tx_id(), 1);
        assert_eq!(rx2.recv().await.unwrap().tx_id(), 1);
    }

    #[test]
    fn test_emit_without_subscribers() {
        let bus = EventBus::default();
        bus.emit(MultisigEvent::QuorumUpdateInitiated { id: 1 });
        assert_eq!(bus.subscriber_count(), 0);
    }
}
