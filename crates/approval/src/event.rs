//! Engine notifications and the sink they are delivered to

use chrono::{DateTime, Utc};
use multisig_core::{Address, TxId};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};

/// Events emitted by the approval engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MultisigEvent {
    /// A transfer was proposed
    TransferInitiated {
        id: TxId,
        timestamp: DateTime<Utc>,
    },

    /// A transfer reached quorum and was executed
    ApprovalSuccessful { id: TxId, approver: Address },

    /// A quorum update was proposed
    QuorumUpdateInitiated { id: TxId },

    /// A quorum update reached quorum and was committed
    QuorumUpdateSuccessful { id: TxId, new_quorum: u32 },
}

impl MultisigEvent {
    /// Transaction the event refers to
    pub fn tx_id(&self) -> TxId {
        match self {
            MultisigEvent::TransferInitiated { id, .. }
            | MultisigEvent::ApprovalSuccessful { id, .. }
            | MultisigEvent::QuorumUpdateInitiated { id }
            | MultisigEvent::QuorumUpdateSuccessful { id, .. } => *id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MultisigEvent::TransferInitiated { .. } => "TransferInitiated",
            MultisigEvent::ApprovalSuccessful { .. } => "ApprovalSuccessful",
            MultisigEvent::QuorumUpdateInitiated { .. } => "QuorumUpdateInitiated",
            MultisigEvent::QuorumUpdateSuccessful { .. } => "QuorumUpdateSuccessful",
        }
    }
}

/// Fire-and-forget consumer of engine events.
///
/// `emit` is called while the engine holds its state lock, so
/// implementations must not block.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: MultisigEvent);
}

/// Sink that drops every event
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: MultisigEvent) {}
}

/// Sink that keeps events in memory (for testing and inspection)
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<MultisigEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events emitted so far
    pub fn events(&self) -> Vec<MultisigEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return all events
    pub fn drain(&self) -> Vec<MultisigEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: MultisigEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
