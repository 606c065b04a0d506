//! Journal record wrapping an engine event

use chrono::{DateTime, Utc};
use multisig_approval::MultisigEvent;
use serde::{Deserialize, Serialize};

/// One line of the JSONL journal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Journal position, starting at 1
    pub sequence: u64,
    /// When the journal received the event
    pub recorded_at: DateTime<Utc>,
    pub event: MultisigEvent,
}
