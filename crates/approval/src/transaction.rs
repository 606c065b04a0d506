//! Transaction records tracked by the ledger

use chrono::{DateTime, Utc};
use multisig_core::{Address, Amount, TxId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use strum_macros::{Display, EnumString};

/// Kind tag of a transaction, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxKind {
    Transfer,
    QuorumUpdate,
}

/// The action a transaction performs once it reaches quorum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransactionKind {
    /// Send `amount` of `token` from the engine's holdings to `recipient`
    Transfer {
        amount: Amount,
        recipient: Address,
        token: Address,
    },

    /// Replace the current quorum with `new_quorum`
    QuorumUpdate { new_quorum: u32 },
}

impl TransactionKind {
    pub fn tag(&self) -> TxKind {
        match self {
            TransactionKind::Transfer { .. } => TxKind::Transfer,
            TransactionKind::QuorumUpdate { .. } => TxKind::QuorumUpdate,
        }
    }
}

/// A single signer's approval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub signer: Address,
    pub approved_at: DateTime<Utc>,
}

/// A proposed action and its approval state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Sequential id, starting at 1
    pub id: TxId,

    pub kind: TransactionKind,

    /// Signer that proposed the transaction (first approval)
    pub creator: Address,

    pub created_at: DateTime<Utc>,

    /// Set exactly once, when the quorum is reached
    pub completed_at: Option<DateTime<Utc>>,

    /// Approvals in the order they were recorded
    pub approvals: Vec<Approval>,
}

impl Transaction {
    /// Create an open transaction with the creator pre-approved
    pub(crate) fn new(id: TxId, kind: TransactionKind, creator: Address) -> Self {
        let now = Utc::now();
        Self {
            id,
            kind,
            creator,
            created_at: now,
            completed_at: None,
            approvals: vec![Approval {
                signer: creator,
                approved_at: now,
            }],
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn approval_count(&self) -> u32 {
        self.approvals.len() as u32
    }

    /// Check if `signer` has already approved this transaction
    pub fn has_signed(&self, signer: &Address) -> bool {
        self.approvals.iter().any(|a| &a.signer == signer)
    }

    /// Number of further approvals needed to reach `quorum`
    pub fn approvals_remaining(&self, quorum: u32) -> u32 {
        quorum.saturating_sub(self.approval_count())
    }

    /// Get list of signers that have approved
    pub fn signers(&self) -> Vec<Address> {
        self.approvals.iter().map(|a| a.signer).collect()
    }

    /// SHA256 over the immutable content of the record (id, creator, action).
    ///
    /// Signers can compare digests out-of-band before approving.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.id.to_le_bytes());
        hasher.update(self.creator.as_bytes());
        hasher.update(self.created_at.to_rfc3339().as_bytes());
        hasher.update(self.kind.tag().to_string().as_bytes());

        match &self.kind {
            TransactionKind::Transfer {
                amount,
                recipient,
                token,
            } => {
                hasher.update(amount.value().to_le_bytes());
                hasher.update(recipient.as_bytes());
                hasher.update(token.as_bytes());
            }
            TransactionKind::QuorumUpdate { new_quorum } => {
                hasher.update(new_quorum.to_le_bytes());
            }
        }

        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transfer_kind() -> TransactionKind {
        TransactionKind::Transfer {
            amount: Amount::new(10),
            recipient: Address::from_low_u8(0xAA),
            token: Address::from_low_u8(0xEE),
        }
    }

    #[test]
    fn test_new_transaction_is_pre_approved() {
        let creator = Address::from_low_u8(1);
        let tx = Transaction::new(1, transfer_kind(), creator);

        assert_eq!(tx.approval_count(), 1);
        assert!(tx.has_signed(&creator));
        assert!(!tx.has_signed(&Address::from_low_u8(2)));
        assert!(!tx.is_completed());
        assert_eq!(tx.approvals_remaining(3), 2);
        assert_eq!(tx.approvals_remaining(1), 0);
    }

    #[test]
    fn test_kind_tag_display() {
        assert_eq!(transfer_kind().tag(), TxKind::Transfer);
        assert_eq!(TxKind::QuorumUpdate.to_string(), "QUORUM_UPDATE");
        assert_eq!("TRANSFER".parse::<TxKind>().unwrap(), TxKind::Transfer);
    }

    #[test]
    fn test_digest_depends_on_payload() {
        let creator = Address::from_low_u8(1);
        let a = Transaction::new(1, transfer_kind(), creator);
        let mut b = a.clone();
        b.kind = TransactionKind::Transfer {
            amount: Amount::new(11),
            recipient: Address::from_low_u8(0xAA),
            token: Address::from_low_u8(0xEE),
        };

        assert_eq!(a.digest(), a.clone().digest());
        assert_ne!(a.digest(), b.digest());
        assert_eq!(a.digest().len(), 64);
    }

    #[test]
    fn test_digest_ignores_approvals() {
        let kind = TransactionKind::QuorumUpdate { new_quorum: 3 };
        let mut tx = Transaction::new(1, kind, Address::from_low_u8(1));
        let before = tx.digest();
        tx.approvals.push(Approval {
            signer: Address::from_low_u8(2),
            approved_at: Utc::now(),
        });
        assert_eq!(tx.digest(), before);
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&TransactionKind::QuorumUpdate { new_quorum: 3 }).unwrap();
        assert_eq!(json, r#"{"kind":"quorum_update","new_quorum":3}"#);
    }
}
