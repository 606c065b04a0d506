//! Transaction ledger - append-only store of proposals

use crate::error::{ApprovalError, ApprovalResult};
use crate::transaction::{Approval, Transaction, TransactionKind};
use chrono::Utc;
use multisig_core::{Address, TxId};

/// Append-only store of transactions.
///
/// Records live in a `Vec` indexed by `id - 1`, so ids are strictly
/// sequential and gap-free. Records are never removed.
#[derive(Debug, Default)]
pub struct TransactionLedger {
    records: Vec<Transaction>,
}

impl TransactionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id and store an open record with `creator`
    /// already counted as the first approval.
    pub fn allocate(&mut self, kind: TransactionKind, creator: Address) -> TxId {
        let id = self.records.len() as TxId + 1;
        self.records.push(Transaction::new(id, kind, creator));
        id
    }

    /// Get a record by id
    pub fn get(&self, id: TxId) -> ApprovalResult<&Transaction> {
        self.index(id).map(|i| &self.records[i])
    }

    /// Record `signer`'s approval and return the new approval count
    pub fn record_approval(&mut self, id: TxId, signer: Address) -> ApprovalResult<u32> {
        let i = self.index(id)?;
        let tx = &mut self.records[i];

        if tx.is_completed() {
            return Err(ApprovalError::AlreadyCompleted(id));
        }
        if tx.has_signed(&signer) {
            return Err(ApprovalError::DuplicateApproval { id, signer });
        }

        tx.approvals.push(Approval {
            signer,
            approved_at: Utc::now(),
        });
        Ok(tx.approval_count())
    }

    /// Undo the most recent approval by `signer`, if it is the last one
    /// recorded on an open transaction. Used when the completion effect
    /// fails after the approval was counted.
    pub fn revert_approval(&mut self, id: TxId, signer: &Address) -> ApprovalResult<()> {
        let i = self.index(id)?;
        let tx = &mut self.records[i];

        if tx.is_completed() {
            return Err(ApprovalError::AlreadyCompleted(id));
        }
        // The creator's approval is part of the record itself
        if tx.approvals.len() > 1 && tx.approvals.last().map(|a| &a.signer) == Some(signer) {
            tx.approvals.pop();
        }
        Ok(())
    }

    /// Set the completion flag. Fails if already set.
    pub fn mark_completed(&mut self, id: TxId) -> ApprovalResult<()> {
        let i = self.index(id)?;
        let tx = &mut self.records[i];

        if tx.is_completed() {
            return Err(ApprovalError::AlreadyCompleted(id));
        }
        tx.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Check if `signer` approved `id`; false for unknown ids
    pub fn has_signed(&self, signer: &Address, id: TxId) -> bool {
        self.get(id).map(|tx| tx.has_signed(signer)).unwrap_or(false)
    }

    /// Number of allocated transactions (also the highest id)
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in id order
    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.records.iter()
    }

    /// Records still awaiting approvals
    pub fn open(&self) -> impl Iterator<Item = &Transaction> {
        self.records.iter().filter(|tx| !tx.is_completed())
    }

    fn index(&self, id: TxId) -> ApprovalResult<usize> {
        if id == 0 || id > self.records.len() as TxId {
            return Err(ApprovalError::InvalidId(id));
        }
        Ok((id - 1) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::from_low_u8(n)
    }

    fn update(q: u32) -> TransactionKind {
        TransactionKind::QuorumUpdate { new_quorum: q }
    }

    #[test]
    fn test_sequential_ids() {
        let mut ledger = TransactionLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.allocate(update(2), addr(1)), 1);
        assert_eq!(ledger.allocate(update(3), addr(2)), 2);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.get(2).unwrap().creator, addr(2));
    }

    #[test]
    fn test_invalid_ids() {
        let mut ledger = TransactionLedger::new();
        assert_eq!(ledger.get(0).unwrap_err(), ApprovalError::InvalidId(0));
        assert_eq!(ledger.get(1).unwrap_err(), ApprovalError::InvalidId(1));

        ledger.allocate(update(2), addr(1));
        assert_eq!(
            ledger.record_approval(0, addr(2)).unwrap_err(),
            ApprovalError::InvalidId(0)
        );
        assert_eq!(
            ledger.record_approval(2, addr(2)).unwrap_err(),
            ApprovalError::InvalidId(2)
        );
    }

    #[test]
    fn test_record_approval() {
        let mut ledger = TransactionLedger::new();
        let id = ledger.allocate(update(2), addr(1));

        assert!(ledger.has_signed(&addr(1), id));
        assert!(!ledger.has_signed(&addr(2), id));
        assert_eq!(ledger.record_approval(id, addr(2)).unwrap(), 2);
        assert!(ledger.has_signed(&addr(2), id));
        assert!(!ledger.has_signed(&addr(2), 99));
    }

    #[test]
    fn test_duplicate_approval() {
        let mut ledger = TransactionLedger::new();
        let id = ledger.allocate(update(2), addr(1));

        let result = ledger.record_approval(id, addr(1));
        assert_eq!(
            result.unwrap_err(),
            ApprovalError::DuplicateApproval { id, signer: addr(1) }
        );
        assert_eq!(ledger.get(id).unwrap().approval_count(), 1);
    }

    #[test]
    fn test_completed_is_terminal() {
        let mut ledger = TransactionLedger::new();
        let id = ledger.allocate(update(2), addr(1));
        ledger.record_approval(id, addr(2)).unwrap();
        ledger.mark_completed(id).unwrap();

        assert_eq!(
            ledger.record_approval(id, addr(3)).unwrap_err(),
            ApprovalError::AlreadyCompleted(id)
        );
        // Completion check precedes the duplicate check
        assert_eq!(
            ledger.record_approval(id, addr(2)).unwrap_err(),
            ApprovalError::AlreadyCompleted(id)
        );
        assert_eq!(
            ledger.mark_completed(id).unwrap_err(),
            ApprovalError::AlreadyCompleted(id)
        );
        assert_eq!(ledger.open().count(), 0);
    }

    #[test]
    fn test_revert_approval() {
        let mut ledger = TransactionLedger::new();
        let id = ledger.allocate(update(2), addr(1));
        ledger.record_approval(id, addr(2)).unwrap();

        ledger.revert_approval(id, &addr(2)).unwrap();
        assert_eq!(ledger.get(id).unwrap().approval_count(), 1);
        assert!(!ledger.has_signed(&addr(2), id));

        // Creator's approval cannot be reverted
        ledger.revert_approval(id, &addr(1)).unwrap();
        assert!(ledger.has_signed(&addr(1), id));
    }
}
