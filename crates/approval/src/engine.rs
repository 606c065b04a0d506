//! Approval engine - proposal, approval and completion
//!
//! ```text
//! propose_*  ──► Open (creator approved, count = 1)
//!                  │
//!   approve_* ─────┤ count < quorum: stays Open
//!                  │
//!                  ▼ count >= quorum
//!             external effect ──fail──► approval reverted, still Open
//!                  │ ok
//!                  ▼
//!              Completed (terminal)
//! ```

use crate::config::MultisigConfig;
use crate::error::{ApprovalError, ApprovalResult};
use crate::event::{EventSink, MultisigEvent};
use crate::ledger::TransactionLedger;
use crate::policy::QuorumPolicy;
use crate::registry::SignerRegistry;
use crate::transaction::{Transaction, TransactionKind, TxKind};
use crate::vault::ValueTransfer;
use multisig_core::{Address, Amount, TxId};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Result of a successful approval call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalOutcome {
    pub id: TxId,
    /// Approval count after this approval
    pub approvals: u32,
    /// Quorum the count was compared against
    pub quorum: u32,
    /// Whether this approval completed the transaction
    pub completed: bool,
}

/// Statistics about ledger records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApprovalStats {
    pub open_transfers: usize,
    pub completed_transfers: usize,
    pub open_quorum_updates: usize,
    pub completed_quorum_updates: usize,
}

/// Mutable engine state, guarded by a single lock
struct EngineState {
    ledger: TransactionLedger,
    policy: QuorumPolicy,
}

/// Quorum-gated authorization engine.
///
/// All mutations run under one lock, including the external transfer
/// made by a completing approval, so two approvals can never both
/// observe the pre-completion count.
pub struct ApprovalEngine {
    registry: SignerRegistry,
    state: Mutex<EngineState>,
    transfers: Arc<dyn ValueTransfer>,
    sink: Arc<dyn EventSink>,
}

impl ApprovalEngine {
    /// Create an engine. Fails if `quorum` is 0 or exceeds the number of
    /// distinct signers (owner included).
    pub fn new(
        owner: Address,
        signers: &[Address],
        quorum: u32,
        transfers: Arc<dyn ValueTransfer>,
        sink: Arc<dyn EventSink>,
    ) -> ApprovalResult<Self> {
        let registry = SignerRegistry::new(owner, signers, quorum)?;

        tracing::info!(
            owner = %owner,
            signers = registry.len(),
            quorum,
            "Approval engine created"
        );

        Ok(Self {
            registry,
            state: Mutex::new(EngineState {
                ledger: TransactionLedger::new(),
                policy: QuorumPolicy::new(quorum),
            }),
            transfers,
            sink,
        })
    }

    /// Create an engine from deployment parameters
    pub fn from_config(
        config: &MultisigConfig,
        transfers: Arc<dyn ValueTransfer>,
        sink: Arc<dyn EventSink>,
    ) -> ApprovalResult<Self> {
        Self::new(config.owner, &config.signers, config.quorum, transfers, sink)
    }

    // === Proposals ===

    /// Propose sending `amount` of `token` to `recipient`.
    ///
    /// The caller's approval is recorded with the proposal. The transfer
    /// itself only happens on the approval path, even when quorum is 1.
    pub fn propose_transfer(
        &self,
        caller: &Address,
        amount: Amount,
        recipient: Address,
        token: Address,
    ) -> ApprovalResult<TxId> {
        self.ensure_signer(caller)?;
        if recipient.is_zero() || token.is_zero() {
            return Err(ApprovalError::ZeroAddress);
        }
        if amount.is_zero() {
            return Err(ApprovalError::ZeroAmount);
        }

        let mut state = self.lock();
        let kind = TransactionKind::Transfer {
            amount,
            recipient,
            token,
        };
        let id = state.ledger.allocate(kind, *caller);
        let timestamp = state.ledger.get(id)?.created_at;

        tracing::info!(
            id,
            proposer = %caller,
            recipient = %recipient,
            token = %token,
            amount = %amount,
            "Transfer proposed"
        );
        self.sink.emit(MultisigEvent::TransferInitiated { id, timestamp });

        Ok(id)
    }

    /// Propose replacing the quorum with `new_quorum`.
    ///
    /// Only one update can be open at a time.
    pub fn propose_quorum_update(
        &self,
        caller: &Address,
        new_quorum: u32,
    ) -> ApprovalResult<TxId> {
        self.ensure_signer(caller)?;
        self.registry.check_quorum(new_quorum)?;

        let mut state = self.lock();
        let EngineState { ledger, policy } = &mut *state;

        let id = ledger.len() as TxId + 1;
        policy.propose_pending(new_quorum, id)?;
        let allocated = ledger.allocate(TransactionKind::QuorumUpdate { new_quorum }, *caller);
        debug_assert_eq!(allocated, id);

        tracing::info!(id, proposer = %caller, new_quorum, "Quorum update proposed");
        self.sink.emit(MultisigEvent::QuorumUpdateInitiated { id });

        Ok(id)
    }

    // === Approvals ===

    /// Approve a transfer; the approval reaching quorum executes it
    pub fn approve_transfer(
        &self,
        caller: &Address,
        id: TxId,
    ) -> ApprovalResult<ApprovalOutcome> {
        self.approve(caller, id, TxKind::Transfer)
    }

    /// Approve a quorum update; the approval reaching quorum commits it
    pub fn approve_quorum_update(
        &self,
        caller: &Address,
        id: TxId,
    ) -> ApprovalResult<ApprovalOutcome> {
        self.approve(caller, id, TxKind::QuorumUpdate)
    }

    fn approve(
        &self,
        caller: &Address,
        id: TxId,
        expected: TxKind,
    ) -> ApprovalResult<ApprovalOutcome> {
        self.ensure_signer(caller)?;

        let mut state = self.lock();
        let EngineState { ledger, policy } = &mut *state;

        let record = ledger.get(id)?;
        if record.is_completed() {
            return Err(ApprovalError::AlreadyCompleted(id));
        }
        let kind = record.kind.clone();
        if kind.tag() != expected {
            return Err(ApprovalError::KindMismatch { id, expected });
        }

        let approvals = ledger.record_approval(id, *caller).map_err(|e| {
            tracing::warn!(id, signer = %caller, error = %e, "Approval rejected");
            e
        })?;
        let quorum = policy.current();

        if approvals < quorum {
            tracing::debug!(id, signer = %caller, approvals, quorum, "Approval recorded");
            return Ok(ApprovalOutcome {
                id,
                approvals,
                quorum,
                completed: false,
            });
        }

        // Quorum reached: run the effect, then commit or revert
        let effect = match kind {
            TransactionKind::Transfer {
                amount,
                recipient,
                token,
            } => self
                .transfers
                .send(&token, &recipient, amount)
                .map(|()| MultisigEvent::ApprovalSuccessful {
                    id,
                    approver: *caller,
                })
                .map_err(ApprovalError::from),
            TransactionKind::QuorumUpdate { .. } => policy
                .commit_pending(id, self.registry.len())
                .map(|new_quorum| MultisigEvent::QuorumUpdateSuccessful { id, new_quorum }),
        };

        let event = match effect {
            Ok(event) => event,
            Err(e) => {
                ledger.revert_approval(id, caller)?;
                tracing::error!(
                    id,
                    signer = %caller,
                    error = %e,
                    "Completion failed, approval reverted"
                );
                return Err(e);
            }
        };

        ledger.mark_completed(id)?;
        tracing::info!(
            id,
            signer = %caller,
            approvals,
            quorum,
            event = event.name(),
            "Transaction completed"
        );
        self.sink.emit(event);

        Ok(ApprovalOutcome {
            id,
            approvals,
            quorum,
            completed: true,
        })
    }

    // === Queries ===

    pub fn quorum(&self) -> u32 {
        self.lock().policy.current()
    }

    /// Last proposed quorum; still readable after the update completes
    pub fn pending_quorum(&self) -> Option<u32> {
        self.lock().policy.pending()
    }

    /// Number of distinct signers
    pub fn signer_count(&self) -> usize {
        self.registry.len()
    }

    pub fn is_valid_signer(&self, addr: &Address) -> bool {
        self.registry.is_valid_signer(addr)
    }

    /// Owner first, then the other signers
    pub fn signers(&self) -> Vec<Address> {
        self.registry.iter().copied().collect()
    }

    /// Number of transactions ever proposed (also the highest id)
    pub fn tx_count(&self) -> usize {
        self.lock().ledger.len()
    }

    /// Snapshot of a transaction record
    pub fn get_tx(&self, id: TxId) -> ApprovalResult<Transaction> {
        self.lock().ledger.get(id).cloned()
    }

    pub fn has_signed(&self, signer: &Address, id: TxId) -> bool {
        self.lock().ledger.has_signed(signer, id)
    }

    /// Snapshot of all transactions still awaiting approvals
    pub fn open_transactions(&self) -> Vec<Transaction> {
        self.lock().ledger.open().cloned().collect()
    }

    /// Get statistics about transactions
    pub fn stats(&self) -> ApprovalStats {
        let state = self.lock();
        let mut stats = ApprovalStats::default();
        for tx in state.ledger.iter() {
            let slot = match (tx.kind.tag(), tx.is_completed()) {
                (TxKind::Transfer, false) => &mut stats.open_transfers,
                (TxKind::Transfer, true) => &mut stats.completed_transfers,
                (TxKind::QuorumUpdate, false) => &mut stats.open_quorum_updates,
                (TxKind::QuorumUpdate, true) => &mut stats.completed_quorum_updates,
            };
            *slot += 1;
        }
        stats
    }

    fn ensure_signer(&self, caller: &Address) -> ApprovalResult<()> {
        if !self.registry.is_valid_signer(caller) {
            tracing::warn!(caller = %caller, "Rejected call from non-signer");
            return Err(ApprovalError::NotASigner(*caller));
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
