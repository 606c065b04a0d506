//! Approval engine errors

use crate::transaction::TxKind;
use crate::vault::TransferError;
use multisig_core::{Address, TxId};
use thiserror::Error;

/// Errors from the approval workflow
///
/// Every variant aborts the whole operation; no ledger record, approval
/// or quorum state is changed by a failed call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApprovalError {
    #[error("Not a valid signer: {0}")]
    NotASigner(Address),

    #[error("Zero address found")]
    ZeroAddress,

    #[error("Cannot send zero amount")]
    ZeroAmount,

    #[error("Invalid transaction id: {0}")]
    InvalidId(TxId),

    #[error("Transaction {0} already completed")]
    AlreadyCompleted(TxId),

    #[error("Signer {signer} already approved transaction {id}")]
    DuplicateApproval { id: TxId, signer: Address },

    #[error("External transfer failed: {0}")]
    ExternalEffectFailed(#[from] TransferError),

    #[error("Invalid quorum {quorum} for {signers} signers")]
    InvalidQuorum { quorum: u32, signers: usize },

    #[error("Quorum update {0} is still awaiting approvals")]
    UpdateInFlight(TxId),

    #[error("Transaction {id} is not a {expected} transaction")]
    KindMismatch { id: TxId, expected: TxKind },
}

/// Result type for approval operations
pub type ApprovalResult<T> = Result<T, ApprovalError>;

impl ApprovalError {
    /// Short machine-readable code for logs and CLI output
    pub fn code(&self) -> &'static str {
        match self {
            ApprovalError::NotASigner(_) => "NOT_A_SIGNER",
            ApprovalError::ZeroAddress => "ZERO_ADDRESS",
            ApprovalError::ZeroAmount => "ZERO_AMOUNT",
            ApprovalError::InvalidId(_) => "INVALID_ID",
            ApprovalError::AlreadyCompleted(_) => "ALREADY_COMPLETED",
            ApprovalError::DuplicateApproval { .. } => "DUPLICATE_APPROVAL",
            ApprovalError::ExternalEffectFailed(_) => "EXTERNAL_EFFECT_FAILED",
            ApprovalError::InvalidQuorum { .. } => "INVALID_QUORUM",
            ApprovalError::UpdateInFlight(_) => "UPDATE_IN_FLIGHT",
            ApprovalError::KindMismatch { .. } => "KIND_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multisig_core::Amount;

    #[test]
    fn test_error_messages() {
        let err = ApprovalError::DuplicateApproval {
            id: 4,
            signer: Address::from_low_u8(9),
        };
        assert!(err.to_string().contains("already approved transaction 4"));
        assert_eq!(err.code(), "DUPLICATE_APPROVAL");

        let err = ApprovalError::KindMismatch {
            id: 2,
            expected: TxKind::QuorumUpdate,
        };
        assert_eq!(err.to_string(), "Transaction 2 is not a QUORUM_UPDATE transaction");
    }

    #[test]
    fn test_transfer_error_converts() {
        let err: ApprovalError = TransferError::InsufficientBalance {
            token: Address::from_low_u8(1),
            available: Amount::new(5),
            requested: Amount::new(10),
        }
        .into();
        assert_eq!(err.code(), "EXTERNAL_EFFECT_FAILED");
    }
}
