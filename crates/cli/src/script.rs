//! Interaction scripts - a JSON list of engine calls

use multisig_approval::{ApprovalOutcome, Transaction, TransactionKind};
use multisig_core::{Address, Amount, TxId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// One engine call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Propose a transfer
    Transfer {
        caller: Address,
        amount: Amount,
        recipient: Address,
        token: Address,
    },

    /// Approve a transfer
    Approve { caller: Address, id: TxId },

    /// Propose a quorum update
    UpdateQuorum { caller: Address, quorum: u32 },

    /// Approve a quorum update
    ApproveQuorum { caller: Address, id: TxId },

    /// Print a transaction record
    Show { id: TxId },
}

impl Step {
    /// Load a script (JSON array of steps) from file
    pub fn load_all(path: &Path) -> anyhow::Result<Vec<Step>> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Transfer {
                caller,
                amount,
                recipient,
                token,
            } => write!(f, "{caller} proposes {amount} of {token} to {recipient}"),
            Step::Approve { caller, id } => write!(f, "{caller} approves transfer #{id}"),
            Step::UpdateQuorum { caller, quorum } => {
                write!(f, "{caller} proposes quorum {quorum}")
            }
            Step::ApproveQuorum { caller, id } => {
                write!(f, "{caller} approves quorum update #{id}")
            }
            Step::Show { id } => write!(f, "show #{id}"),
        }
    }
}

/// What a successful step produced
#[derive(Debug, Clone)]
pub enum StepOutput {
    Proposed(TxId),
    Approved(ApprovalOutcome),
    Record(Box<Transaction>),
}

impl fmt::Display for StepOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutput::Proposed(id) => write!(f, "proposed #{id}"),
            StepOutput::Approved(outcome) if outcome.completed => write!(
                f,
                "#{} completed with {}/{} approvals",
                outcome.id, outcome.approvals, outcome.quorum
            ),
            StepOutput::Approved(outcome) => write!(
                f,
                "#{} approved ({}/{})",
                outcome.id, outcome.approvals, outcome.quorum
            ),
            StepOutput::Record(tx) => {
                let action = match &tx.kind {
                    TransactionKind::Transfer {
                        amount,
                        recipient,
                        token,
                    } => format!("transfer {amount} of {token} to {recipient}"),
                    TransactionKind::QuorumUpdate { new_quorum } => {
                        format!("quorum update to {new_quorum}")
                    }
                };
                let status = if tx.is_completed() { "completed" } else { "open" };
                write!(
                    f,
                    "#{} {} [{}] approvals={} digest={}",
                    tx.id,
                    action,
                    status,
                    tx.approval_count(),
                    tx.digest()
                )
            }
        }
    }
}
