//! # Multisig Approval Engine
//!
//! Quorum-based authorization for critical operations.
//!
//! ## Scope
//! - Token transfers out of the engine's holdings
//! - Changes to the approval threshold itself
//!
//! ## Features
//! - Fixed signer set, built once at construction
//! - Proposer's approval is recorded with the proposal
//! - Completion fires the external effect exactly once
//! - Failed effects roll the approval back

mod config;
mod engine;
mod error;
mod event;
mod ledger;
mod policy;
mod registry;
mod transaction;
mod vault;

pub use config::{ConfigError, MultisigConfig};
pub use engine::{ApprovalEngine, ApprovalOutcome, ApprovalStats};
pub use error::{ApprovalError, ApprovalResult};
pub use event::{EventSink, MemorySink, MultisigEvent, NullSink};
pub use ledger::TransactionLedger;
pub use policy::QuorumPolicy;
pub use registry::SignerRegistry;
pub use transaction::{Approval, Transaction, TransactionKind, TxKind};
pub use vault::{TokenVault, TransferError, ValueTransfer};
