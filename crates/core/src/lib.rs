//! Multisig Core - Domain types
//!
//! This crate contains the fundamental types shared by the multisig crates:
//! - `Address`: 20-byte account identity (signers, recipients, tokens)
//! - `Amount`: Integer amount in the smallest unit of a token

pub mod address;
pub mod amount;

pub use address::{Address, AddressError};
pub use amount::Amount;

/// Sequential transaction identifier. The first valid id is 1; 0 is never valid.
pub type TxId = u64;
