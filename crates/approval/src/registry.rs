//! Signer registry - fixed set of authorized addresses

use crate::error::{ApprovalError, ApprovalResult};
use multisig_core::Address;
use std::collections::HashSet;

/// Immutable set of signers, built once at construction.
///
/// The owner is always a member. Duplicates in the supplied list are
/// dropped, keeping first-seen order for `iter()`.
#[derive(Debug, Clone)]
pub struct SignerRegistry {
    members: HashSet<Address>,
    ordered: Vec<Address>,
}

impl SignerRegistry {
    /// Build a registry from the owner plus `signers`, and check that
    /// `quorum` is satisfiable by it.
    pub fn new(owner: Address, signers: &[Address], quorum: u32) -> ApprovalResult<Self> {
        if owner.is_zero() || signers.iter().any(Address::is_zero) {
            return Err(ApprovalError::ZeroAddress);
        }

        let mut members = HashSet::with_capacity(signers.len() + 1);
        let mut ordered = Vec::with_capacity(signers.len() + 1);
        for signer in std::iter::once(&owner).chain(signers) {
            if members.insert(*signer) {
                ordered.push(*signer);
            }
        }

        let registry = Self { members, ordered };
        registry.check_quorum(quorum)?;
        Ok(registry)
    }

    /// Check `1 <= quorum <= len()`
    pub fn check_quorum(&self, quorum: u32) -> ApprovalResult<()> {
        if quorum == 0 || quorum as usize > self.len() {
            return Err(ApprovalError::InvalidQuorum {
                quorum,
                signers: self.len(),
            });
        }
        Ok(())
    }

    pub fn is_valid_signer(&self, addr: &Address) -> bool {
        self.members.contains(addr)
    }

    /// Number of distinct signers (never zero)
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Owner first, then signers in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.ordered.iter()
    }
}
