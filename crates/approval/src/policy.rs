//! Quorum policy - current threshold and the pending update slot

use crate::error::{ApprovalError, ApprovalResult};
use multisig_core::TxId;

/// Current approval threshold plus at most one in-flight update.
///
/// The pending value outlives its commit: it stays readable until the
/// next update proposal overwrites it.
#[derive(Debug, Clone)]
pub struct QuorumPolicy {
    current: u32,
    pending: Option<u32>,
    in_flight: Option<TxId>,
}

impl QuorumPolicy {
    /// Callers validate `quorum` against the signer registry first.
    pub fn new(quorum: u32) -> Self {
        Self {
            current: quorum,
            pending: None,
            in_flight: None,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    /// Last proposed threshold, if any update was ever proposed
    pub fn pending(&self) -> Option<u32> {
        self.pending
    }

    /// Id of the open quorum update, if one exists
    pub fn in_flight(&self) -> Option<TxId> {
        self.in_flight
    }

    /// Store `value` as the pending threshold, bound to `tx_id`
    pub fn propose_pending(&mut self, value: u32, tx_id: TxId) -> ApprovalResult<()> {
        if let Some(open) = self.in_flight {
            return Err(ApprovalError::UpdateInFlight(open));
        }
        if value == 0 {
            return Err(ApprovalError::InvalidQuorum {
                quorum: value,
                signers: 0,
            });
        }

        self.pending = Some(value);
        self.in_flight = Some(tx_id);
        Ok(())
    }

    /// Make the pending threshold current. Returns the new quorum.
    ///
    /// `tx_id` must be the update the pending value was proposed with.
    pub fn commit_pending(&mut self, tx_id: TxId, signer_count: usize) -> ApprovalResult<u32> {
        let value = match (self.in_flight, self.pending) {
            (Some(open), Some(value)) if open == tx_id => value,
            _ => return Err(ApprovalError::InvalidId(tx_id)),
        };

        if value == 0 || value as usize > signer_count {
            return Err(ApprovalError::InvalidQuorum {
                quorum: value,
                signers: signer_count,
            });
        }

        self.current = value;
        self.in_flight = None;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_propose_and_commit() {
        let mut policy = QuorumPolicy::new(2);
        policy.propose_pending(3, 1).unwrap();

        assert_eq!(policy.current(), 2);
        assert_eq!(policy.pending(), Some(3));
        assert_eq!(policy.in_flight(), Some(1));

        assert_eq!(policy.commit_pending(1, 5).unwrap(), 3);
        assert_eq!(policy.current(), 3);
        // Pending value stays readable after commit
        assert_eq!(policy.pending(), Some(3));
        assert_eq!(policy.in_flight(), None);
    }

    #[test]
    fn test_single_in_flight_slot() {
        let mut policy = QuorumPolicy::new(2);
        policy.propose_pending(3, 1).unwrap();

        let result = policy.propose_pending(4, 2);
        assert_eq!(result.unwrap_err(), ApprovalError::UpdateInFlight(1));
        assert_eq!(policy.pending(), Some(3));

        policy.commit_pending(1, 5).unwrap();
        policy.propose_pending(4, 2).unwrap();
        assert_eq!(policy.pending(), Some(4));
    }

    #[test]
    fn test_zero_rejected() {
        let mut policy = QuorumPolicy::new(2);
        assert!(matches!(
            policy.propose_pending(0, 1),
            Err(ApprovalError::InvalidQuorum { quorum: 0, .. })
        ));
        assert_eq!(policy.pending(), None);
    }

    #[test]
    fn test_commit_checks_signer_count() {
        let mut policy = QuorumPolicy::new(2);
        policy.propose_pending(4, 1).unwrap();

        let result = policy.commit_pending(1, 3);
        assert_eq!(
            result.unwrap_err(),
            ApprovalError::InvalidQuorum { quorum: 4, signers: 3 }
        );
        assert_eq!(policy.current(), 2);
        assert_eq!(policy.in_flight(), Some(1));
    }

    #[test]
    fn test_commit_wrong_id() {
        let mut policy = QuorumPolicy::new(2);
        policy.propose_pending(3, 1).unwrap();
        assert_eq!(policy.commit_pending(7, 5).unwrap_err(), ApprovalError::InvalidId(7));
    }
}
