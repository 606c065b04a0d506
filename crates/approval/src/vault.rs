//! Value transfer capability and an in-memory token vault

use multisig_core::{Address, Amount};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Errors from the value-transfer capability
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Insufficient balance of {token}: available {available}, requested {requested}")]
    InsufficientBalance {
        token: Address,
        available: Amount,
        requested: Amount,
    },

    #[error("Balance overflow for {holder} in {token}")]
    Overflow { token: Address, holder: Address },

    #[error("Transfer rejected: {0}")]
    Rejected(String),
}

/// Moves value out of the engine's holdings.
///
/// Invoked once, by the approval that completes a transfer. An error
/// fails that approval and nothing is retried.
pub trait ValueTransfer: Send + Sync {
    fn send(
        &self,
        token: &Address,
        recipient: &Address,
        amount: Amount,
    ) -> Result<(), TransferError>;
}

#[derive(Default)]
struct VaultState {
    /// Engine holdings per token
    holdings: HashMap<Address, Amount>,
    /// Balances credited to recipients, keyed by (token, holder)
    balances: HashMap<(Address, Address), Amount>,
}

/// In-memory token holdings of the engine.
///
/// `send` debits the engine's holdings and credits the recipient in one
/// critical section.
#[derive(Default)]
pub struct TokenVault {
    state: Mutex<VaultState>,
}

impl TokenVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit the engine's holdings of `token`
    pub fn deposit(&self, token: Address, amount: Amount) -> Result<Amount, TransferError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let held = state.holdings.entry(token).or_default();
        *held = held.checked_add(&amount).ok_or(TransferError::Overflow {
            token,
            holder: Address::ZERO,
        })?;

        tracing::debug!(token = %token, amount = %amount, held = %held, "Vault deposit");
        Ok(*held)
    }

    /// Engine holdings of `token`
    pub fn holdings(&self, token: &Address) -> Amount {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.holdings.get(token).copied().unwrap_or_default()
    }

    /// Amount of `token` credited to `holder` by completed transfers
    pub fn balance_of(&self, token: &Address, holder: &Address) -> Amount {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state
            .balances
            .get(&(*token, *holder))
            .copied()
            .unwrap_or_default()
    }
}

impl ValueTransfer for TokenVault {
    fn send(
        &self,
        token: &Address,
        recipient: &Address,
        amount: Amount,
    ) -> Result<(), TransferError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let available = state.holdings.get(token).copied().unwrap_or_default();
        let remaining = available
            .checked_sub(&amount)
            .ok_or(TransferError::InsufficientBalance {
                token: *token,
                available,
                requested: amount,
            })?;

        let credited = state
            .balances
            .get(&(*token, *recipient))
            .copied()
            .unwrap_or_default()
            .checked_add(&amount)
            .ok_or(TransferError::Overflow {
                token: *token,
                holder: *recipient,
            })?;

        state.holdings.insert(*token, remaining);
        state.balances.insert((*token, *recipient), credited);

        tracing::info!(
            token = %token,
            recipient = %recipient,
            amount = %amount,
            "Vault transfer executed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: Address = Address::from_low_u8(0xEE);
    const ALICE: Address = Address::from_low_u8(0xA1);

    #[test]
    fn test_deposit_and_send() {
        let vault = TokenVault::new();
        vault.deposit(TOKEN, Amount::new(1000)).unwrap();
        assert_eq!(vault.deposit(TOKEN, Amount::new(500)).unwrap(), Amount::new(1500));

        vault.send(&TOKEN, &ALICE, Amount::new(10)).unwrap();
        assert_eq!(vault.holdings(&TOKEN), Amount::new(1490));
        assert_eq!(vault.balance_of(&TOKEN, &ALICE), Amount::new(10));
    }

    #[test]
    fn test_insufficient_balance() {
        let vault = TokenVault::new();
        vault.deposit(TOKEN, Amount::new(5)).unwrap();

        let result = vault.send(&TOKEN, &ALICE, Amount::new(10));
        assert_eq!(
            result.unwrap_err(),
            TransferError::InsufficientBalance {
                token: TOKEN,
                available: Amount::new(5),
                requested: Amount::new(10),
            }
        );
        assert_eq!(vault.holdings(&TOKEN), Amount::new(5));
        assert_eq!(vault.balance_of(&TOKEN, &ALICE), Amount::ZERO);
    }

    #[test]
    fn test_unknown_token_is_empty() {
        let vault = TokenVault::new();
        assert_eq!(vault.holdings(&TOKEN), Amount::ZERO);
        assert!(vault.send(&TOKEN, &ALICE, Amount::new(1)).is_err());
    }
}
