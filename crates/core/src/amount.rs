//! Amount - Integer token amount in the smallest unit
//!
//! Amounts are unsigned, so negative values are unrepresentable.
//! They serialize as decimal strings to survive JSON consumers that
//! only have 53-bit integers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// A token amount in the smallest unit (e.g. wei).
///
/// # Example
/// ```
/// use multisig_core::Amount;
///
/// let ten_tokens = Amount::from_units(10, 18);
/// assert_eq!(ten_tokens.value(), 10_000_000_000_000_000_000);
/// assert!(Amount::ZERO.is_zero());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(u128);

impl Amount {
    /// Zero amount constant
    pub const ZERO: Self = Self(0);

    /// Create an amount from a raw smallest-unit value
    #[inline]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// `whole * 10^decimals`, saturating on overflow
    pub fn from_units(whole: u128, decimals: u32) -> Self {
        let scale = 10u128.saturating_pow(decimals);
        Self(whole.saturating_mul(scale))
    }

    /// Get the inner value
    #[inline]
    pub const fn value(&self) -> u128 {
        self.0
    }

    /// Check if the amount is zero
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns None on overflow
    pub fn checked_add(&self, other: &Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Returns None if the result would be negative
    pub fn checked_sub(&self, other: &Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u128>().map(Amount)
    }
}

impl TryFrom<String> for Amount {
    type Error = ParseIntError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.to_string()
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}
