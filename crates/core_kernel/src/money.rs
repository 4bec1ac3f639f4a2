//! Money type with precise decimal arithmetic
//!
//! All monetary values in the ledger pass through this type. Amounts are
//! stored as rust_decimal values rounded to two decimal places, so balance
//! comparisons against configured thresholds are exact. The ledger is
//! single-currency (Kenyan Shilling); there is no currency axis.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use thiserror::Error;

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Amount must be positive, got {0}")]
    NonPositive(Decimal),
}

/// A monetary amount in the organization's currency
///
/// A `Money` value may be signed: member balances use the negative range for
/// outstanding due and the positive range for prepaid credit. Use [`Money::due`]
/// and [`Money::credit`] to project the two buckets out of a signed balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Creates a new Money value, rounded to two decimal places
    pub fn new(amount: Decimal) -> Self {
        Self(amount.round_dp(2))
    }

    /// Creates Money from an integer amount in minor units (cents)
    pub fn from_minor(minor_units: i64) -> Self {
        Self::new(Decimal::new(minor_units, 2))
    }

    /// Creates a zero amount
    pub fn zero() -> Self {
        Self(dec!(0))
    }

    /// Creates a Money value that must be strictly positive
    ///
    /// Used for configured charge amounts and incoming payments, which are
    /// rejected before any transaction is opened if they are not positive.
    pub fn positive(amount: Decimal) -> Result<Self, MoneyError> {
        if amount <= dec!(0) {
            return Err(MoneyError::NonPositive(amount));
        }
        Ok(Self::new(amount))
    }

    /// Returns the underlying decimal amount
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Returns true if the amount is strictly negative
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Returns the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Returns the smaller of two amounts
    pub fn min(self, other: Self) -> Self {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }

    /// Amount currently owed: the negative portion of a signed balance
    ///
    /// `Money::new(dec!(-30)).due()` is 30; a non-negative balance has zero due.
    pub fn due(&self) -> Self {
        if self.is_negative() {
            self.abs()
        } else {
            Self::zero()
        }
    }

    /// Prepaid credit: the positive portion of a signed balance
    pub fn credit(&self) -> Self {
        if self.is_positive() {
            *self
        } else {
            Self::zero()
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KES {:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}
