//! Human-facing member numbers
//!
//! A member number is the display form of the integer issued by the sequence
//! allocator, e.g. `TNS0001`. Formatting is a pure transformation: the
//! allocator hands out integers, and this type owns how they are rendered and
//! parsed. Numbers are assigned exactly once at approval and are immutable
//! thereafter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Prefix for all member numbers issued by the organization
pub const MEMBER_NUMBER_PREFIX: &str = "TNS";

/// Zero-padding width for the numeric part
const PAD_WIDTH: usize = 4;

/// Errors from parsing a member number string
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemberNumberError {
    #[error("Member number must start with '{MEMBER_NUMBER_PREFIX}': {0}")]
    BadPrefix(String),

    #[error("Member number has a non-numeric suffix: {0}")]
    BadSequence(String),

    #[error("Member number sequence must be positive: {0}")]
    NonPositive(i64),
}

/// A unique, monotonically assigned member identifier
///
/// Wraps the raw sequence integer. `Display` renders the canonical padded
/// form; sequences beyond four digits widen naturally (`TNS10000`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberNumber(i64);

impl MemberNumber {
    /// Wraps an allocated sequence value
    pub fn from_sequence(sequence: i64) -> Result<Self, MemberNumberError> {
        if sequence <= 0 {
            return Err(MemberNumberError::NonPositive(sequence));
        }
        Ok(Self(sequence))
    }

    /// Returns the raw sequence integer
    pub fn sequence(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MemberNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:0width$}", MEMBER_NUMBER_PREFIX, self.0, width = PAD_WIDTH)
    }
}

impl FromStr for MemberNumber {
    type Err = MemberNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(MEMBER_NUMBER_PREFIX)
            .ok_or_else(|| MemberNumberError::BadPrefix(s.to_string()))?;
        let sequence: i64 = digits
            .parse()
            .map_err(|_| MemberNumberError::BadSequence(s.to_string()))?;
        Self::from_sequence(sequence)
    }
}
