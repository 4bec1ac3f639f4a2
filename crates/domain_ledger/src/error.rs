//! Ledger domain errors

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur in the ledger domain
///
/// Every failure aborts the enclosing operation and is surfaced to the
/// caller; the engine never approximates a result. `ConcurrencyConflict` is
/// the one class that is safe to retry automatically a bounded number of
/// times.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Operation attempted from a state that does not permit it
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Non-positive payment or charge amount, rejected before any
    /// transaction is opened
    #[error("Invalid amount: {0} (must be positive)")]
    InvalidAmount(Decimal),

    /// Caller lacks the required administrative capability
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The underlying transaction could not serialize
    #[error("Concurrency conflict: {0}")]
    ConcurrencyConflict(String),

    /// A ledger invariant would be broken by the operation
    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),

    /// Member account not found
    #[error("Member not found: {0}")]
    MemberNotFound(String),
}

impl LedgerError {
    pub fn invalid_state(message: impl Into<String>) -> Self {
        LedgerError::InvalidState(message.into())
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        LedgerError::PermissionDenied(message.into())
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        LedgerError::IntegrityViolation(message.into())
    }

    /// Returns true if the operation may be retried automatically
    ///
    /// Only serialization conflicts qualify: re-running an approval on an
    /// account that committed meanwhile yields `InvalidState` rather than a
    /// double effect, and payment re-application is guarded by the external
    /// receipt dedup key.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::ConcurrencyConflict(_))
    }
}
