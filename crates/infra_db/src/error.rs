//! Database error types
//!
//! This module defines the error types that can occur during database
//! operations and maps PostgreSQL error codes into the ledger's error
//! taxonomy, in particular serialization failures (the one retryable class)
//! and unique-constraint violations (integrity, always fatal).

use thiserror::Error;

use domain_ledger::LedgerError;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Entity not found in database
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// The transaction could not serialize (deadlock or serialization
    /// failure); safe to retry a bounded number of times
    #[error("Serialization failure: {0}")]
    SerializationFailure(String),

    /// Transaction error
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Decoding a row value into its Rust type failed
    #[error("Row decoding error: {0}")]
    RowDecode(String),

    /// Pool exhaustion - no available connections
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl DatabaseError {
    /// Creates a not found error for a specific entity type and identifier
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound(format!("{} with id '{}' not found", entity, id))
    }

    /// Checks if this error indicates a record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }

    /// Checks if this error is safe to retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, DatabaseError::SerializationFailure(_))
    }

    /// Checks if this error is a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::DuplicateEntry(_)
                | DatabaseError::ForeignKeyViolation(_)
                | DatabaseError::ConstraintViolation(_)
        )
    }
}

/// Maps SQLx errors to specific DatabaseError variants based on the
/// PostgreSQL error code.
///
/// <https://www.postgresql.org/docs/current/errcodes-appendix.html>
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                DatabaseError::RowDecode(error.to_string())
            }
            sqlx::Error::Database(db_err) => {
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        "23505" => DatabaseError::DuplicateEntry(db_err.message().to_string()),
                        "23503" => {
                            DatabaseError::ForeignKeyViolation(db_err.message().to_string())
                        }
                        "23514" => {
                            DatabaseError::ConstraintViolation(db_err.message().to_string())
                        }
                        // 40001 serialization_failure, 40P01 deadlock_detected
                        "40001" | "40P01" => {
                            DatabaseError::SerializationFailure(db_err.message().to_string())
                        }
                        _ => DatabaseError::QueryFailed(db_err.message().to_string()),
                    }
                } else {
                    DatabaseError::QueryFailed(db_err.message().to_string())
                }
            }
            _ => DatabaseError::QueryFailed(error.to_string()),
        }
    }
}

/// Error type returned by ledger repositories
///
/// Repository operations fail either because the database misbehaved or
/// because a domain rule refused the operation; both are surfaced unchanged.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl RepositoryError {
    /// Returns true if the whole operation may be retried
    pub fn is_retryable(&self) -> bool {
        match self {
            RepositoryError::Database(e) => e.is_retryable(),
            RepositoryError::Ledger(e) => e.is_retryable(),
        }
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(error: sqlx::Error) -> Self {
        RepositoryError::Database(DatabaseError::from(error))
    }
}

/// Lifts storage-level failures into the domain taxonomy
///
/// Used at the API boundary so callers see the ledger's error classes: a
/// serialization failure becomes a concurrency conflict, a duplicate key an
/// integrity violation.
impl From<RepositoryError> for LedgerError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Ledger(e) => e,
            RepositoryError::Database(e) => match e {
                DatabaseError::SerializationFailure(msg) => LedgerError::ConcurrencyConflict(msg),
                DatabaseError::DuplicateEntry(msg)
                | DatabaseError::ConstraintViolation(msg)
                | DatabaseError::ForeignKeyViolation(msg) => LedgerError::IntegrityViolation(msg),
                DatabaseError::NotFound(msg) => LedgerError::MemberNotFound(msg),
                other => LedgerError::IntegrityViolation(other.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_helper() {
        let error = DatabaseError::not_found("Member", "MBR-123");
        assert!(error.is_not_found());
        assert!(error.to_string().contains("Member"));
    }

    #[test]
    fn test_only_serialization_failures_are_retryable() {
        assert!(DatabaseError::SerializationFailure("deadlock".into()).is_retryable());
        assert!(!DatabaseError::DuplicateEntry("member_number".into()).is_retryable());
        assert!(!DatabaseError::PoolExhausted.is_retryable());
    }

    #[test]
    fn test_constraint_violations_are_grouped() {
        assert!(DatabaseError::DuplicateEntry("dup".into()).is_constraint_violation());
        assert!(DatabaseError::ForeignKeyViolation("fk".into()).is_constraint_violation());
        assert!(!DatabaseError::PoolExhausted.is_constraint_violation());
    }

    #[test]
    fn test_repository_error_lifts_into_domain_taxonomy() {
        let conflict: LedgerError =
            RepositoryError::Database(DatabaseError::SerializationFailure("40001".into())).into();
        assert!(matches!(conflict, LedgerError::ConcurrencyConflict(_)));
        assert!(conflict.is_retryable());

        let dup: LedgerError =
            RepositoryError::Database(DatabaseError::DuplicateEntry("member_number".into()))
                .into();
        assert!(matches!(dup, LedgerError::IntegrityViolation(_)));

        let missing: LedgerError =
            RepositoryError::Database(DatabaseError::not_found("Member", "MBR-1")).into();
        assert!(matches!(missing, LedgerError::MemberNotFound(_)));
    }
}
