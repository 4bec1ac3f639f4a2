//! Atomic member number sequence allocation
//!
//! The member sequence is a single-row counter table. Allocation runs on the
//! caller's transaction: the upsert takes a row lock, so concurrent approvals
//! serialize on it and each committed approval observes a distinct value. If
//! the enclosing transaction rolls back, the increment rolls back with it and
//! the number is never burned.

use sqlx::{Postgres, Transaction};

use crate::error::DatabaseError;

/// Allocates the next member sequence value on the given transaction
///
/// The first allocation ever seeds the counter at 1; every later call
/// increments and returns the new value. The returned integer feeds
/// `MemberNumber::from_sequence`.
pub async fn next_member_sequence(
    tx: &mut Transaction<'_, Postgres>,
) -> Result<i64, DatabaseError> {
    let sequence: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO member_sequence (id, current)
        VALUES (1, 1)
        ON CONFLICT (id)
        DO UPDATE SET current = member_sequence.current + 1
        RETURNING current
        "#,
    )
    .fetch_one(&mut **tx)
    .await?;

    Ok(sequence)
}
