//! Infrastructure Database Layer
//!
//! This crate persists the member ledger on PostgreSQL using SQLx. The
//! database transaction is the only concurrency primitive the ledger uses:
//! sequence allocation, approval effects, payment application, and period
//! charges each run as one transaction, so partial effects never commit.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool_from_url, MemberRepository};
//!
//! let pool = create_pool_from_url("postgres://localhost/welfare_ledger").await?;
//! let members = MemberRepository::new(pool);
//! ```

pub mod error;
pub mod pool;
pub mod repositories;
pub mod retry;
pub mod sequence;

pub use error::{DatabaseError, RepositoryError};
pub use pool::{create_pool, create_pool_from_url, DatabaseConfig, DatabasePool};
pub use repositories::{
    BillingRunSummary, ExternalPaymentResult, MemberRepository, NewRegistration, PaymentRecorded,
};
pub use retry::{with_retry, RetryPolicy};
pub use sequence::next_member_sequence;
