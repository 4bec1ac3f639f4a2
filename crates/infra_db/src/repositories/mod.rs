//! Repository implementations for the member ledger
//!
//! Repositories encapsulate SQL and map between database rows and domain
//! types. Every ledger mutation is one transaction: a row lock, a domain
//! engine call, the writes, a commit.

pub mod members;

pub use members::{
    BillingRunSummary, ExternalPaymentResult, MemberRepository, NewRegistration, PaymentRecorded,
};
