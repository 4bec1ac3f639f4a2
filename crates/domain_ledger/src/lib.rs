//! Ledger Domain - Member Balance Bookkeeping
//!
//! This crate implements the welfare group's member financial ledger:
//! approval-time account initialization, due-first payment application,
//! recurring period charges, and the read-only health auditor.
//!
//! # Balance Model
//!
//! Each member carries one signed balance:
//! - negative = outstanding due
//! - positive = prepaid credit
//! - zero = settled
//!
//! Payments settle due before building credit, so the two buckets are never
//! simultaneously positive. Period charges subtract unconditionally and
//! advance the billing date on schedule regardless of solvency.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_ledger::{ApprovalEngine, apply_payment};
//!
//! let outcome = engine.approve(&account, sequence, &actor, now)?;
//! let payment = apply_payment(outcome.account.balance, amount)?;
//! ```

pub mod account;
pub mod approval;
pub mod audit;
pub mod billing;
pub mod contribution;
pub mod error;
pub mod payment;
pub mod simulate;

pub use account::{AccountStatus, Actor, MemberAccount, RegistrationStatus};
pub use approval::{
    ApprovalDecision, ApprovalEngine, ApprovalKind, ApprovalOutcome, ApprovalRecord,
    RejectionOutcome,
};
pub use audit::{AccountSnapshot, Anomaly, AnomalyReason, LedgerAuditor, Severity};
pub use billing::{BillingEngine, ChargeOutcome};
pub use contribution::{Contribution, ContributionCategory, TransactionMethod};
pub use error::LedgerError;
pub use payment::{apply_payment, apply_payment_to_account, PaymentOutcome};
pub use simulate::LedgerSimulation;
