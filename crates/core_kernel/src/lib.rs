//! Core Kernel - Foundational types for the welfare ledger
//!
//! This crate provides the fundamental building blocks used across all domain
//! modules:
//! - Money with precise decimal arithmetic (no floating point anywhere)
//! - Billing-period temporal helpers
//! - Member numbers and strongly-typed identifiers

pub mod error;
pub mod identifiers;
pub mod member_number;
pub mod money;
pub mod temporal;

pub use error::CoreError;
pub use identifiers::{ApprovalId, ContributionId, MemberId, ReceiptId, UserId};
pub use member_number::{MemberNumber, MemberNumberError, MEMBER_NUMBER_PREFIX};
pub use money::{Money, MoneyError};
pub use temporal::{BillingPeriod, TemporalError, Timezone};
