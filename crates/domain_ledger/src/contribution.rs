//! Contribution facts
//!
//! Contributions are append-only: once recorded they are never mutated. They
//! are the audit trail the health auditor and reporting tools read from. The
//! payment engine inserts the fact in the same unit of work that moves the
//! balance, so the ledger total and the trail never diverge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ContributionId, MemberId, Money, UserId};

/// What a contribution was for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionCategory {
    /// Recurring monthly contribution
    Monthly,
    /// Case-specific welfare collection
    Case,
    /// Project fundraising
    Project,
    /// One-time registration fee
    Registration,
    /// Anything else
    Other,
}

impl ContributionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContributionCategory::Monthly => "monthly",
            ContributionCategory::Case => "case",
            ContributionCategory::Project => "project",
            ContributionCategory::Registration => "registration",
            ContributionCategory::Other => "other",
        }
    }
}

/// How the money arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionMethod {
    /// Mobile-money STK push confirmation
    MobileMoney,
    /// Cash handed to a staff member
    Cash,
    /// Bank transfer
    BankTransfer,
}

/// An immutable contribution record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contribution {
    pub id: ContributionId,
    pub member_id: MemberId,
    pub amount: Money,
    pub category: ContributionCategory,
    pub method: TransactionMethod,
    /// External payment receipt (e.g. mobile-money reference); the dedup key
    /// for at-least-once confirmations
    pub external_receipt: Option<String>,
    /// Free-form reference for manual entries
    pub reference: Option<String>,
    /// The staff or system actor who recorded it
    pub recorded_by: UserId,
    pub recorded_at: DateTime<Utc>,
}

impl Contribution {
    /// Creates a new contribution fact
    pub fn new(
        member_id: MemberId,
        amount: Money,
        category: ContributionCategory,
        method: TransactionMethod,
        recorded_by: UserId,
    ) -> Self {
        Self {
            id: ContributionId::new_v7(),
            member_id,
            amount,
            category,
            method,
            external_receipt: None,
            reference: None,
            recorded_by,
            recorded_at: Utc::now(),
        }
    }

    /// Attaches the external receipt identifier
    pub fn with_receipt(mut self, receipt: impl Into<String>) -> Self {
        self.external_receipt = Some(receipt.into());
        self
    }

    /// Attaches a manual reference number
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}
