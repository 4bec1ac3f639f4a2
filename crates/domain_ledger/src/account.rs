//! Member account records
//!
//! The member account is the unit of ledger bookkeeping. Its balance is a
//! single signed value: negative is outstanding due, positive is prepaid
//! credit, zero is settled. The two buckets are projections of the one field
//! and can never be simultaneously positive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{MemberId, MemberNumber, Money, UserId};

use crate::error::LedgerError;

/// Registration lifecycle states
///
/// `pending --approve--> approved` and `pending --reject--> rejected`; both
/// transitions are terminal. A rejected registration that is resubmitted
/// becomes a brand-new pending record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Pending,
    Approved,
    Rejected,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Approved => "approved",
            RegistrationStatus::Rejected => "rejected",
        }
    }
}

/// Status of the linked user record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Inactive,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
        }
    }
}

/// A member's ledger account
///
/// Created in `pending` state by registration intake. The approval workflow
/// is the sole writer that assigns the member number and initializes balance
/// and billing date; afterwards only the payment and billing engines mutate
/// `balance`/`billing_date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberAccount {
    /// Unique identifier, owned by the persistence layer
    pub id: MemberId,
    /// Linked user record
    pub user_id: UserId,
    /// Human-facing identifier, assigned exactly once at approval
    pub member_number: Option<MemberNumber>,
    /// Registration lifecycle state
    pub registration_status: RegistrationStatus,
    /// Signed balance: negative = due, positive = prepaid credit
    pub balance: Money,
    /// Next scheduled charge; present only while approved
    pub billing_date: Option<DateTime<Utc>>,
    /// Linked user status; active only after approval
    pub account_status: AccountStatus,
    /// When the registration was created
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl MemberAccount {
    /// Creates a fresh pending registration, the state registration intake
    /// hands to the approval workflow
    pub fn pending(id: MemberId, user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            member_number: None,
            registration_status: RegistrationStatus::Pending,
            balance: Money::zero(),
            billing_date: None,
            account_status: AccountStatus::Inactive,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if the registration has not yet been decided
    pub fn is_pending(&self) -> bool {
        self.registration_status == RegistrationStatus::Pending
    }

    /// Returns true if the member was approved and is active
    pub fn is_active(&self) -> bool {
        self.registration_status == RegistrationStatus::Approved
            && self.account_status == AccountStatus::Active
    }

    /// Guards operations that require a pending registration
    pub fn ensure_pending(&self) -> Result<(), LedgerError> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(LedgerError::invalid_state(format!(
                "member {} is {}, expected pending",
                self.id,
                self.registration_status.as_str()
            )))
        }
    }

    /// Guards ledger mutations that require an approved account
    pub fn ensure_approved(&self) -> Result<(), LedgerError> {
        if self.registration_status == RegistrationStatus::Approved {
            Ok(())
        } else {
            Err(LedgerError::invalid_state(format!(
                "member {} is {}, expected approved",
                self.id,
                self.registration_status.as_str()
            )))
        }
    }

    /// Amount currently owed (zero if the balance is non-negative)
    pub fn due(&self) -> Money {
        self.balance.due()
    }

    /// Prepaid credit available (zero if the balance is non-positive)
    pub fn credit(&self) -> Money {
        self.balance.credit()
    }
}

/// A caller identity with its capabilities
///
/// Approval and rejection require the administrative capability; callers
/// without it are refused before any state is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub admin: bool,
}

impl Actor {
    pub fn admin(user_id: UserId) -> Self {
        Self {
            user_id,
            admin: true,
        }
    }

    pub fn member(user_id: UserId) -> Self {
        Self {
            user_id,
            admin: false,
        }
    }

    /// Guards administrative operations
    pub fn ensure_admin(&self) -> Result<(), LedgerError> {
        if self.admin {
            Ok(())
        } else {
            Err(LedgerError::permission_denied(format!(
                "user {} lacks the administrative capability",
                self.user_id
            )))
        }
    }
}
