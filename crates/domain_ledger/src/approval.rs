//! Registration approval workflow
//!
//! Approval is the only path that assigns a member number and initializes the
//! ledger. The engine here computes the full set of effects as values; the
//! persistence layer commits them as one atomic transaction so a failure in
//! any sub-step leaves no partial effect (and no burned sequence number).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use core_kernel::{ApprovalId, BillingPeriod, MemberId, MemberNumber, Money, Timezone, UserId};

use crate::account::{AccountStatus, Actor, MemberAccount, RegistrationStatus};
use crate::error::LedgerError;

/// What kind of decision an approval record documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalKind {
    Registration,
}

impl ApprovalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalKind::Registration => "registration",
        }
    }
}

/// The decision taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    Approved,
    Rejected,
}

impl ApprovalDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalDecision::Approved => "approved",
            ApprovalDecision::Rejected => "rejected",
        }
    }
}

/// Immutable audit fact recorded with every decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalRecord {
    pub id: ApprovalId,
    pub member_id: MemberId,
    pub decided_by: UserId,
    pub kind: ApprovalKind,
    pub decision: ApprovalDecision,
    pub decided_at: DateTime<Utc>,
}

/// Effects of a successful approval, to be committed as one unit
#[derive(Debug, Clone)]
pub struct ApprovalOutcome {
    /// The account with number, balance, billing date, and statuses applied
    pub account: MemberAccount,
    /// The assigned display identifier
    pub member_number: MemberNumber,
    /// The audit fact to append
    pub record: ApprovalRecord,
}

/// Effects of a rejection
#[derive(Debug, Clone)]
pub struct RejectionOutcome {
    pub account: MemberAccount,
    pub record: ApprovalRecord,
}

/// The approval workflow engine
///
/// Holds the billing policy applied at approval time: the recurring period
/// charge, the cycle length, and the timezone billing dates are normalized
/// in.
#[derive(Debug, Clone)]
pub struct ApprovalEngine {
    period_charge: Money,
    period: BillingPeriod,
    timezone: Timezone,
}

impl ApprovalEngine {
    /// Creates an engine with the configured period charge
    ///
    /// The charge arrives from configuration already validated as positive.
    pub fn new(period_charge: Money, period: BillingPeriod, timezone: Timezone) -> Self {
        Self {
            period_charge,
            period,
            timezone,
        }
    }

    /// The configured recurring charge
    pub fn period_charge(&self) -> Money {
        self.period_charge
    }

    /// Approves a pending registration
    ///
    /// `sequence` is the integer issued by the sequence allocator inside the
    /// same transaction that will persist this outcome. On success the
    /// account starts one period in arrears (`balance = -period_charge`) with
    /// its first billing date one period out, normalized to start of day.
    pub fn approve(
        &self,
        account: &MemberAccount,
        sequence: i64,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<ApprovalOutcome, LedgerError> {
        actor.ensure_admin()?;
        account.ensure_pending()?;

        if account.member_number.is_some() {
            return Err(LedgerError::integrity(format!(
                "pending member {} already has a member number",
                account.id
            )));
        }

        let member_number = MemberNumber::from_sequence(sequence)
            .map_err(|e| LedgerError::integrity(e.to_string()))?;

        let mut approved = account.clone();
        approved.member_number = Some(member_number);
        approved.registration_status = RegistrationStatus::Approved;
        approved.account_status = AccountStatus::Active;
        // Registration does not grant a free first period
        approved.balance = -self.period_charge;
        approved.billing_date = Some(self.period.first_billing_date(now, &self.timezone));
        approved.updated_at = now;

        let record = ApprovalRecord {
            id: ApprovalId::new_v7(),
            member_id: account.id,
            decided_by: actor.user_id,
            kind: ApprovalKind::Registration,
            decision: ApprovalDecision::Approved,
            decided_at: now,
        };

        info!(
            member = %account.id,
            number = %member_number,
            approver = %actor.user_id,
            "registration approved"
        );

        Ok(ApprovalOutcome {
            account: approved,
            member_number,
            record,
        })
    }

    /// Rejects a pending registration
    ///
    /// No balance, sequence, or billing side effects; the linked user goes
    /// inactive and an audit fact is appended.
    pub fn reject(
        &self,
        account: &MemberAccount,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<RejectionOutcome, LedgerError> {
        actor.ensure_admin()?;
        account.ensure_pending()?;

        let mut rejected = account.clone();
        rejected.registration_status = RegistrationStatus::Rejected;
        rejected.account_status = AccountStatus::Inactive;
        rejected.updated_at = now;

        let record = ApprovalRecord {
            id: ApprovalId::new_v7(),
            member_id: account.id,
            decided_by: actor.user_id,
            kind: ApprovalKind::Registration,
            decision: ApprovalDecision::Rejected,
            decided_at: now,
        };

        info!(member = %account.id, approver = %actor.user_id, "registration rejected");

        Ok(RejectionOutcome {
            account: rejected,
            record,
        })
    }
}
