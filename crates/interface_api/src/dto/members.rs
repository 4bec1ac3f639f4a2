//! Member and approval DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{ApprovalId, MemberId, UserId};
use domain_ledger::account::MemberAccount;
use domain_ledger::approval::ApprovalRecord;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterMemberRequest {
    #[validate(length(min = 9, max = 15))]
    pub phone_number: String,
    #[validate(length(min = 2, max = 120))]
    pub full_name: String,
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: MemberId,
    pub user_id: UserId,
    pub member_number: Option<String>,
    pub registration_status: String,
    pub account_status: String,
    pub balance: Decimal,
    /// Outstanding amount (zero when the balance is non-negative)
    pub due: Decimal,
    /// Prepaid credit (zero when the balance is non-positive)
    pub credit: Decimal,
    pub billing_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&MemberAccount> for MemberResponse {
    fn from(account: &MemberAccount) -> Self {
        Self {
            id: account.id,
            user_id: account.user_id,
            member_number: account.member_number.map(|n| n.to_string()),
            registration_status: account.registration_status.as_str().to_string(),
            account_status: account.account_status.as_str().to_string(),
            balance: account.balance.amount(),
            due: account.due().amount(),
            credit: account.credit().amount(),
            billing_date: account.billing_date,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApprovalRecordResponse {
    pub id: ApprovalId,
    pub member_id: MemberId,
    pub decided_by: UserId,
    pub kind: String,
    pub decision: String,
    pub decided_at: DateTime<Utc>,
}

impl From<&ApprovalRecord> for ApprovalRecordResponse {
    fn from(record: &ApprovalRecord) -> Self {
        Self {
            id: record.id,
            member_id: record.member_id,
            decided_by: record.decided_by,
            kind: record.kind.as_str().to_string(),
            decision: record.decision.as_str().to_string(),
            decided_at: record.decided_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    pub member: MemberResponse,
    pub record: ApprovalRecordResponse,
}
