//! Payment and contribution DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{ContributionId, MemberId, UserId};
use domain_ledger::contribution::{Contribution, ContributionCategory, TransactionMethod};
use infra_db::PaymentRecorded;

/// Category names accepted on the wire, matching the stored labels
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryDto {
    Monthly,
    Case,
    Project,
    Registration,
    Other,
}

impl From<CategoryDto> for ContributionCategory {
    fn from(dto: CategoryDto) -> Self {
        match dto {
            CategoryDto::Monthly => ContributionCategory::Monthly,
            CategoryDto::Case => ContributionCategory::Case,
            CategoryDto::Project => ContributionCategory::Project,
            CategoryDto::Registration => ContributionCategory::Registration,
            CategoryDto::Other => ContributionCategory::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodDto {
    MobileMoney,
    Cash,
    BankTransfer,
}

impl From<MethodDto> for TransactionMethod {
    fn from(dto: MethodDto) -> Self {
        match dto {
            MethodDto::MobileMoney => TransactionMethod::MobileMoney,
            MethodDto::Cash => TransactionMethod::Cash,
            MethodDto::BankTransfer => TransactionMethod::BankTransfer,
        }
    }
}

/// A staff-recorded payment
#[derive(Debug, Deserialize, Validate)]
pub struct RecordPaymentRequest {
    pub amount: Decimal,
    pub category: CategoryDto,
    pub method: MethodDto,
    #[validate(length(max = 64))]
    pub reference: Option<String>,
}

/// A mobile-money confirmation callback
///
/// Delivered at-least-once; `receipt` is the dedup key.
#[derive(Debug, Deserialize, Validate)]
pub struct MobileMoneyConfirmation {
    pub member_id: MemberId,
    pub amount: Decimal,
    #[validate(length(min = 1, max = 64))]
    pub receipt: String,
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub contribution_id: ContributionId,
    pub applied_to_due: Decimal,
    pub credited: Decimal,
    pub new_balance: Decimal,
}

impl From<&PaymentRecorded> for PaymentResponse {
    fn from(recorded: &PaymentRecorded) -> Self {
        Self {
            contribution_id: recorded.contribution.id,
            applied_to_due: recorded.outcome.applied_to_due.amount(),
            credited: recorded.outcome.credited.amount(),
            new_balance: recorded.outcome.new_balance.amount(),
        }
    }
}

/// Outcome of a confirmation callback
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConfirmationResponse {
    Applied(PaymentResponse),
    /// The receipt was seen before; the balance was not touched
    Duplicate,
}

#[derive(Debug, Serialize)]
pub struct ContributionResponse {
    pub id: ContributionId,
    pub member_id: MemberId,
    pub amount: Decimal,
    pub category: String,
    pub method: String,
    pub external_receipt: Option<String>,
    pub reference: Option<String>,
    pub recorded_by: UserId,
    pub recorded_at: DateTime<Utc>,
}

impl From<&Contribution> for ContributionResponse {
    fn from(c: &Contribution) -> Self {
        let method = match c.method {
            TransactionMethod::MobileMoney => "mobile_money",
            TransactionMethod::Cash => "cash",
            TransactionMethod::BankTransfer => "bank_transfer",
        };
        Self {
            id: c.id,
            member_id: c.member_id,
            amount: c.amount.amount(),
            category: c.category.as_str().to_string(),
            method: method.to_string(),
            external_receipt: c.external_receipt.clone(),
            reference: c.reference.clone(),
            recorded_by: c.recorded_by,
            recorded_at: c.recorded_at,
        }
    }
}
