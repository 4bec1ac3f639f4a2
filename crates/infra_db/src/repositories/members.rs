//! Member ledger repository
//!
//! All ledger mutations run here, each as one database transaction: lock the
//! member row, let the domain engine compute the outcome, write every effect,
//! commit. Nothing outside a transaction ever writes balance, billing date,
//! or member number, so the invariants the engines enforce hold row by row.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use core_kernel::{ApprovalId, ContributionId, MemberId, MemberNumber, Money, ReceiptId, UserId};
use domain_ledger::account::{AccountStatus, Actor, MemberAccount, RegistrationStatus};
use domain_ledger::approval::{
    ApprovalDecision, ApprovalEngine, ApprovalKind, ApprovalOutcome, ApprovalRecord,
    RejectionOutcome,
};
use domain_ledger::audit::AccountSnapshot;
use domain_ledger::billing::{BillingEngine, ChargeOutcome};
use domain_ledger::contribution::{Contribution, ContributionCategory, TransactionMethod};
use domain_ledger::payment::{apply_payment_to_account, PaymentOutcome};

use crate::error::{DatabaseError, RepositoryError};
use crate::sequence::next_member_sequence;

/// A new registration to persist as a user plus a pending member account
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub phone_number: String,
    pub full_name: String,
}

/// A payment that was applied and recorded
#[derive(Debug, Clone)]
pub struct PaymentRecorded {
    pub contribution: Contribution,
    pub outcome: PaymentOutcome,
}

/// Result of confirming an external (mobile-money) payment
///
/// Confirmations arrive at-least-once; a receipt seen before is acknowledged
/// without touching the balance.
#[derive(Debug, Clone)]
pub enum ExternalPaymentResult {
    Applied(PaymentRecorded),
    Duplicate,
}

/// Outcome of one scheduled billing run
#[derive(Debug, Clone)]
pub struct BillingRunSummary {
    pub run_at: DateTime<Utc>,
    pub charged: u32,
    pub failed: Vec<(MemberId, String)>,
}

/// Repository for member accounts and their ledger
#[derive(Debug, Clone)]
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    /// Creates a new MemberRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a user and its pending member account in one transaction
    ///
    /// The user starts inactive; activation happens only at approval.
    pub async fn register(
        &self,
        registration: NewRegistration,
    ) -> Result<MemberAccount, RepositoryError> {
        let user_id = UserId::new_v7();
        let account = MemberAccount::pending(MemberId::new_v7(), user_id);

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (user_id, phone_number, full_name, role, status, created_at, updated_at)
            VALUES ($1, $2, $3, 'member', 'inactive', $4, $4)
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(&registration.phone_number)
        .bind(&registration.full_name)
        .bind(account.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO members (member_id, user_id, registration_status, account_status, balance, created_at, updated_at)
            VALUES ($1, $2, 'pending', 'inactive', $3, $4, $4)
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(user_id.as_uuid())
        .bind(account.balance.amount())
        .bind(account.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(member = %account.id, "registration received");
        Ok(account)
    }

    /// Fetches one member account
    pub async fn find_by_id(&self, member_id: MemberId) -> Result<MemberAccount, RepositoryError> {
        let row: Option<MemberRow> = sqlx::query_as(&select_member("WHERE member_id = $1"))
            .bind(member_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or_else(|| DatabaseError::not_found("Member", member_id))?
            .into_account()
            .map_err(RepositoryError::from)
    }

    /// Fetches one member account by its display number
    pub async fn find_by_member_number(
        &self,
        number: MemberNumber,
    ) -> Result<MemberAccount, RepositoryError> {
        let row: Option<MemberRow> = sqlx::query_as(&select_member("WHERE member_number = $1"))
            .bind(number.sequence())
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or_else(|| DatabaseError::not_found("Member", number))?
            .into_account()
            .map_err(RepositoryError::from)
    }

    /// Lists registrations awaiting a decision, oldest first
    pub async fn list_pending(&self) -> Result<Vec<MemberAccount>, RepositoryError> {
        let rows: Vec<MemberRow> = sqlx::query_as(&select_member(
            "WHERE registration_status = 'pending' ORDER BY created_at",
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|r| r.into_account().map_err(RepositoryError::from))
            .collect()
    }

    /// Approves a pending registration as one atomic unit
    ///
    /// Inside a single transaction: lock the member row, allocate the next
    /// sequence value, apply the engine's effects (number, statuses, opening
    /// balance, first billing date), activate the linked user, and append the
    /// approval record. Any failure rolls everything back, including the
    /// sequence increment.
    pub async fn approve_registration(
        &self,
        member_id: MemberId,
        engine: &ApprovalEngine,
        actor: &Actor,
    ) -> Result<ApprovalOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let account = lock_member(&mut tx, member_id).await?;
        let sequence = next_member_sequence(&mut tx).await?;
        let outcome = engine.approve(&account, sequence, actor, Utc::now())?;

        let updated = sqlx::query(
            r#"
            UPDATE members
            SET member_number = $2,
                registration_status = 'approved',
                account_status = 'active',
                balance = $3,
                billing_date = $4,
                updated_at = $5
            WHERE member_id = $1 AND registration_status = 'pending'
            "#,
        )
        .bind(member_id.as_uuid())
        .bind(outcome.member_number.sequence())
        .bind(outcome.account.balance.amount())
        .bind(outcome.account.billing_date)
        .bind(outcome.account.updated_at)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() != 1 {
            return Err(DatabaseError::SerializationFailure(format!(
                "member {} changed state during approval",
                member_id
            ))
            .into());
        }

        sqlx::query("UPDATE users SET status = 'active', updated_at = $2 WHERE user_id = $1")
            .bind(outcome.account.user_id.as_uuid())
            .bind(outcome.account.updated_at)
            .execute(&mut *tx)
            .await?;

        insert_approval(&mut tx, &outcome.record).await?;

        tx.commit().await?;
        Ok(outcome)
    }

    /// Rejects a pending registration
    ///
    /// No sequence is allocated and no balance is touched; the linked user
    /// stays inactive and the decision is recorded.
    pub async fn reject_registration(
        &self,
        member_id: MemberId,
        engine: &ApprovalEngine,
        actor: &Actor,
    ) -> Result<RejectionOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let account = lock_member(&mut tx, member_id).await?;
        let outcome = engine.reject(&account, actor, Utc::now())?;

        let updated = sqlx::query(
            r#"
            UPDATE members
            SET registration_status = 'rejected',
                account_status = 'inactive',
                updated_at = $2
            WHERE member_id = $1 AND registration_status = 'pending'
            "#,
        )
        .bind(member_id.as_uuid())
        .bind(outcome.account.updated_at)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() != 1 {
            return Err(DatabaseError::SerializationFailure(format!(
                "member {} changed state during rejection",
                member_id
            ))
            .into());
        }

        insert_approval(&mut tx, &outcome.record).await?;

        tx.commit().await?;
        Ok(outcome)
    }

    /// Applies a payment and records the contribution fact in one transaction
    ///
    /// The payment engine settles due before building credit; the balance
    /// update and the contribution insert commit together or not at all.
    pub async fn record_payment(
        &self,
        member_id: MemberId,
        amount: Money,
        category: ContributionCategory,
        method: TransactionMethod,
        recorded_by: UserId,
        reference: Option<String>,
    ) -> Result<PaymentRecorded, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let recorded = apply_payment_in_tx(
            &mut tx,
            member_id,
            amount,
            category,
            method,
            recorded_by,
            reference,
            None,
        )
        .await?;

        tx.commit().await?;
        Ok(recorded)
    }

    /// Confirms an external mobile-money payment, deduplicating by receipt
    ///
    /// The receipt claim is an insert with `ON CONFLICT DO NOTHING`: the
    /// first confirmation to commit wins, any replay sees zero rows affected
    /// and is acknowledged as a duplicate without moving the balance.
    pub async fn record_external_payment(
        &self,
        member_id: MemberId,
        amount: Money,
        receipt: &str,
        recorded_by: UserId,
    ) -> Result<ExternalPaymentResult, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let claimed = sqlx::query(
            r#"
            INSERT INTO payment_receipts (receipt_id, external_receipt, received_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (external_receipt) DO NOTHING
            "#,
        )
        .bind(*ReceiptId::new_v7().as_uuid())
        .bind(receipt)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        if claimed.rows_affected() == 0 {
            info!(member = %member_id, receipt, "duplicate payment confirmation ignored");
            return Ok(ExternalPaymentResult::Duplicate);
        }

        let recorded = apply_payment_in_tx(
            &mut tx,
            member_id,
            amount,
            ContributionCategory::Monthly,
            TransactionMethod::MobileMoney,
            recorded_by,
            None,
            Some(receipt.to_string()),
        )
        .await?;

        tx.commit().await?;
        Ok(ExternalPaymentResult::Applied(recorded))
    }

    /// Applies one period charge to a member
    ///
    /// The balance drops by the period charge and the billing date advances
    /// by one period, whether or not the member can cover it.
    pub async fn apply_period_charge(
        &self,
        member_id: MemberId,
        engine: &BillingEngine,
    ) -> Result<ChargeOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let account = lock_member(&mut tx, member_id).await?;
        let outcome = engine.apply_period_charge(&account)?;
        write_charge(&mut tx, member_id, &outcome).await?;

        tx.commit().await?;
        Ok(outcome)
    }

    /// Charges one member only if its billing date has arrived
    ///
    /// Billing runs select due members before their row locks are taken, so
    /// two overlapping runs can pick the same member. The date is re-checked
    /// here under the lock: whichever run charged first advanced it, and the
    /// later run sees the advanced date and skips the member instead of
    /// charging the same cycle twice.
    pub async fn charge_if_due(
        &self,
        member_id: MemberId,
        engine: &BillingEngine,
        now: DateTime<Utc>,
    ) -> Result<Option<ChargeOutcome>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let account = lock_member(&mut tx, member_id).await?;
        if !engine.is_due(&account, now) {
            return Ok(None);
        }

        let outcome = engine.apply_period_charge(&account)?;
        write_charge(&mut tx, member_id, &outcome).await?;

        tx.commit().await?;
        Ok(Some(outcome))
    }

    /// Charges every active member whose billing date has arrived
    ///
    /// Each member is charged in its own transaction, with the due date
    /// re-verified under the row lock so concurrent runs never double-charge
    /// a cycle. One member's failure is recorded in the summary and the run
    /// continues.
    pub async fn run_billing(
        &self,
        engine: &BillingEngine,
        now: DateTime<Utc>,
    ) -> Result<BillingRunSummary, RepositoryError> {
        let due: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT member_id
            FROM members
            WHERE registration_status = 'approved'
              AND account_status = 'active'
              AND billing_date IS NOT NULL
              AND billing_date <= $1
            ORDER BY billing_date
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        let mut summary = BillingRunSummary {
            run_at: now,
            charged: 0,
            failed: Vec::new(),
        };

        for (id,) in due {
            let member_id = MemberId::from(id);
            match self.charge_if_due(member_id, engine, now).await {
                Ok(Some(_)) => summary.charged += 1,
                Ok(None) => {}
                Err(e) => summary.failed.push((member_id, e.to_string())),
            }
        }

        info!(
            charged = summary.charged,
            failed = summary.failed.len(),
            "billing run complete"
        );
        Ok(summary)
    }

    /// Reads lenient snapshots of every member for the health auditor
    ///
    /// No locks are taken; the auditor tolerates mid-flight reads.
    pub async fn snapshots(&self) -> Result<Vec<AccountSnapshot>, RepositoryError> {
        let rows: Vec<MemberRow> =
            sqlx::query_as(&select_member("ORDER BY created_at")).fetch_all(&self.pool).await?;

        rows.into_iter()
            .map(|r| r.into_snapshot().map_err(RepositoryError::from))
            .collect()
    }

    /// Lists the approval decisions recorded for a member, newest first
    pub async fn approval_history(
        &self,
        member_id: MemberId,
    ) -> Result<Vec<ApprovalRecord>, RepositoryError> {
        let rows: Vec<ApprovalRow> = sqlx::query_as(
            r#"
            SELECT approval_id, member_id, decided_by, kind, decision, decided_at
            FROM approvals
            WHERE member_id = $1
            ORDER BY decided_at DESC
            "#,
        )
        .bind(member_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|r| r.into_record().map_err(RepositoryError::from))
            .collect()
    }

    /// Lists a member's contribution trail, newest first
    pub async fn contributions(
        &self,
        member_id: MemberId,
    ) -> Result<Vec<Contribution>, RepositoryError> {
        let rows: Vec<ContributionRow> = sqlx::query_as(
            r#"
            SELECT contribution_id, member_id, amount, category, method,
                   external_receipt, reference, recorded_by, recorded_at
            FROM contributions
            WHERE member_id = $1
            ORDER BY recorded_at DESC
            "#,
        )
        .bind(member_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|r| r.into_contribution().map_err(RepositoryError::from))
            .collect()
    }
}

// Shared projection so every member read maps through the same row type
fn select_member(clause: &str) -> String {
    format!(
        r#"
        SELECT member_id, user_id, member_number, registration_status,
               account_status, balance, billing_date, created_at, updated_at
        FROM members
        {}
        "#,
        clause
    )
}

async fn lock_member(
    tx: &mut Transaction<'_, Postgres>,
    member_id: MemberId,
) -> Result<MemberAccount, RepositoryError> {
    let row: Option<MemberRow> = sqlx::query_as(&select_member("WHERE member_id = $1 FOR UPDATE"))
        .bind(member_id.as_uuid())
        .fetch_optional(&mut **tx)
        .await?;

    row.ok_or_else(|| DatabaseError::not_found("Member", member_id))?
        .into_account()
        .map_err(RepositoryError::from)
}

#[allow(clippy::too_many_arguments)]
async fn apply_payment_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    member_id: MemberId,
    amount: Money,
    category: ContributionCategory,
    method: TransactionMethod,
    recorded_by: UserId,
    reference: Option<String>,
    external_receipt: Option<String>,
) -> Result<PaymentRecorded, RepositoryError> {
    let account = lock_member(tx, member_id).await?;
    let outcome = apply_payment_to_account(&account, amount)?;

    sqlx::query("UPDATE members SET balance = $2, updated_at = $3 WHERE member_id = $1")
        .bind(member_id.as_uuid())
        .bind(outcome.new_balance.amount())
        .bind(Utc::now())
        .execute(&mut **tx)
        .await?;

    let mut contribution = Contribution::new(member_id, amount, category, method, recorded_by);
    contribution.reference = reference;
    contribution.external_receipt = external_receipt;

    insert_contribution(tx, &contribution).await?;

    info!(
        member = %member_id,
        amount = %amount,
        applied_to_due = %outcome.applied_to_due,
        credited = %outcome.credited,
        "payment applied"
    );

    Ok(PaymentRecorded {
        contribution,
        outcome,
    })
}

async fn write_charge(
    tx: &mut Transaction<'_, Postgres>,
    member_id: MemberId,
    outcome: &ChargeOutcome,
) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        UPDATE members
        SET balance = $2, billing_date = $3, updated_at = $4
        WHERE member_id = $1
        "#,
    )
    .bind(member_id.as_uuid())
    .bind(outcome.new_balance.amount())
    .bind(outcome.next_billing_date)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn insert_contribution(
    tx: &mut Transaction<'_, Postgres>,
    contribution: &Contribution,
) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO contributions (
            contribution_id, member_id, amount, category, method,
            external_receipt, reference, recorded_by, recorded_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(contribution.id.as_uuid())
    .bind(contribution.member_id.as_uuid())
    .bind(contribution.amount.amount())
    .bind(contribution.category.as_str())
    .bind(method_str(contribution.method))
    .bind(&contribution.external_receipt)
    .bind(&contribution.reference)
    .bind(contribution.recorded_by.as_uuid())
    .bind(contribution.recorded_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn insert_approval(
    tx: &mut Transaction<'_, Postgres>,
    record: &ApprovalRecord,
) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO approvals (approval_id, member_id, decided_by, kind, decision, decided_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(record.id.as_uuid())
    .bind(record.member_id.as_uuid())
    .bind(record.decided_by.as_uuid())
    .bind(record.kind.as_str())
    .bind(record.decision.as_str())
    .bind(record.decided_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Database row for a member account
#[derive(Debug, Clone, sqlx::FromRow)]
struct MemberRow {
    member_id: Uuid,
    user_id: Uuid,
    member_number: Option<i64>,
    registration_status: String,
    account_status: String,
    balance: Option<Decimal>,
    billing_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MemberRow {
    /// Strict mapping used by the engines; a null balance is a schema defect
    /// and refuses to produce an account
    fn into_account(self) -> Result<MemberAccount, DatabaseError> {
        let balance = self
            .balance
            .ok_or_else(|| DatabaseError::RowDecode(format!(
                "member {} has a null balance",
                self.member_id
            )))?;

        Ok(MemberAccount {
            id: MemberId::from(self.member_id),
            user_id: UserId::from(self.user_id),
            member_number: decode_member_number(self.member_number)?,
            registration_status: parse_registration_status(&self.registration_status)?,
            balance: Money::new(balance),
            billing_date: self.billing_date,
            account_status: parse_account_status(&self.account_status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }

    /// Lenient mapping for the health auditor; nulls pass through as-is
    fn into_snapshot(self) -> Result<AccountSnapshot, DatabaseError> {
        Ok(AccountSnapshot {
            member_id: MemberId::from(self.member_id),
            member_number: decode_member_number(self.member_number)?,
            registration_status: parse_registration_status(&self.registration_status)?,
            account_status: parse_account_status(&self.account_status)?,
            balance: self.balance.map(Money::new),
            billing_date: self.billing_date,
        })
    }
}

fn decode_member_number(raw: Option<i64>) -> Result<Option<MemberNumber>, DatabaseError> {
    raw.map(|n| {
        MemberNumber::from_sequence(n).map_err(|e| DatabaseError::RowDecode(e.to_string()))
    })
    .transpose()
}

fn parse_registration_status(raw: &str) -> Result<RegistrationStatus, DatabaseError> {
    match raw {
        "pending" => Ok(RegistrationStatus::Pending),
        "approved" => Ok(RegistrationStatus::Approved),
        "rejected" => Ok(RegistrationStatus::Rejected),
        other => Err(DatabaseError::RowDecode(format!(
            "unknown registration status '{}'",
            other
        ))),
    }
}

fn parse_account_status(raw: &str) -> Result<AccountStatus, DatabaseError> {
    match raw {
        "active" => Ok(AccountStatus::Active),
        "inactive" => Ok(AccountStatus::Inactive),
        other => Err(DatabaseError::RowDecode(format!(
            "unknown account status '{}'",
            other
        ))),
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct ApprovalRow {
    approval_id: Uuid,
    member_id: Uuid,
    decided_by: Uuid,
    kind: String,
    decision: String,
    decided_at: DateTime<Utc>,
}

impl ApprovalRow {
    fn into_record(self) -> Result<ApprovalRecord, DatabaseError> {
        let kind = match self.kind.as_str() {
            "registration" => ApprovalKind::Registration,
            other => {
                return Err(DatabaseError::RowDecode(format!(
                    "unknown approval kind '{}'",
                    other
                )))
            }
        };
        let decision = match self.decision.as_str() {
            "approved" => ApprovalDecision::Approved,
            "rejected" => ApprovalDecision::Rejected,
            other => {
                return Err(DatabaseError::RowDecode(format!(
                    "unknown approval decision '{}'",
                    other
                )))
            }
        };

        Ok(ApprovalRecord {
            id: ApprovalId::from(self.approval_id),
            member_id: MemberId::from(self.member_id),
            decided_by: UserId::from(self.decided_by),
            kind,
            decision,
            decided_at: self.decided_at,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct ContributionRow {
    contribution_id: Uuid,
    member_id: Uuid,
    amount: Decimal,
    category: String,
    method: String,
    external_receipt: Option<String>,
    reference: Option<String>,
    recorded_by: Uuid,
    recorded_at: DateTime<Utc>,
}

impl ContributionRow {
    fn into_contribution(self) -> Result<Contribution, DatabaseError> {
        Ok(Contribution {
            id: ContributionId::from(self.contribution_id),
            member_id: MemberId::from(self.member_id),
            amount: Money::new(self.amount),
            category: parse_category(&self.category)?,
            method: parse_method(&self.method)?,
            external_receipt: self.external_receipt,
            reference: self.reference,
            recorded_by: UserId::from(self.recorded_by),
            recorded_at: self.recorded_at,
        })
    }
}

fn parse_category(raw: &str) -> Result<ContributionCategory, DatabaseError> {
    match raw {
        "monthly" => Ok(ContributionCategory::Monthly),
        "case" => Ok(ContributionCategory::Case),
        "project" => Ok(ContributionCategory::Project),
        "registration" => Ok(ContributionCategory::Registration),
        "other" => Ok(ContributionCategory::Other),
        other => Err(DatabaseError::RowDecode(format!(
            "unknown contribution category '{}'",
            other
        ))),
    }
}

fn method_str(method: TransactionMethod) -> &'static str {
    match method {
        TransactionMethod::MobileMoney => "mobile_money",
        TransactionMethod::Cash => "cash",
        TransactionMethod::BankTransfer => "bank_transfer",
    }
}

fn parse_method(raw: &str) -> Result<TransactionMethod, DatabaseError> {
    match raw {
        "mobile_money" => Ok(TransactionMethod::MobileMoney),
        "cash" => Ok(TransactionMethod::Cash),
        "bank_transfer" => Ok(TransactionMethod::BankTransfer),
        other => Err(DatabaseError::RowDecode(format!(
            "unknown transaction method '{}'",
            other
        ))),
    }
}
