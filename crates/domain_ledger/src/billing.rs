//! Recurring period charges
//!
//! Each billing cycle deducts the period charge from the balance: credit is
//! consumed first, any shortfall becomes new due. The billing date advances
//! unconditionally — billing proceeds on schedule independent of solvency,
//! and insolvency is surfaced as a negative balance, never as a skipped
//! cycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::{BillingPeriod, Money};

use crate::account::MemberAccount;
use crate::error::LedgerError;

/// Result of applying one period charge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeOutcome {
    /// Portion covered by existing prepaid credit
    pub from_credit: Money,
    /// Portion that became new due
    pub added_to_due: Money,
    /// The balance after the charge
    pub new_balance: Money,
    /// The advanced billing date
    pub next_billing_date: DateTime<Utc>,
}

/// The recurring billing engine
#[derive(Debug, Clone)]
pub struct BillingEngine {
    period_charge: Money,
    period: BillingPeriod,
}

impl BillingEngine {
    pub fn new(period_charge: Money, period: BillingPeriod) -> Self {
        Self {
            period_charge,
            period,
        }
    }

    pub fn period_charge(&self) -> Money {
        self.period_charge
    }

    pub fn period(&self) -> BillingPeriod {
        self.period
    }

    /// Applies one period charge to an approved account
    ///
    /// `new_balance = balance - period_charge` for every starting balance;
    /// the credit/due split in the outcome is reporting, not different math.
    /// Requires a scheduled billing date — an active account without one is
    /// an anomaly the auditor reports, not something to charge past.
    pub fn apply_period_charge(
        &self,
        account: &MemberAccount,
    ) -> Result<ChargeOutcome, LedgerError> {
        account.ensure_approved()?;

        let billing_date = account.billing_date.ok_or_else(|| {
            LedgerError::integrity(format!("active member {} has no billing date", account.id))
        })?;

        let outcome = self.charge(account.balance, billing_date);

        debug!(
            member = %account.id,
            charge = %self.period_charge,
            balance = %outcome.new_balance,
            next = %outcome.next_billing_date,
            "period charge applied"
        );

        Ok(outcome)
    }

    /// Whether the account's next charge has come due at `now`
    ///
    /// Billing runs scan for due members before taking their row locks, so
    /// callers repeat this check once the lock is held: a member whose date
    /// already advanced was charged by an overlapping run and must be
    /// skipped, not charged again.
    pub fn is_due(&self, account: &MemberAccount, now: DateTime<Utc>) -> bool {
        account.billing_date.map_or(false, |date| date <= now)
    }

    /// The charge arithmetic on a bare balance and billing date
    pub fn charge(&self, balance: Money, billing_date: DateTime<Utc>) -> ChargeOutcome {
        let from_credit = balance.credit().min(self.period_charge);
        let added_to_due = self.period_charge - from_credit;

        ChargeOutcome {
            from_credit,
            added_to_due,
            new_balance: balance - self.period_charge,
            next_billing_date: self.period.advance(billing_date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{AccountStatus, RegistrationStatus};
    use core_kernel::{MemberId, UserId};
    use rust_decimal_macros::dec;

    fn engine() -> BillingEngine {
        BillingEngine::new(Money::new(dec!(100)), BillingPeriod::monthly())
    }

    fn approved_with(balance: Money) -> MemberAccount {
        let mut account = MemberAccount::pending(MemberId::new(), UserId::new());
        account.registration_status = RegistrationStatus::Approved;
        account.account_status = AccountStatus::Active;
        account.balance = balance;
        account.billing_date = Some(Utc::now());
        account
    }

    #[test]
    fn test_charge_fully_absorbed_by_credit() {
        let account = approved_with(Money::new(dec!(250)));
        let outcome = engine().apply_period_charge(&account).unwrap();

        assert_eq!(outcome.from_credit.amount(), dec!(100));
        assert!(outcome.added_to_due.is_zero());
        assert_eq!(outcome.new_balance.amount(), dec!(150));
    }

    #[test]
    fn test_charge_partially_covered_consumes_credit_then_adds_due() {
        let account = approved_with(Money::new(dec!(40)));
        let outcome = engine().apply_period_charge(&account).unwrap();

        assert_eq!(outcome.from_credit.amount(), dec!(40));
        assert_eq!(outcome.added_to_due.amount(), dec!(60));
        assert_eq!(outcome.new_balance.amount(), dec!(-60));
    }

    #[test]
    fn test_charge_on_already_negative_balance() {
        let account = approved_with(Money::new(dec!(-30)));
        let outcome = engine().apply_period_charge(&account).unwrap();

        assert!(outcome.from_credit.is_zero());
        assert_eq!(outcome.added_to_due.amount(), dec!(100));
        assert_eq!(outcome.new_balance.amount(), dec!(-130));
    }

    #[test]
    fn test_billing_date_advances_regardless_of_solvency() {
        let account = approved_with(Money::new(dec!(-500)));
        let before = account.billing_date.unwrap();

        let outcome = engine().apply_period_charge(&account).unwrap();

        assert_eq!(
            outcome.next_billing_date,
            before + chrono::Duration::days(30)
        );
    }

    #[test]
    fn test_due_check_tracks_the_billing_date() {
        let now = Utc::now();
        let mut account = approved_with(Money::zero());

        account.billing_date = Some(now - chrono::Duration::days(1));
        assert!(engine().is_due(&account, now));

        account.billing_date = Some(now);
        assert!(engine().is_due(&account, now));

        account.billing_date = Some(now + chrono::Duration::days(1));
        assert!(!engine().is_due(&account, now));

        account.billing_date = None;
        assert!(!engine().is_due(&account, now));
    }

    #[test]
    fn test_charge_requires_approved_account() {
        let account = MemberAccount::pending(MemberId::new(), UserId::new());
        assert!(matches!(
            engine().apply_period_charge(&account),
            Err(LedgerError::InvalidState(_))
        ));
    }

    #[test]
    fn test_charge_requires_billing_date() {
        let mut account = approved_with(Money::zero());
        account.billing_date = None;

        assert!(matches!(
            engine().apply_period_charge(&account),
            Err(LedgerError::IntegrityViolation(_))
        ));
    }
}
