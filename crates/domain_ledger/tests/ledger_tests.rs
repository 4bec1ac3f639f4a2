//! Comprehensive tests for domain_ledger

use chrono::{Duration, Utc};
use rust_decimal_macros::dec;

use core_kernel::{BillingPeriod, MemberId, MemberNumber, Money, Timezone, UserId};

use domain_ledger::account::{AccountStatus, Actor, MemberAccount, RegistrationStatus};
use domain_ledger::approval::{ApprovalDecision, ApprovalEngine, ApprovalKind};
use domain_ledger::audit::{AccountSnapshot, AnomalyReason, LedgerAuditor, Severity};
use domain_ledger::billing::BillingEngine;
use domain_ledger::contribution::{Contribution, ContributionCategory, TransactionMethod};
use domain_ledger::error::LedgerError;
use domain_ledger::payment::{apply_payment, apply_payment_to_account};
use domain_ledger::simulate::LedgerSimulation;

fn period_charge() -> Money {
    Money::new(dec!(100))
}

fn approval_engine() -> ApprovalEngine {
    ApprovalEngine::new(period_charge(), BillingPeriod::monthly(), Timezone::default())
}

fn billing_engine() -> BillingEngine {
    BillingEngine::new(period_charge(), BillingPeriod::monthly())
}

fn approved_account(sequence: i64) -> MemberAccount {
    let pending = MemberAccount::pending(MemberId::new(), UserId::new());
    let actor = Actor::admin(UserId::new());
    approval_engine()
        .approve(&pending, sequence, &actor, Utc::now())
        .unwrap()
        .account
}

// ============================================================================
// Approval Workflow Tests
// ============================================================================

mod approval_tests {
    use super::*;

    #[test]
    fn test_approval_assigns_formatted_member_number() {
        let account = approved_account(42);
        assert_eq!(account.member_number.unwrap().to_string(), "TNS0042");
    }

    #[test]
    fn test_approval_starts_one_period_in_arrears() {
        let account = approved_account(1);
        assert_eq!(account.balance.amount(), dec!(-100));
        assert_eq!(account.due().amount(), dec!(100));
        assert!(account.credit().is_zero());
    }

    #[test]
    fn test_approval_schedules_billing_one_period_out() {
        let now = Utc::now();
        let account = approved_account(1);
        let billing = account.billing_date.unwrap();

        // Normalized to start of local day, so between 29 and 31 days out
        assert!(billing > now + Duration::days(28));
        assert!(billing < now + Duration::days(31));
    }

    #[test]
    fn test_approval_activates_linked_user() {
        let account = approved_account(1);
        assert_eq!(account.account_status, AccountStatus::Active);
        assert!(account.is_active());
    }

    #[test]
    fn test_approval_audit_entry_is_registration_kind() {
        let pending = MemberAccount::pending(MemberId::new(), UserId::new());
        let actor = Actor::admin(UserId::new());
        let outcome = approval_engine()
            .approve(&pending, 5, &actor, Utc::now())
            .unwrap();

        assert_eq!(outcome.record.kind, ApprovalKind::Registration);
        assert_eq!(outcome.record.decision, ApprovalDecision::Approved);
        assert_eq!(outcome.record.decided_by, actor.user_id);
    }

    #[test]
    fn test_approve_twice_fails_with_invalid_state() {
        let account = approved_account(1);
        let result =
            approval_engine().approve(&account, 2, &Actor::admin(UserId::new()), Utc::now());
        assert!(matches!(result, Err(LedgerError::InvalidState(_))));
    }

    #[test]
    fn test_reject_then_approve_fails() {
        let pending = MemberAccount::pending(MemberId::new(), UserId::new());
        let actor = Actor::admin(UserId::new());
        let rejected = approval_engine()
            .reject(&pending, &actor, Utc::now())
            .unwrap()
            .account;

        let result = approval_engine().approve(&rejected, 1, &actor, Utc::now());
        assert!(matches!(result, Err(LedgerError::InvalidState(_))));
    }

    #[test]
    fn test_non_admin_cannot_decide() {
        let pending = MemberAccount::pending(MemberId::new(), UserId::new());
        let member = Actor::member(UserId::new());

        assert!(matches!(
            approval_engine().approve(&pending, 1, &member, Utc::now()),
            Err(LedgerError::PermissionDenied(_))
        ));
        assert!(matches!(
            approval_engine().reject(&pending, &member, Utc::now()),
            Err(LedgerError::PermissionDenied(_))
        ));
    }
}

// ============================================================================
// Payment Application Tests
// ============================================================================

mod payment_tests {
    use super::*;

    #[test]
    fn test_due_is_settled_before_credit_accrues() {
        let outcome = apply_payment(Money::new(dec!(-60)), Money::new(dec!(100))).unwrap();

        assert_eq!(outcome.applied_to_due.amount(), dec!(60));
        assert_eq!(outcome.credited.amount(), dec!(40));
        assert_eq!(outcome.new_balance.amount(), dec!(40));
    }

    #[test]
    fn test_payment_on_approved_account() {
        let account = approved_account(1);
        let outcome = apply_payment_to_account(&account, Money::new(dec!(70))).unwrap();
        assert_eq!(outcome.new_balance.amount(), dec!(-30));
    }

    #[test]
    fn test_payment_on_pending_account_is_invalid_state() {
        let pending = MemberAccount::pending(MemberId::new(), UserId::new());
        assert!(matches!(
            apply_payment_to_account(&pending, Money::new(dec!(70))),
            Err(LedgerError::InvalidState(_))
        ));
    }

    #[test]
    fn test_non_positive_amount_is_rejected_up_front() {
        let account = approved_account(1);
        assert!(matches!(
            apply_payment_to_account(&account, Money::zero()),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_fractional_cents_settle_exactly() {
        let outcome = apply_payment(Money::new(dec!(-0.30)), Money::new(dec!(0.10))).unwrap();
        let outcome2 = apply_payment(outcome.new_balance, Money::new(dec!(0.20))).unwrap();
        assert!(outcome2.new_balance.is_zero());
    }
}

// ============================================================================
// Recurring Billing Tests
// ============================================================================

mod billing_tests {
    use super::*;

    #[test]
    fn test_charge_is_linear_in_balance() {
        for start in [dec!(-250), dec!(-100), dec!(0), dec!(40), dec!(100), dec!(500)] {
            let outcome = billing_engine().charge(Money::new(start), Utc::now());
            assert_eq!(outcome.new_balance.amount(), start - dec!(100));
        }
    }

    #[test]
    fn test_charge_advances_billing_date_by_one_period() {
        let account = approved_account(1);
        let before = account.billing_date.unwrap();

        let outcome = billing_engine().apply_period_charge(&account).unwrap();
        assert_eq!(outcome.next_billing_date, before + Duration::days(30));
    }

    #[test]
    fn test_insolvent_account_still_advances() {
        let mut account = approved_account(1);
        account.balance = Money::new(dec!(-900));
        let before = account.billing_date.unwrap();

        let outcome = billing_engine().apply_period_charge(&account).unwrap();

        assert_eq!(outcome.new_balance.amount(), dec!(-1000));
        assert_eq!(outcome.next_billing_date, before + Duration::days(30));
    }
}

// ============================================================================
// Scenario Tests
// ============================================================================

mod scenario_tests {
    use super::*;

    #[test]
    fn test_spec_reference_scenario() {
        let mut sim = LedgerSimulation::new(period_charge(), BillingPeriod::monthly());

        sim.approve(1).unwrap();
        assert_eq!(sim.balance().amount(), dec!(-100));

        assert_eq!(sim.pay(Money::new(dec!(70))).unwrap().amount(), dec!(-30));
        assert_eq!(sim.pay(Money::new(dec!(40))).unwrap().amount(), dec!(10));
        assert_eq!(sim.charge().unwrap().amount(), dec!(-90));
    }

    #[test]
    fn test_settle_then_charge_returns_to_arrears() {
        let mut sim = LedgerSimulation::new(period_charge(), BillingPeriod::monthly());
        sim.approve(1).unwrap();

        sim.pay(period_charge()).unwrap();
        assert!(sim.balance().is_zero());

        sim.charge().unwrap();
        assert_eq!(sim.balance(), -period_charge());
    }

    #[test]
    fn test_prepaying_a_year_absorbs_twelve_charges() {
        let mut sim = LedgerSimulation::new(period_charge(), BillingPeriod::monthly());
        sim.approve(1).unwrap();

        // Clear the arrears, then prepay 12 periods
        sim.pay(Money::new(dec!(100))).unwrap();
        sim.pay(Money::new(dec!(1200))).unwrap();

        for expected in (0..12).rev() {
            let balance = sim.charge().unwrap();
            assert_eq!(balance.amount(), rust_decimal::Decimal::from(expected * 100));
        }
        assert!(sim.balance().is_zero());
    }
}

// ============================================================================
// Health Auditor Tests
// ============================================================================

mod auditor_tests {
    use super::*;

    fn snapshot_of(account: &MemberAccount) -> AccountSnapshot {
        AccountSnapshot {
            member_id: account.id,
            member_number: account.member_number,
            registration_status: account.registration_status,
            account_status: account.account_status,
            balance: Some(account.balance),
            billing_date: account.billing_date,
        }
    }

    #[test]
    fn test_freshly_approved_account_is_healthy() {
        let account = approved_account(1);
        let auditor = LedgerAuditor::new(BillingPeriod::monthly());

        assert!(auditor.sweep(&[snapshot_of(&account)], Utc::now()).is_empty());
    }

    #[test]
    fn test_uncharged_account_is_flagged_after_date_passes() {
        let account = approved_account(1);
        let mut snapshot = snapshot_of(&account);
        snapshot.billing_date = Some(Utc::now() - Duration::days(40));

        let auditor = LedgerAuditor::new(BillingPeriod::monthly());
        let anomalies = auditor.sweep(&[snapshot], Utc::now());

        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].reason, AnomalyReason::BillingDatePassed);
    }

    #[test]
    fn test_sweep_over_mixed_population() {
        let now = Utc::now();
        let healthy = snapshot_of(&approved_account(1));

        let mut no_date = snapshot_of(&approved_account(2));
        no_date.billing_date = None;

        let mut null_balance = snapshot_of(&approved_account(3));
        null_balance.balance = None;

        let anomalies = LedgerAuditor::new(BillingPeriod::monthly())
            .sweep(&[healthy, no_date.clone(), null_balance.clone()], now);

        assert_eq!(anomalies.len(), 2);
        assert!(anomalies
            .iter()
            .any(|a| a.member_id == no_date.member_id
                && a.reason == AnomalyReason::MissingBillingDate));
        assert!(anomalies
            .iter()
            .any(|a| a.member_id == null_balance.member_id
                && a.reason == AnomalyReason::NullBalance
                && a.severity == Severity::Critical));
    }
}

// ============================================================================
// Contribution Fact Tests
// ============================================================================

mod contribution_tests {
    use super::*;

    #[test]
    fn test_mobile_money_contribution_carries_receipt() {
        let c = Contribution::new(
            MemberId::new(),
            Money::new(dec!(100)),
            ContributionCategory::Monthly,
            TransactionMethod::MobileMoney,
            UserId::new(),
        )
        .with_receipt("SBK4H7ZQ10");

        assert_eq!(c.external_receipt.as_deref(), Some("SBK4H7ZQ10"));
        assert_eq!(c.category, ContributionCategory::Monthly);
    }

    #[test]
    fn test_member_number_parse_round_trip() {
        let n: MemberNumber = "TNS0042".parse().unwrap();
        assert_eq!(n.sequence(), 42);
    }
}
