//! Ledger health auditor
//!
//! A read-only sweep over raw account snapshots that flags invariant
//! violations. It takes no locks and tolerates mid-flight reads; what it
//! observes at read time is what it reports. Output is advisory, consumed by
//! operators — nothing is corrected automatically.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use core_kernel::{BillingPeriod, MemberId, MemberNumber, Money};

use crate::account::{AccountStatus, RegistrationStatus};

/// A raw, lenient read of a member row
///
/// Unlike [`crate::account::MemberAccount`], the balance is optional here: a
/// null balance can only arise from a schema or migration defect, and the
/// auditor is exactly the place that has to be able to see one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub member_id: MemberId,
    pub member_number: Option<MemberNumber>,
    pub registration_status: RegistrationStatus,
    pub account_status: AccountStatus,
    pub balance: Option<Money>,
    pub billing_date: Option<DateTime<Utc>>,
}

impl AccountSnapshot {
    fn is_active(&self) -> bool {
        self.account_status == AccountStatus::Active
    }
}

/// Why an account was flagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyReason {
    /// Active member has no billing date
    MissingBillingDate,
    /// Balance is null; should never happen, schema/migration defect
    NullBalance,
    /// Billing date passed but the member was not charged
    BillingDatePassed,
    /// Billing date is more than one period in the future
    BillingDateTooFar,
}

impl AnomalyReason {
    pub fn message(&self) -> &'static str {
        match self {
            AnomalyReason::MissingBillingDate => "active member has no billing date",
            AnomalyReason::NullBalance => "balance is null (should never happen)",
            AnomalyReason::BillingDatePassed => "billing date passed but member was not charged",
            AnomalyReason::BillingDateTooFar => {
                "billing date is more than one period in the future"
            }
        }
    }
}

/// How urgently an anomaly needs attention
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Critical,
}

/// One detected invariant violation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anomaly {
    pub member_id: MemberId,
    pub member_number: Option<MemberNumber>,
    pub reason: AnomalyReason,
    pub severity: Severity,
    pub detected_at: DateTime<Utc>,
}

/// The sweep engine
#[derive(Debug, Clone)]
pub struct LedgerAuditor {
    period: BillingPeriod,
}

impl LedgerAuditor {
    pub fn new(period: BillingPeriod) -> Self {
        Self { period }
    }

    /// Evaluates every snapshot and returns all matching anomalies
    ///
    /// Each predicate is independent; an account can be reported more than
    /// once for distinct reasons.
    pub fn sweep(&self, snapshots: &[AccountSnapshot], now: DateTime<Utc>) -> Vec<Anomaly> {
        let mut anomalies = Vec::new();

        for snapshot in snapshots {
            for reason in self.check(snapshot, now) {
                let severity = match reason {
                    AnomalyReason::NullBalance => Severity::Critical,
                    _ => Severity::Warning,
                };

                warn!(
                    member = %snapshot.member_id,
                    reason = reason.message(),
                    "ledger anomaly detected"
                );

                anomalies.push(Anomaly {
                    member_id: snapshot.member_id,
                    member_number: snapshot.member_number,
                    reason,
                    severity,
                    detected_at: now,
                });
            }
        }

        anomalies
    }

    fn check(&self, snapshot: &AccountSnapshot, now: DateTime<Utc>) -> Vec<AnomalyReason> {
        let mut reasons = Vec::new();

        if snapshot.balance.is_none() {
            reasons.push(AnomalyReason::NullBalance);
        }

        match snapshot.billing_date {
            None => {
                if snapshot.is_active() {
                    reasons.push(AnomalyReason::MissingBillingDate);
                }
            }
            Some(billing_date) => {
                if snapshot.is_active() && billing_date < now {
                    reasons.push(AnomalyReason::BillingDatePassed);
                }
                if billing_date > self.period.advance(now) {
                    reasons.push(AnomalyReason::BillingDateTooFar);
                }
            }
        }

        reasons
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn active_snapshot(
        balance: Option<Money>,
        billing_date: Option<DateTime<Utc>>,
    ) -> AccountSnapshot {
        AccountSnapshot {
            member_id: MemberId::new(),
            member_number: Some(MemberNumber::from_sequence(1).unwrap()),
            registration_status: RegistrationStatus::Approved,
            account_status: AccountStatus::Active,
            balance,
            billing_date,
        }
    }

    fn auditor() -> LedgerAuditor {
        LedgerAuditor::new(BillingPeriod::monthly())
    }

    #[test]
    fn test_active_without_billing_date_is_flagged_once() {
        let now = Utc::now();
        let snapshots = vec![active_snapshot(Some(Money::new(dec!(-100))), None)];

        let anomalies = auditor().sweep(&snapshots, now);

        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].reason, AnomalyReason::MissingBillingDate);
        assert_eq!(anomalies[0].severity, Severity::Warning);
    }

    #[test]
    fn test_null_balance_is_critical() {
        let now = Utc::now();
        let snapshots = vec![active_snapshot(None, Some(now + Duration::days(10)))];

        let anomalies = auditor().sweep(&snapshots, now);

        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].reason, AnomalyReason::NullBalance);
        assert_eq!(anomalies[0].severity, Severity::Critical);
    }

    #[test]
    fn test_billing_date_forty_days_past_is_uncharged() {
        let now = Utc::now();
        let snapshots = vec![active_snapshot(
            Some(Money::new(dec!(-100))),
            Some(now - Duration::days(40)),
        )];

        let anomalies = auditor().sweep(&snapshots, now);

        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].reason, AnomalyReason::BillingDatePassed);
    }

    #[test]
    fn test_billing_date_within_one_period_is_healthy() {
        let now = Utc::now();
        let snapshots = vec![active_snapshot(
            Some(Money::new(dec!(-100))),
            Some(now + Duration::days(10)),
        )];

        assert!(auditor().sweep(&snapshots, now).is_empty());
    }

    #[test]
    fn test_billing_date_beyond_one_period_is_overscheduled() {
        let now = Utc::now();
        let snapshots = vec![active_snapshot(
            Some(Money::zero()),
            Some(now + Duration::days(45)),
        )];

        let anomalies = auditor().sweep(&snapshots, now);

        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].reason, AnomalyReason::BillingDateTooFar);
    }

    #[test]
    fn test_inactive_account_without_billing_date_is_not_flagged() {
        let now = Utc::now();
        let mut snapshot = active_snapshot(Some(Money::zero()), None);
        snapshot.account_status = AccountStatus::Inactive;
        snapshot.registration_status = RegistrationStatus::Rejected;

        assert!(auditor().sweep(&[snapshot], now).is_empty());
    }

    #[test]
    fn test_multiple_reasons_reported_together() {
        let now = Utc::now();
        let snapshots = vec![active_snapshot(None, Some(now - Duration::days(5)))];

        let anomalies = auditor().sweep(&snapshots, now);
        let reasons: Vec<_> = anomalies.iter().map(|a| a.reason).collect();

        assert!(reasons.contains(&AnomalyReason::NullBalance));
        assert!(reasons.contains(&AnomalyReason::BillingDatePassed));
    }

    #[test]
    fn test_sweep_never_mutates() {
        let now = Utc::now();
        let snapshots = vec![active_snapshot(Some(Money::new(dec!(-100))), None)];
        let before = serde_json::to_string(&snapshots).unwrap();

        let _ = auditor().sweep(&snapshots, now);

        assert_eq!(serde_json::to_string(&snapshots).unwrap(), before);
    }
}
