//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for ledger types that give more
//! meaningful error messages than standard assertions.

use core_kernel::{MemberId, Money};
use domain_ledger::audit::{Anomaly, AnomalyReason};

/// Asserts that a Money value is strictly positive
pub fn assert_money_positive(money: &Money) {
    assert!(
        money.is_positive(),
        "Expected positive money, got {}",
        money.amount()
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(
        money.is_zero(),
        "Expected zero money, got {}",
        money.amount()
    );
}

/// Asserts that a Money value is strictly negative
pub fn assert_money_negative(money: &Money) {
    assert!(
        money.is_negative(),
        "Expected negative money, got {}",
        money.amount()
    );
}

/// Asserts the two-bucket invariant: due and credit are never both positive
pub fn assert_buckets_exclusive(balance: &Money) {
    let due = balance.due();
    let credit = balance.credit();

    assert!(
        due.is_zero() || credit.is_zero(),
        "Balance {} projects due {} and credit {} simultaneously",
        balance.amount(),
        due.amount(),
        credit.amount()
    );
}

/// Asserts that a sweep flagged a member for a specific reason
pub fn assert_anomaly_reported(anomalies: &[Anomaly], member_id: MemberId, reason: AnomalyReason) {
    assert!(
        anomalies
            .iter()
            .any(|a| a.member_id == member_id && a.reason == reason),
        "Expected anomaly {:?} for member {}, got {:?}",
        reason,
        member_id,
        anomalies
            .iter()
            .map(|a| (a.member_id, a.reason))
            .collect::<Vec<_>>()
    );
}

/// Asserts that a sweep did not flag a member at all
pub fn assert_member_healthy(anomalies: &[Anomaly], member_id: MemberId) {
    let reported: Vec<_> = anomalies
        .iter()
        .filter(|a| a.member_id == member_id)
        .map(|a| a.reason)
        .collect();

    assert!(
        reported.is_empty(),
        "Expected member {} to be healthy, got {:?}",
        member_id,
        reported
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_bucket_exclusivity_holds_for_any_sign() {
        assert_buckets_exclusive(&Money::new(dec!(-250)));
        assert_buckets_exclusive(&Money::zero());
        assert_buckets_exclusive(&Money::new(dec!(40)));
    }

    #[test]
    #[should_panic(expected = "Expected positive money")]
    fn test_positive_assertion_panics_on_zero() {
        assert_money_zero(&Money::zero());
        assert_money_positive(&Money::zero());
    }
}
