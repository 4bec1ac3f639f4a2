//! Comprehensive unit tests for the Money module
//!
//! Tests cover money creation, arithmetic operations, signed-balance
//! projections, and edge cases.

use core_kernel::{Money, MoneyError};
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_creates_money_with_correct_amount() {
        let m = Money::new(dec!(100.50));
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_new_rounds_to_two_decimal_places() {
        let m = Money::new(dec!(100.123456789));
        assert_eq!(m.amount(), dec!(100.12));
    }

    #[test]
    fn test_from_minor_converts_cents_correctly() {
        let m = Money::from_minor(10050);
        assert_eq!(m.amount(), dec!(100.50));
    }

    #[test]
    fn test_zero_creates_zero_amount() {
        let m = Money::zero();
        assert!(m.is_zero());
    }

    #[test]
    fn test_negative_amount_creation() {
        let m = Money::new(dec!(-100.00));
        assert!(m.is_negative());
        assert_eq!(m.amount(), dec!(-100.00));
    }

    #[test]
    fn test_positive_rejects_zero_and_negative() {
        assert!(Money::positive(dec!(0.01)).is_ok());
        assert!(matches!(
            Money::positive(dec!(0)),
            Err(MoneyError::NonPositive(_))
        ));
        assert!(matches!(
            Money::positive(dec!(-1)),
            Err(MoneyError::NonPositive(_))
        ));
    }
}

mod predicates {
    use super::*;

    #[test]
    fn test_is_zero_true_for_zero_amount() {
        assert!(Money::zero().is_zero());
    }

    #[test]
    fn test_is_positive_excludes_zero() {
        assert!(Money::new(dec!(0.01)).is_positive());
        assert!(!Money::zero().is_positive());
        assert!(!Money::new(dec!(-0.01)).is_positive());
    }

    #[test]
    fn test_is_negative_excludes_zero() {
        assert!(Money::new(dec!(-0.01)).is_negative());
        assert!(!Money::zero().is_negative());
    }

    #[test]
    fn test_ordering() {
        assert!(Money::new(dec!(-100)) < Money::zero());
        assert!(Money::zero() < Money::new(dec!(100)));
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_addition() {
        let result = Money::new(dec!(100)) + Money::new(dec!(50.25));
        assert_eq!(result.amount(), dec!(150.25));
    }

    #[test]
    fn test_subtraction_can_go_negative() {
        let result = Money::new(dec!(30)) - Money::new(dec!(100));
        assert_eq!(result.amount(), dec!(-70));
    }

    #[test]
    fn test_add_assign() {
        let mut balance = Money::new(dec!(-100));
        balance += Money::new(dec!(70));
        assert_eq!(balance.amount(), dec!(-30));
    }

    #[test]
    fn test_sub_assign() {
        let mut balance = Money::new(dec!(10));
        balance -= Money::new(dec!(100));
        assert_eq!(balance.amount(), dec!(-90));
    }

    #[test]
    fn test_negation() {
        assert_eq!((-Money::new(dec!(100))).amount(), dec!(-100));
    }

    #[test]
    fn test_abs() {
        assert_eq!(Money::new(dec!(-42.50)).abs().amount(), dec!(42.50));
    }

    #[test]
    fn test_min_of_two() {
        let payment = Money::new(dec!(70));
        let due = Money::new(dec!(100));
        assert_eq!(payment.min(due), payment);
    }

    #[test]
    fn test_exact_decimal_no_representation_error() {
        // 0.1 + 0.2 must be exactly 0.3, never 0.30000000000000004
        let result = Money::new(dec!(0.1)) + Money::new(dec!(0.2));
        assert_eq!(result.amount(), dec!(0.3));
    }
}

mod projections {
    use super::*;

    #[test]
    fn test_due_from_negative_balance() {
        let balance = Money::new(dec!(-100));
        assert_eq!(balance.due().amount(), dec!(100));
        assert!(balance.credit().is_zero());
    }

    #[test]
    fn test_credit_from_positive_balance() {
        let balance = Money::new(dec!(10));
        assert!(balance.due().is_zero());
        assert_eq!(balance.credit().amount(), dec!(10));
    }

    #[test]
    fn test_settled_balance_has_neither() {
        let balance = Money::zero();
        assert!(balance.due().is_zero());
        assert!(balance.credit().is_zero());
    }
}
