//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data that
//! maintains ledger invariants.

use chrono::{DateTime, Duration, TimeZone, Utc};
use core_kernel::{BillingPeriod, MemberId, MemberNumber, Money, UserId};
use fake::faker::name::en::Name;
use fake::faker::number::en::NumberWithFormat;
use fake::Fake;
use infra_db::NewRegistration;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating positive amounts in minor units (cents)
pub fn positive_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..100_000_000i64
}

/// Strategy for generating signed amounts in minor units
pub fn amount_minor_strategy() -> impl Strategy<Value = i64> {
    -100_000_000i64..100_000_000i64
}

/// Strategy for generating strictly positive Money (payments, charges)
pub fn payment_strategy() -> impl Strategy<Value = Money> {
    positive_amount_minor_strategy().prop_map(Money::from_minor)
}

/// Strategy for generating signed Money (member balances)
pub fn balance_strategy() -> impl Strategy<Value = Money> {
    amount_minor_strategy().prop_map(Money::from_minor)
}

/// Strategy for generating balances in arrears
pub fn arrears_balance_strategy() -> impl Strategy<Value = Money> {
    positive_amount_minor_strategy().prop_map(|minor| -Money::from_minor(minor))
}

/// Strategy for generating plausible billing cycle lengths
pub fn billing_period_strategy() -> impl Strategy<Value = BillingPeriod> {
    (1i64..=366i64).prop_map(|days| BillingPeriod::from_days(days).unwrap())
}

/// Strategy for generating valid member sequence values
pub fn sequence_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000i64
}

/// Strategy for generating member numbers
pub fn member_number_strategy() -> impl Strategy<Value = MemberNumber> {
    sequence_strategy().prop_map(|n| MemberNumber::from_sequence(n).unwrap())
}

/// Strategy for generating member IDs
pub fn member_id_strategy() -> impl Strategy<Value = MemberId> {
    any::<[u8; 16]>().prop_map(|bytes| MemberId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}

/// Strategy for generating user IDs
pub fn user_id_strategy() -> impl Strategy<Value = UserId> {
    any::<[u8; 16]>().prop_map(|bytes| UserId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}

/// A random Kenyan-format mobile number, as registrations arrive with
pub fn fake_phone_number() -> String {
    NumberWithFormat("+2547########").fake()
}

/// A randomized registration payload for repository tests
pub fn fake_registration() -> NewRegistration {
    NewRegistration {
        phone_number: fake_phone_number(),
        full_name: Name().fake(),
    }
}

/// Strategy for generating timestamps within 2024
pub fn timestamp_2024_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..365i64, 0u32..24u32).prop_map(|(days, hours)| {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            + Duration::days(days)
            + Duration::hours(hours as i64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn test_payments_are_always_positive(payment in payment_strategy()) {
            prop_assert!(payment.is_positive());
        }

        #[test]
        fn test_arrears_balances_are_always_negative(balance in arrears_balance_strategy()) {
            prop_assert!(balance.is_negative());
        }

        #[test]
        fn test_generated_balances_project_exclusive_buckets(balance in balance_strategy()) {
            prop_assert!(balance.due().is_zero() || balance.credit().is_zero());
            prop_assert_eq!(balance.credit() - balance.due(), balance);
        }

        #[test]
        fn test_generated_money_is_two_decimal_places(payment in payment_strategy()) {
            prop_assert_eq!(payment.amount(), payment.amount().round_dp(2));
        }

        #[test]
        fn test_member_numbers_parse_back(number in member_number_strategy()) {
            let parsed: MemberNumber = number.to_string().parse().unwrap();
            prop_assert_eq!(parsed, number);
        }
    }

    #[test]
    fn test_fake_registration_has_local_phone_format() {
        let registration = fake_registration();

        assert!(registration.phone_number.starts_with("+2547"));
        assert_eq!(registration.phone_number.len(), 13);
        assert!(!registration.full_name.is_empty());
    }

    #[test]
    fn test_decimal_from_minor_units() {
        let money = Money::from_minor(12345);
        assert_eq!(money.amount(), Decimal::new(12345, 2));
    }
}
