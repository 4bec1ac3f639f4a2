//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for common ledger entities. These
//! fixtures are designed to be consistent and predictable for unit tests.

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::{BillingPeriod, MemberId, MemberNumber, Money, Timezone, UserId};
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// The standard monthly charge used across the test suite
    pub fn period_charge() -> Money {
        Money::new(dec!(100.00))
    }

    /// A payment that covers part of one period's due
    pub fn partial_payment() -> Money {
        Money::new(dec!(70.00))
    }

    /// A payment that settles one period's due and leaves credit
    pub fn overpayment() -> Money {
        Money::new(dec!(140.00))
    }

    /// A year of prepaid contributions at the standard charge
    pub fn annual_prepayment() -> Money {
        Money::new(dec!(1200.00))
    }

    /// A balance one period in arrears, as set at approval
    pub fn opening_balance() -> Money {
        Money::new(dec!(-100.00))
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// A fixed approval instant, mid-afternoon local time
    pub fn approval_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 13, 30, 0).unwrap()
    }

    /// A billing date well in the past, for uncharged-member scenarios
    pub fn stale_billing_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 11, 1, 0, 0, 0).unwrap()
    }

    /// The standard monthly cycle
    pub fn monthly() -> BillingPeriod {
        BillingPeriod::monthly()
    }

    /// The organization's timezone
    pub fn timezone() -> Timezone {
        Timezone::default()
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    /// Creates a deterministic member ID for testing
    pub fn member_id() -> MemberId {
        MemberId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440001").unwrap())
    }

    /// Creates a deterministic user ID for testing
    pub fn user_id() -> UserId {
        UserId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440002").unwrap())
    }

    /// Creates a deterministic admin user ID for testing
    pub fn admin_id() -> UserId {
        UserId::from_uuid(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440003").unwrap())
    }

    /// The first member number ever assigned
    pub fn first_member_number() -> MemberNumber {
        MemberNumber::from_sequence(1).unwrap()
    }
}

/// Fixture for string test data
pub struct StringFixtures;

impl StringFixtures {
    /// A Kenyan mobile number in the format registrations arrive with
    pub fn phone_number() -> &'static str {
        "+254712345678"
    }

    /// A second distinct phone number
    pub fn other_phone_number() -> &'static str {
        "+254722000111"
    }

    /// A plausible member name
    pub fn full_name() -> &'static str {
        "Wanjiku Kamau"
    }

    /// A mobile-money receipt code
    pub fn receipt() -> &'static str {
        "SBK4H7ZQ10"
    }

    /// A manual reference for cash entries
    pub fn reference() -> &'static str {
        "RCPT-2024-0042"
    }
}
