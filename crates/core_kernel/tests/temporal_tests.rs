//! Comprehensive unit tests for the Temporal module
//!
//! Tests cover BillingPeriod arithmetic and Timezone normalization.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use core_kernel::temporal::TemporalError;
use core_kernel::{BillingPeriod, Timezone};

mod billing_period {
    use super::*;

    #[test]
    fn test_from_days_validates_lower_bound() {
        assert!(BillingPeriod::from_days(1).is_ok());
        assert_eq!(
            BillingPeriod::from_days(0),
            Err(TemporalError::InvalidPeriod(0))
        );
        assert_eq!(
            BillingPeriod::from_days(-7),
            Err(TemporalError::InvalidPeriod(-7))
        );
    }

    #[test]
    fn test_monthly_is_thirty_days() {
        assert_eq!(BillingPeriod::monthly().days(), 30);
        assert_eq!(BillingPeriod::default(), BillingPeriod::monthly());
    }

    #[test]
    fn test_advance_moves_one_period_forward() {
        let period = BillingPeriod::from_days(7).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        assert_eq!(
            period.advance(start),
            Utc.with_ymd_and_hms(2024, 3, 8, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_advance_preserves_time_of_day() {
        // Subsequent charges advance the stored instant as-is; only the first
        // billing date is normalized.
        let period = BillingPeriod::monthly();
        let midnight = Utc.with_ymd_and_hms(2024, 1, 31, 21, 0, 0).unwrap();
        assert_eq!(period.advance(midnight).time(), midnight.time());
    }
}

mod timezone {
    use super::*;

    #[test]
    fn test_default_is_nairobi() {
        let tz = Timezone::default();
        assert_eq!(tz.0, chrono_tz::Africa::Nairobi);
    }

    #[test]
    fn test_start_of_day_in_local_timezone() {
        let tz = Timezone::default();
        let date = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let start = tz.start_of_day(date);

        // Nairobi is UTC+3, so local midnight is 21:00 the previous UTC day
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 5, 9, 21, 0, 0).unwrap());
    }

    #[test]
    fn test_first_billing_date_normalized_to_local_midnight() {
        let tz = Timezone::default();
        let period = BillingPeriod::monthly();
        let approved_at = Utc.with_ymd_and_hms(2024, 2, 1, 10, 30, 0).unwrap();

        let billing = period.first_billing_date(approved_at, &tz);
        let local = tz.to_local(billing);

        assert_eq!(local.time(), NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        assert_eq!(
            local.date_naive(),
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let tz = Timezone::default();
        let json = serde_json::to_string(&tz).unwrap();
        assert_eq!(json, "\"Africa/Nairobi\"");

        let back: Timezone = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tz);
    }
}
