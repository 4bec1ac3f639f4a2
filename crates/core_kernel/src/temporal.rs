//! Billing-cycle temporal types
//!
//! Billing dates are stored in UTC but normalized to the start of day in the
//! organization's local timezone, so the "next charge" instant is stable
//! regardless of what time of day an approval or charge ran.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Billing period must be at least one day, got {0}")]
    InvalidPeriod(i64),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

/// Timezone wrapper for the organization's locale
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Tz::from_str(&s)
            .map(Timezone)
            .map_err(|_| serde::de::Error::custom(format!("Invalid timezone: {}", s)))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Converts a UTC datetime to the local timezone
    pub fn to_local(&self, utc: DateTime<Utc>) -> DateTime<Tz> {
        utc.with_timezone(&self.0)
    }

    /// Gets the start of day (00:00:00) in this timezone as UTC
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        date.and_hms_opt(0, 0, 0)
            .unwrap()
            .and_local_timezone(self.0)
            .single()
            .expect("Invalid timezone conversion")
            .with_timezone(&Utc)
    }

    /// Normalizes an instant to the start of its local day
    pub fn normalize(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        self.start_of_day(self.to_local(instant).date_naive())
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::Africa::Nairobi)
    }
}

/// The recurring billing interval
///
/// Expressed in whole days; the default monthly cycle is 30 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BillingPeriod {
    days: i64,
}

impl BillingPeriod {
    /// Creates a billing period of the given number of days
    pub fn from_days(days: i64) -> Result<Self, TemporalError> {
        if days < 1 {
            return Err(TemporalError::InvalidPeriod(days));
        }
        Ok(Self { days })
    }

    /// The standard monthly cycle
    pub fn monthly() -> Self {
        Self { days: 30 }
    }

    /// Returns the period length in days
    pub fn days(&self) -> i64 {
        self.days
    }

    /// Returns the period as a chrono duration
    pub fn duration(&self) -> Duration {
        Duration::days(self.days)
    }

    /// Advances an instant by one period
    pub fn advance(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        instant + self.duration()
    }

    /// The first billing date after an approval at `now`: one period out,
    /// normalized to start of day
    pub fn first_billing_date(&self, now: DateTime<Utc>, tz: &Timezone) -> DateTime<Utc> {
        tz.normalize(self.advance(now))
    }
}

impl Default for BillingPeriod {
    fn default() -> Self {
        Self::monthly()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_period_validation() {
        assert!(BillingPeriod::from_days(30).is_ok());
        assert_eq!(
            BillingPeriod::from_days(0),
            Err(TemporalError::InvalidPeriod(0))
        );
    }

    #[test]
    fn test_monthly_default() {
        assert_eq!(BillingPeriod::default().days(), 30);
    }

    #[test]
    fn test_advance() {
        let period = BillingPeriod::monthly();
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let next = period.advance(start);
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_first_billing_date_is_start_of_day() {
        let period = BillingPeriod::monthly();
        let tz = Timezone::default();
        let approved_at = Utc.with_ymd_and_hms(2024, 1, 1, 15, 42, 10).unwrap();

        let billing = period.first_billing_date(approved_at, &tz);
        let local = tz.to_local(billing);

        assert_eq!(local.time(), chrono::NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        assert_eq!(local.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let tz = Timezone::default();
        let instant = Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 0).unwrap();
        let normalized = tz.normalize(instant);
        assert_eq!(tz.normalize(normalized), normalized);
    }
}
