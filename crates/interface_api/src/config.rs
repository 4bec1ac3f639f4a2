//! API configuration

use rust_decimal::Decimal;
use serde::Deserialize;

use core_kernel::{BillingPeriod, CoreError, Money, TemporalError, Timezone};

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// Database URL
    pub database_url: String,
    /// Log level
    pub log_level: String,
    /// Recurring charge per billing period
    pub period_charge: Decimal,
    /// Billing cycle length in days
    pub billing_period_days: i64,
    /// IANA timezone billing dates are normalized in
    pub timezone: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            database_url: "postgres://localhost/welfare_ledger".to_string(),
            log_level: "info".to_string(),
            period_charge: Decimal::new(100, 0),
            billing_period_days: 30,
            timezone: "Africa/Nairobi".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The validated recurring period charge
    pub fn period_charge(&self) -> Result<Money, CoreError> {
        Money::positive(self.period_charge).map_err(CoreError::from)
    }

    /// The validated billing cycle length
    pub fn billing_period(&self) -> Result<BillingPeriod, CoreError> {
        BillingPeriod::from_days(self.billing_period_days).map_err(CoreError::from)
    }

    /// The validated billing timezone
    pub fn billing_timezone(&self) -> Result<Timezone, CoreError> {
        self.timezone
            .parse::<chrono_tz::Tz>()
            .map(Timezone::new)
            .map_err(|_| TemporalError::InvalidTimezone(self.timezone.clone()).into())
    }
}
