//! Health auditor and billing-run DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;

use core_kernel::MemberId;
use domain_ledger::audit::{Anomaly, Severity};
use infra_db::BillingRunSummary;

#[derive(Debug, Serialize)]
pub struct AnomalyResponse {
    pub member_id: MemberId,
    pub member_number: Option<String>,
    pub reason: String,
    pub severity: String,
    pub message: String,
    pub detected_at: DateTime<Utc>,
}

impl From<&Anomaly> for AnomalyResponse {
    fn from(anomaly: &Anomaly) -> Self {
        let severity = match anomaly.severity {
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        };
        Self {
            member_id: anomaly.member_id,
            member_number: anomaly.member_number.map(|n| n.to_string()),
            reason: serde_variant_name(&anomaly.reason),
            severity: severity.to_string(),
            message: anomaly.reason.message().to_string(),
            detected_at: anomaly.detected_at,
        }
    }
}

// The reason enum already serializes as snake_case; reuse that name
fn serde_variant_name(reason: &domain_ledger::audit::AnomalyReason) -> String {
    serde_json::to_value(reason)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| format!("{:?}", reason))
}

#[derive(Debug, Serialize)]
pub struct SweepResponse {
    pub swept_at: DateTime<Utc>,
    pub anomaly_count: usize,
    pub anomalies: Vec<AnomalyResponse>,
}

#[derive(Debug, Serialize)]
pub struct BillingRunResponse {
    pub run_at: DateTime<Utc>,
    pub charged: u32,
    pub failures: Vec<BillingFailure>,
}

#[derive(Debug, Serialize)]
pub struct BillingFailure {
    pub member_id: MemberId,
    pub error: String,
}

impl From<&BillingRunSummary> for BillingRunResponse {
    fn from(summary: &BillingRunSummary) -> Self {
        Self {
            run_at: summary.run_at,
            charged: summary.charged,
            failures: summary
                .failed
                .iter()
                .map(|(member_id, error)| BillingFailure {
                    member_id: *member_id,
                    error: error.clone(),
                })
                .collect(),
        }
    }
}
