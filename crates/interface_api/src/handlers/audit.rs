//! Ledger health and billing-run handlers

use axum::{extract::State, Extension, Json};
use chrono::Utc;

use crate::auth::{permissions, Claims};
use crate::dto::audit::{AnomalyResponse, BillingRunResponse, SweepResponse};
use crate::error::ApiError;
use crate::handlers::require;
use crate::AppState;

/// Sweeps every member account and reports invariant violations
///
/// Read-only: snapshots are taken without locks and nothing is corrected.
pub async fn sweep(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<SweepResponse>, ApiError> {
    require(&claims, permissions::LEDGER_AUDIT)?;

    let now = Utc::now();
    let snapshots = state.members.snapshots().await?;
    let anomalies = state.auditor.sweep(&snapshots, now);

    Ok(Json(SweepResponse {
        swept_at: now,
        anomaly_count: anomalies.len(),
        anomalies: anomalies.iter().map(AnomalyResponse::from).collect(),
    }))
}

/// Charges every active member whose billing date has arrived
///
/// Intended to be hit by the scheduler; safe to re-run, even concurrently:
/// each member's due date is re-checked under its row lock, so a member
/// another run already charged is skipped.
pub async fn run_billing(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<BillingRunResponse>, ApiError> {
    require(&claims, permissions::BILLING_RUN)?;

    let summary = state.members.run_billing(&state.billing, Utc::now()).await?;
    Ok(Json(BillingRunResponse::from(&summary)))
}
