//! Payment handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use core_kernel::{MemberId, Money};
use infra_db::{with_retry, ExternalPaymentResult};

use crate::auth::{actor_from_claims, permissions, Claims};
use crate::dto::payments::{
    ConfirmationResponse, ContributionResponse, MobileMoneyConfirmation, PaymentResponse,
    RecordPaymentRequest,
};
use crate::error::ApiError;
use crate::handlers::require;
use crate::AppState;

/// Records a staff-entered payment against a member's ledger
///
/// Settles outstanding due first; any remainder becomes prepaid credit. The
/// balance move and the contribution fact commit together.
pub async fn record_payment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(request): Json<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>), ApiError> {
    require(&claims, permissions::PAYMENT_RECORD)?;
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let actor = actor_from_claims(&claims).map_err(|_| ApiError::Unauthorized)?;
    let amount =
        Money::positive(request.amount).map_err(|e| ApiError::Validation(e.to_string()))?;
    let member_id = MemberId::from(id);

    let recorded = with_retry(state.retry, "record_payment", || {
        state.members.record_payment(
            member_id,
            amount,
            request.category.into(),
            request.method.into(),
            actor.user_id,
            request.reference.clone(),
        )
    })
    .await?;

    Ok((StatusCode::CREATED, Json(PaymentResponse::from(&recorded))))
}

/// Confirms a mobile-money payment callback
///
/// Callbacks are delivered at-least-once; a receipt seen before is
/// acknowledged as a duplicate without moving the balance, so the gateway
/// stops retrying.
pub async fn confirm_mobile_money(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(confirmation): Json<MobileMoneyConfirmation>,
) -> Result<Json<ConfirmationResponse>, ApiError> {
    require(&claims, permissions::PAYMENT_CONFIRM)?;
    confirmation
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let actor = actor_from_claims(&claims).map_err(|_| ApiError::Unauthorized)?;
    let amount =
        Money::positive(confirmation.amount).map_err(|e| ApiError::Validation(e.to_string()))?;

    let result = with_retry(state.retry, "confirm_mobile_money", || {
        state.members.record_external_payment(
            confirmation.member_id,
            amount,
            &confirmation.receipt,
            actor.user_id,
        )
    })
    .await?;

    let response = match result {
        ExternalPaymentResult::Applied(recorded) => {
            ConfirmationResponse::Applied(PaymentResponse::from(&recorded))
        }
        ExternalPaymentResult::Duplicate => ConfirmationResponse::Duplicate,
    };

    Ok(Json(response))
}

/// Lists a member's contribution trail
pub async fn list_contributions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ContributionResponse>>, ApiError> {
    require(&claims, permissions::MEMBER_READ)?;

    let contributions = state.members.contributions(MemberId::from(id)).await?;
    Ok(Json(
        contributions.iter().map(ContributionResponse::from).collect(),
    ))
}
