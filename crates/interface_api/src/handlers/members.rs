//! Member registration and approval handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use core_kernel::MemberId;
use infra_db::{with_retry, NewRegistration};

use crate::auth::{actor_from_claims, permissions, Claims};
use crate::dto::members::{
    ApprovalRecordResponse, DecisionResponse, MemberResponse, RegisterMemberRequest,
};
use crate::error::ApiError;
use crate::handlers::require;
use crate::AppState;

/// Submits a new registration
///
/// The account starts pending with a zero balance; nothing is billed until
/// an administrator approves it.
pub async fn register(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<RegisterMemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), ApiError> {
    require(&claims, permissions::MEMBER_REGISTER)?;
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let account = state
        .members
        .register(NewRegistration {
            phone_number: request.phone_number,
            full_name: request.full_name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(MemberResponse::from(&account))))
}

/// Lists registrations awaiting a decision
pub async fn list_pending(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<MemberResponse>>, ApiError> {
    require(&claims, permissions::MEMBER_READ)?;

    let accounts = state.members.list_pending().await?;
    Ok(Json(accounts.iter().map(MemberResponse::from).collect()))
}

/// Gets a member by ID
pub async fn get_member(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<MemberResponse>, ApiError> {
    require(&claims, permissions::MEMBER_READ)?;

    let account = state.members.find_by_id(MemberId::from(id)).await?;
    Ok(Json(MemberResponse::from(&account)))
}

/// Approves a pending registration
///
/// One atomic unit: sequence allocation, member number, opening balance one
/// period in arrears, first billing date, user activation, audit record.
/// Transient conflicts with a concurrent approval are retried a bounded
/// number of times before surfacing as 409.
pub async fn approve(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<DecisionResponse>, ApiError> {
    require(&claims, permissions::MEMBER_APPROVE)?;
    let actor = actor_from_claims(&claims).map_err(|_| ApiError::Unauthorized)?;
    let member_id = MemberId::from(id);

    let outcome = with_retry(state.retry, "approve_registration", || {
        state
            .members
            .approve_registration(member_id, &state.approval, &actor)
    })
    .await?;

    Ok(Json(DecisionResponse {
        member: MemberResponse::from(&outcome.account),
        record: ApprovalRecordResponse::from(&outcome.record),
    }))
}

/// Rejects a pending registration
///
/// No sequence is consumed and no balance is initialized; a resubmission
/// arrives as a brand-new registration.
pub async fn reject(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<DecisionResponse>, ApiError> {
    require(&claims, permissions::MEMBER_APPROVE)?;
    let actor = actor_from_claims(&claims).map_err(|_| ApiError::Unauthorized)?;
    let member_id = MemberId::from(id);

    let outcome = with_retry(state.retry, "reject_registration", || {
        state
            .members
            .reject_registration(member_id, &state.approval, &actor)
    })
    .await?;

    Ok(Json(DecisionResponse {
        member: MemberResponse::from(&outcome.account),
        record: ApprovalRecordResponse::from(&outcome.record),
    }))
}

/// Lists the approval decisions recorded for a member
pub async fn approval_history(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ApprovalRecordResponse>>, ApiError> {
    require(&claims, permissions::MEMBER_READ)?;

    let records = state.members.approval_history(MemberId::from(id)).await?;
    Ok(Json(
        records.iter().map(ApprovalRecordResponse::from).collect(),
    ))
}
