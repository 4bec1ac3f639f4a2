//! HTTP API Layer
//!
//! This crate provides the REST API for the welfare ledger using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Registration, approval, payments, billing, and audit
//! - **Middleware**: Authentication, audit logging, tracing
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Domain taxonomy mapped onto HTTP statuses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(pool, config)?;
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use core_kernel::CoreError;
use domain_ledger::approval::ApprovalEngine;
use domain_ledger::audit::LedgerAuditor;
use domain_ledger::billing::BillingEngine;
use infra_db::{MemberRepository, RetryPolicy};

use crate::config::ApiConfig;
use crate::handlers::{audit, health, members, payments};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: ApiConfig,
    pub members: MemberRepository,
    pub approval: ApprovalEngine,
    pub billing: BillingEngine,
    pub auditor: LedgerAuditor,
    pub retry: RetryPolicy,
}

impl AppState {
    /// Builds the shared state, validating the ledger settings up front
    pub fn new(pool: PgPool, config: ApiConfig) -> Result<Self, CoreError> {
        let period_charge = config.period_charge()?;
        let period = config.billing_period()?;
        let timezone = config.billing_timezone()?;

        Ok(Self {
            members: MemberRepository::new(pool.clone()),
            approval: ApprovalEngine::new(period_charge, period, timezone),
            billing: BillingEngine::new(period_charge, period),
            auditor: LedgerAuditor::new(period),
            retry: RetryPolicy::default(),
            pool,
            config,
        })
    }
}

/// Creates the main API router
///
/// Fails only if the configured ledger settings (period charge, cycle
/// length, timezone) do not validate.
pub fn create_router(pool: PgPool, config: ApiConfig) -> Result<Router, CoreError> {
    let state = AppState::new(pool, config)?;

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Member routes
    let member_routes = Router::new()
        .route("/", post(members::register))
        .route("/pending", get(members::list_pending))
        .route("/:id", get(members::get_member))
        .route("/:id/approve", post(members::approve))
        .route("/:id/reject", post(members::reject))
        .route("/:id/approvals", get(members::approval_history))
        .route("/:id/payments", post(payments::record_payment))
        .route("/:id/contributions", get(payments::list_contributions));

    // Payment callback routes
    let payment_routes =
        Router::new().route("/mobile-money", post(payments::confirm_mobile_money));

    // Billing and audit routes
    let billing_routes = Router::new().route("/run", post(audit::run_billing));
    let audit_routes = Router::new().route("/sweep", get(audit::sweep));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/members", member_routes)
        .nest("/payments", payment_routes)
        .nest("/billing", billing_routes)
        .nest("/audit", audit_routes)
        .layer(axum_middleware::from_fn_with_state(state.clone(), audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Ok(Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state))
}
