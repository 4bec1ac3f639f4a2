//! Request handlers

pub mod audit;
pub mod health;
pub mod members;
pub mod payments;

use crate::auth::{has_role, Claims};
use crate::error::ApiError;

/// Refuses the request unless the caller holds the permission
pub(crate) fn require(claims: &Claims, permission: &str) -> Result<(), ApiError> {
    if has_role(claims, permission) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!(
            "missing permission: {}",
            permission
        )))
    }
}
