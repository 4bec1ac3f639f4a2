//! Authentication and authorization
//!
//! Tokens are issued by `create_token` (used by operational tooling and
//! tests) and validated on every protected request. Role checks happen in
//! handlers; the admin capability additionally flows into the domain as an
//! [`Actor`], so approval decisions are guarded twice: at the route and
//! inside the engine.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use core_kernel::UserId;
use domain_ledger::account::Actor;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User's roles
    pub roles: Vec<String>,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

/// Auth errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Missing permission: {0}")]
    MissingPermission(String),
}

/// Creates a new JWT token
///
/// # Arguments
///
/// * `user_id` - User identifier
/// * `roles` - User's roles
/// * `secret` - JWT secret key
/// * `expiration_secs` - Token validity in seconds
pub fn create_token(
    user_id: &str,
    roles: Vec<String>,
    secret: &str,
    expiration_secs: u64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(expiration_secs as i64);

    let claims = Claims {
        sub: user_id.to_string(),
        roles,
        exp: exp.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Validates a JWT token
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        if e.to_string().contains("ExpiredSignature") {
            AuthError::TokenExpired
        } else {
            AuthError::InvalidToken
        }
    })?;

    Ok(token_data.claims)
}

/// Checks if user has required role
pub fn has_role(claims: &Claims, required_role: &str) -> bool {
    claims.roles.iter().any(|r| r == required_role || r == "admin")
}

/// Builds the domain actor for the authenticated caller
pub fn actor_from_claims(claims: &Claims) -> Result<Actor, AuthError> {
    let user_id: UserId = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

    if claims.roles.iter().any(|r| r == "admin") {
        Ok(Actor::admin(user_id))
    } else {
        Ok(Actor::member(user_id))
    }
}

/// Permission definitions
pub mod permissions {
    pub const MEMBER_READ: &str = "member:read";
    pub const MEMBER_REGISTER: &str = "member:register";
    pub const MEMBER_APPROVE: &str = "member:approve";
    pub const PAYMENT_RECORD: &str = "payment:record";
    pub const PAYMENT_CONFIRM: &str = "payment:confirm";
    pub const LEDGER_AUDIT: &str = "ledger:audit";
    pub const BILLING_RUN: &str = "billing:run";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let user = UserId::new();
        let token = create_token(
            &user.to_string(),
            vec!["member:read".to_string()],
            "secret",
            60,
        )
        .unwrap();

        let claims = validate_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, user.to_string());
        assert!(has_role(&claims, "member:read"));
        assert!(!has_role(&claims, permissions::MEMBER_APPROVE));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = create_token("USR-x", vec![], "secret", 60).unwrap();
        assert!(matches!(
            validate_token(&token, "other"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_admin_role_implies_everything() {
        let claims = Claims {
            sub: UserId::new().to_string(),
            roles: vec!["admin".to_string()],
            exp: 0,
            iat: 0,
        };

        assert!(has_role(&claims, permissions::MEMBER_APPROVE));
        assert!(actor_from_claims(&claims).unwrap().admin);
    }

    #[test]
    fn test_member_claims_produce_non_admin_actor() {
        let claims = Claims {
            sub: UserId::new().to_string(),
            roles: vec![permissions::MEMBER_READ.to_string()],
            exp: 0,
            iat: 0,
        };

        let actor = actor_from_claims(&claims).unwrap();
        assert!(!actor.admin);
        assert!(actor.ensure_admin().is_err());
    }
}
