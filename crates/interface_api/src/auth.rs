//! Authentication and authorization
//!
//! Bearer JWTs identify the caller and carry their roles. Admin actions that
//! change state or call out to the CRM also need a nonce: a short-lived token
//! bound to the caller and to one action, minted by `GET /admin/nonce`.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

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

/// Claims of an action nonce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NonceClaims {
    pub sub: String,
    /// The action this nonce authorizes
    pub action: String,
    pub exp: i64,
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
    #[error("Invalid nonce")]
    InvalidNonce,
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
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

/// Checks if user has required role
pub fn has_role(claims: &Claims, required_role: &str) -> bool {
    claims.roles.iter().any(|r| r == required_role || r == roles::ADMIN)
}

/// Fails with `MissingPermission` unless the caller has the role
pub fn require_role(claims: &Claims, required_role: &str) -> Result<(), AuthError> {
    if has_role(claims, required_role) {
        Ok(())
    } else {
        Err(AuthError::MissingPermission(required_role.to_string()))
    }
}

/// Mints a nonce for `action`, bound to the caller
pub fn create_nonce(
    user_id: &str,
    action: &str,
    secret: &str,
    ttl_secs: u64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = NonceClaims {
        sub: user_id.to_string(),
        action: action.to_string(),
        exp: (now + Duration::seconds(ttl_secs as i64)).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

/// Checks that `nonce` was minted for this caller and this action
pub fn verify_nonce(nonce: &str, user_id: &str, action: &str, secret: &str) -> Result<(), AuthError> {
    let data = decode::<NonceClaims>(
        nonce,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AuthError::InvalidNonce)?;

    if data.claims.sub != user_id || data.claims.action != action {
        return Err(AuthError::InvalidNonce);
    }
    Ok(())
}

/// Role definitions
pub mod roles {
    /// Implies every other role
    pub const ADMIN: &str = "admin";
    /// May read and change the integration settings
    pub const MANAGE_OPTIONS: &str = "manage_options";
    /// The host form framework, delivering submissions
    pub const FORM_HOST: &str = "form_host";
}

/// Nonce-protected admin actions
pub mod actions {
    pub const SAVE_SETTINGS: &str = "save_settings";
    pub const TEST_CONNECTION: &str = "test_connection";

    pub const ALL: [&str; 2] = [SAVE_SETTINGS, TEST_CONNECTION];
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_round_trip() {
        let token = create_token("u1", vec![roles::MANAGE_OPTIONS.to_string()], SECRET, 60).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();

        assert_eq!(claims.sub, "u1");
        assert!(has_role(&claims, roles::MANAGE_OPTIONS));
        assert!(!has_role(&claims, roles::FORM_HOST));
    }

    #[test]
    fn test_admin_implies_every_role() {
        let token = create_token("root", vec![roles::ADMIN.to_string()], SECRET, 60).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();

        assert!(require_role(&claims, roles::FORM_HOST).is_ok());
        assert!(require_role(&claims, roles::MANAGE_OPTIONS).is_ok());
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = create_token("u1", vec![], SECRET, 60).unwrap();
        assert!(matches!(validate_token(&token, "other"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_nonce_bound_to_user_and_action() {
        let nonce = create_nonce("u1", actions::TEST_CONNECTION, SECRET, 60).unwrap();

        assert!(verify_nonce(&nonce, "u1", actions::TEST_CONNECTION, SECRET).is_ok());
        assert!(verify_nonce(&nonce, "u2", actions::TEST_CONNECTION, SECRET).is_err());
        assert!(verify_nonce(&nonce, "u1", actions::SAVE_SETTINGS, SECRET).is_err());
    }

    #[test]
    fn test_access_token_is_not_a_nonce() {
        let token = create_token("u1", vec![roles::ADMIN.to_string()], SECRET, 60).unwrap();
        assert!(verify_nonce(&token, "u1", actions::TEST_CONNECTION, SECRET).is_err());
    }
}
