//! Admin action handlers: nonces and the connection test

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Extension, Json,
};
use tracing::{info, warn};

use crate::auth::{actions, create_nonce, has_role, require_role, roles, verify_nonce, Claims};
use crate::dto::admin::*;
use crate::error::ApiError;
use crate::AppState;

/// Header carrying an action nonce
pub const NONCE_HEADER: &str = "x-admin-nonce";

pub(crate) fn nonce_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(NONCE_HEADER).and_then(|v| v.to_str().ok())
}

/// Mints a nonce for one admin action
pub async fn issue_nonce(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<NonceQuery>,
) -> Result<Json<NonceResponse>, ApiError> {
    require_role(&claims, roles::MANAGE_OPTIONS)?;
    if !actions::ALL.contains(&query.action.as_str()) {
        return Err(ApiError::BadRequest(format!("Unknown action: {}", query.action)));
    }

    let ttl = state.config.nonce_ttl_secs;
    let nonce = create_nonce(&claims.sub, &query.action, &state.config.jwt_secret, ttl)?;

    Ok(Json(NonceResponse {
        nonce,
        action: query.action,
        expires_in: ttl,
    }))
}

/// Tests the stored CRM token
///
/// Always answers 200 with the `{success, data: {message}}` envelope; a
/// denied caller gets `success: false` and the permission message.
pub async fn test_connection(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    headers: HeaderMap,
) -> Json<AjaxResponse> {
    let authorized = has_role(&claims, roles::MANAGE_OPTIONS)
        && nonce_header(&headers)
            .map(|nonce| {
                verify_nonce(nonce, &claims.sub, actions::TEST_CONNECTION, &state.config.jwt_secret).is_ok()
            })
            .unwrap_or(false);

    if !authorized {
        warn!(user = %claims.sub, "Connection test denied");
        return Json(AjaxResponse::permission_denied());
    }

    let result = state.connection.run().await;
    info!(user = %claims.sub, success = result.is_success(), "Connection test requested");
    Json(AjaxResponse::from(&result))
}
