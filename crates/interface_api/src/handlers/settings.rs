//! Settings screen handlers

use axum::{extract::State, http::HeaderMap, Extension, Json};
use tracing::info;
use validator::Validate;

use crate::auth::{actions, require_role, roles, verify_nonce, Claims};
use crate::dto::settings::*;
use crate::error::ApiError;
use crate::handlers::admin::nonce_header;
use crate::AppState;

/// Current settings and the discovered form catalog
pub async fn get_settings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<SettingsPageResponse>, ApiError> {
    require_role(&claims, roles::MANAGE_OPTIONS)?;
    Ok(Json(settings_page(&state).await?))
}

/// Saves the settings form
pub async fn save_settings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    headers: HeaderMap,
    Json(request): Json<SaveSettingsRequest>,
) -> Result<Json<SaveSettingsResponse>, ApiError> {
    require_role(&claims, roles::MANAGE_OPTIONS)?;
    let nonce = nonce_header(&headers).ok_or_else(|| ApiError::Forbidden("Missing nonce".to_string()))?;
    verify_nonce(nonce, &claims.sub, actions::SAVE_SETTINGS, &state.config.jwt_secret)?;
    request.validate()?;

    let outcome = state.settings.save(request.into()).await?;
    info!(user = %claims.sub, written = ?outcome.written, "Settings updated");

    let page = settings_page(&state).await?;
    Ok(Json(SaveSettingsResponse::new(outcome, page)))
}

async fn settings_page(state: &AppState) -> Result<SettingsPageResponse, ApiError> {
    let settings = state.settings.load().await?;
    let catalog = state.discovery.list_forms().await;
    Ok(SettingsPageResponse::new(&settings, catalog))
}
