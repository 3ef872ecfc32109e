//! Inbound hook from the host form framework

use axum::{extract::State, http::StatusCode, Extension, Json};
use tracing::{debug, Instrument};
use validator::Validate;

use crate::auth::{require_role, roles, Claims};
use crate::dto::hooks::*;
use crate::error::ApiError;
use crate::AppState;

/// Accepts a submission and forwards it in the background
///
/// The host does not wait for the CRM: the response is 202 as soon as the
/// body is valid, and the outcome goes to the result-event subscribers.
pub async fn form_submitted(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<FormSubmittedRequest>,
) -> Result<(StatusCode, Json<AcceptedResponse>), ApiError> {
    require_role(&claims, roles::FORM_HOST)?;
    request.validate()?;

    let event = request.into_event();
    let form_id = event.form_id;
    debug!(%form_id, fields = event.fields.len(), "Submission received");

    let pipeline = state.pipeline.clone();
    tokio::spawn(
        async move {
            pipeline.handle(event).await;
        }
        .in_current_span(),
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(AcceptedResponse {
            accepted: true,
            form_id,
        }),
    ))
}
