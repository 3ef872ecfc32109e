//! Contact domain errors
//!
//! `CrmError` is the failure taxonomy for forwarding a contact. It never
//! escapes the domain as an `Err`: every variant is folded into
//! `CrmResult::Failure` before it reaches a caller.

use serde_json::Value;
use thiserror::Error;

use domain_forms::ResolveError;

use crate::result::{CrmResult, FailureKind};

/// Message for an unset API token
pub const TOKEN_NOT_CONFIGURED: &str = "HubSpot API token is not configured.";

/// Message for a non-2xx response without a `message` field
pub const GENERIC_API_ERROR: &str = "HubSpot API Error";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CrmError {
    #[error("{0}")]
    ConfigurationMissing(String),

    #[error("{0}")]
    ValidationFailed(String),

    #[error("{message}")]
    RemoteTransport { message: String },

    #[error("{message}")]
    RemoteApi {
        status: u16,
        message: String,
        body: Option<Value>,
    },
}

impl CrmError {
    pub fn missing_token() -> Self {
        CrmError::ConfigurationMissing(TOKEN_NOT_CONFIGURED.to_string())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        CrmError::RemoteTransport {
            message: message.into(),
        }
    }

    /// Builds the error for a non-2xx response
    ///
    /// The body's `message` field is used when present, otherwise the
    /// generic API error text.
    pub fn api(status: u16, body: Option<Value>) -> Self {
        let message = body
            .as_ref()
            .and_then(|b| b.get("message"))
            .map(|m| match m {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_else(|| GENERIC_API_ERROR.to_string());

        CrmError::RemoteApi {
            status,
            message,
            body,
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            CrmError::ConfigurationMissing(_) => FailureKind::ConfigurationMissing,
            CrmError::ValidationFailed(_) => FailureKind::ValidationFailed,
            CrmError::RemoteTransport { .. } => FailureKind::RemoteTransport,
            CrmError::RemoteApi { .. } => FailureKind::RemoteApi,
        }
    }
}

impl From<ResolveError> for CrmError {
    fn from(err: ResolveError) -> Self {
        if err.is_configuration() {
            CrmError::ConfigurationMissing(err.to_string())
        } else {
            CrmError::ValidationFailed(err.to_string())
        }
    }
}

impl From<CrmError> for CrmResult {
    fn from(err: CrmError) -> Self {
        let kind = err.kind();
        match err {
            CrmError::RemoteApi {
                status,
                message,
                body,
            } => CrmResult::Failure {
                message,
                status_code: Some(status),
                response: body,
                kind,
            },
            CrmError::ConfigurationMissing(message)
            | CrmError::ValidationFailed(message)
            | CrmError::RemoteTransport { message } => CrmResult::failure(kind, message),
        }
    }
}
