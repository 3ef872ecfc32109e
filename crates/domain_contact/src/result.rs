//! Outcome of a CRM call

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which part of the error taxonomy a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Token or mapping not set up; detected before any request
    ConfigurationMissing,
    /// Submission cannot form a valid contact; detected before any request
    ValidationFailed,
    /// No response was received
    RemoteTransport,
    /// The CRM answered with a non-2xx status
    RemoteApi,
}

impl FailureKind {
    /// True for failures detected without contacting the CRM
    pub fn is_local(&self) -> bool {
        matches!(self, FailureKind::ConfigurationMissing | FailureKind::ValidationFailed)
    }
}

/// Result of `send_contact` and `test_connection`
///
/// Every outcome, including local validation errors, is carried as a value;
/// nothing in the contact path is raised to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CrmResult {
    Success {
        message: String,
        /// Parsed response body; `null` when the body was not JSON
        data: Value,
    },
    Failure {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        response: Option<Value>,
        kind: FailureKind,
    },
}

impl CrmResult {
    pub fn success(message: impl Into<String>, data: Value) -> Self {
        CrmResult::Success {
            message: message.into(),
            data,
        }
    }

    /// A failure with no HTTP response attached
    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        CrmResult::Failure {
            message: message.into(),
            status_code: None,
            response: None,
            kind,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CrmResult::Success { .. })
    }

    /// Human-readable message for either outcome
    pub fn message(&self) -> &str {
        match self {
            CrmResult::Success { message, .. } | CrmResult::Failure { message, .. } => message,
        }
    }

    /// Response data on success
    pub fn data(&self) -> Option<&Value> {
        match self {
            CrmResult::Success { data, .. } => Some(data),
            CrmResult::Failure { .. } => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            CrmResult::Failure { status_code, .. } => *status_code,
            CrmResult::Success { .. } => None,
        }
    }

    /// Failure category; `None` on success
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            CrmResult::Failure { kind, .. } => Some(*kind),
            CrmResult::Success { .. } => None,
        }
    }
}
