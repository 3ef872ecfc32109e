//! Form domain errors

use thiserror::Error;

/// Reasons a submission cannot be turned into CRM contact properties
///
/// Every variant is detected locally, before any network call. The display
/// text is the message shown to administrators and downstream subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The mapping document is not a non-empty JSON object of strings
    #[error("Field mapping is not configured correctly.")]
    InvalidMapping,

    /// None of the mapped source fields were submitted
    #[error("No mappable form fields found.")]
    NoMappableFields,

    /// The mapped properties do not include `email`
    #[error("Email field is required for HubSpot contact creation.")]
    MissingRequiredEmail,
}

impl ResolveError {
    /// True when the failure comes from configuration rather than the submission
    pub fn is_configuration(&self) -> bool {
        matches!(self, ResolveError::InvalidMapping)
    }
}
