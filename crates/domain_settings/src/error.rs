//! Settings domain errors

use thiserror::Error;

use core_kernel::PortError;

use crate::settings::SettingsKey;

/// Errors raised while reading or writing integration settings
///
/// Storage failures pass through untouched; the host owns their meaning.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The host key-value store failed
    #[error(transparent)]
    Storage(#[from] PortError),

    /// A stored value does not have the shape its key requires
    #[error("Stored value for {key} is invalid: {message}")]
    InvalidStoredValue {
        key: SettingsKey,
        message: String,
    },
}

impl SettingsError {
    /// Creates an InvalidStoredValue error
    pub fn invalid_stored(key: SettingsKey, message: impl Into<String>) -> Self {
        SettingsError::InvalidStoredValue {
            key,
            message: message.into(),
        }
    }
}
