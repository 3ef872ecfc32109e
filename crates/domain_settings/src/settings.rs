//! Integration settings model
//!
//! Three named settings drive the integration:
//!
//! | Key                | Stored as                  | Default |
//! |--------------------|----------------------------|---------|
//! | `api_token`        | string (secret, may be "") | `""`    |
//! | `enabled_form_ids` | array of integers          | `[]`    |
//! | `field_mapping`    | JSON-encoded string        | `"{}"`  |
//!
//! The mapping document is stored as text, exactly as the administrator
//! typed it, and is only interpreted when a submission arrives.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use core_kernel::FormId;

/// Stored value of `field_mapping` before anything has been configured
pub const DEFAULT_FIELD_MAPPING: &str = "{}";

/// Names of the persisted settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsKey {
    ApiToken,
    EnabledFormIds,
    FieldMapping,
}

impl SettingsKey {
    /// Every key, in the order the settings form presents them
    pub const ALL: [SettingsKey; 3] = [
        SettingsKey::ApiToken,
        SettingsKey::EnabledFormIds,
        SettingsKey::FieldMapping,
    ];

    /// Key under which the value is persisted in the host store
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsKey::ApiToken => "api_token",
            SettingsKey::EnabledFormIds => "enabled_form_ids",
            SettingsKey::FieldMapping => "field_mapping",
        }
    }

    /// Value written at install time, if the key has one
    ///
    /// The token has no install default; an unset token reads as empty.
    pub fn install_default(&self) -> Option<Value> {
        match self {
            SettingsKey::ApiToken => None,
            SettingsKey::EnabledFormIds => Some(Value::Array(Vec::new())),
            SettingsKey::FieldMapping => Some(Value::String(DEFAULT_FIELD_MAPPING.to_string())),
        }
    }

    /// Value returned when the key is absent from the store
    pub fn read_default(&self) -> Value {
        match self {
            SettingsKey::ApiToken => Value::String(String::new()),
            other => other.install_default().unwrap_or(Value::Null),
        }
    }
}

impl fmt::Display for SettingsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of all integration settings
///
/// Taken at the start of an operation and used once; nothing keeps a
/// snapshot alive across requests.
#[derive(Clone, PartialEq, Eq)]
pub struct IntegrationSettings {
    /// Bearer token for the CRM API; empty when not configured
    pub api_token: String,
    /// Forms whose submissions are forwarded
    pub enabled_form_ids: BTreeSet<FormId>,
    /// Raw field-mapping document
    pub field_mapping: String,
}

impl IntegrationSettings {
    /// Returns true when a non-empty API token is stored
    pub fn has_api_token(&self) -> bool {
        !self.api_token.is_empty()
    }

    /// Returns true when submissions of `form_id` should be forwarded
    pub fn is_form_enabled(&self, form_id: FormId) -> bool {
        self.enabled_form_ids.contains(&form_id)
    }
}

impl Default for IntegrationSettings {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            enabled_form_ids: BTreeSet::new(),
            field_mapping: DEFAULT_FIELD_MAPPING.to_string(),
        }
    }
}

// The token is a credential; keep it out of logs.
impl fmt::Debug for IntegrationSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntegrationSettings")
            .field("api_token", &if self.has_api_token() { "<redacted>" } else { "<empty>" })
            .field("enabled_form_ids", &self.enabled_form_ids)
            .field("field_mapping", &self.field_mapping)
            .finish()
    }
}

/// Values submitted from the settings form
///
/// Mirrors what a browser posts: a field that was not posted is `None`.
/// An unposted enabled-forms list means every checkbox was cleared.
#[derive(Clone, Default)]
pub struct SettingsUpdate {
    pub api_token: Option<String>,
    pub enabled_form_ids: Option<Vec<FormId>>,
    pub field_mapping: Option<String>,
}

impl fmt::Debug for SettingsUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsUpdate")
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("enabled_form_ids", &self.enabled_form_ids)
            .field("field_mapping", &self.field_mapping)
            .finish()
    }
}

/// Result of a settings save
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    /// Keys that were written
    pub written: Vec<SettingsKey>,
    /// True when the submitted mapping was not valid JSON and the previous value was kept
    pub mapping_rejected: bool,
}

impl SaveOutcome {
    /// Notice shown to the administrator after saving
    pub fn notice(&self) -> &'static str {
        if self.mapping_rejected {
            "Settings Saved. The field mapping was not valid JSON and was not changed."
        } else {
            "Settings Saved"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_use_snake_case_names() {
        let names: Vec<&str> = SettingsKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["api_token", "enabled_form_ids", "field_mapping"]);
    }

    #[test]
    fn test_install_defaults() {
        assert_eq!(SettingsKey::ApiToken.install_default(), None);
        assert_eq!(SettingsKey::EnabledFormIds.install_default(), Some(serde_json::json!([])));
        assert_eq!(SettingsKey::FieldMapping.install_default(), Some(serde_json::json!("{}")));
        assert_eq!(SettingsKey::ApiToken.read_default(), serde_json::json!(""));
    }

    #[test]
    fn test_debug_redacts_token() {
        let settings = IntegrationSettings {
            api_token: "pat-na1-secret".to_string(),
            ..Default::default()
        };
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("pat-na1-secret"));
        assert!(rendered.contains("<redacted>"));

        let update = SettingsUpdate {
            api_token: Some("pat-na1-secret".to_string()),
            ..Default::default()
        };
        assert!(!format!("{:?}", update).contains("pat-na1-secret"));
    }

    #[test]
    fn test_is_form_enabled() {
        let settings = IntegrationSettings {
            enabled_form_ids: [FormId::new(3), FormId::new(9)].into_iter().collect(),
            ..Default::default()
        };
        assert!(settings.is_form_enabled(FormId::new(9)));
        assert!(!settings.is_form_enabled(FormId::new(4)));
        assert!(!settings.has_api_token());
    }
}
