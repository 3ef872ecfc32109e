//! Typed access to the integration settings
//!
//! `SettingsStore` is the only code that knows how each setting is encoded in
//! the host's key-value store. Reads decode into domain types; the save
//! operation sanitises and validates what the settings form posted.
//!
//! # Save rules
//!
//! - `api_token`: written when posted, after `sanitize_text_field`
//! - `enabled_form_ids`: always written; an unposted list clears the set
//! - `field_mapping`: written when posted AND syntactically valid JSON;
//!   otherwise the previous value is kept and the outcome reports it
//!
//! The stored mapping is therefore always valid JSON, whatever the form sent.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use core_kernel::{FormId, HealthCheckResult};

use crate::error::SettingsError;
use crate::ports::SettingsPort;
use crate::sanitize::{sanitize_text_field, sanitize_textarea_field};
use crate::settings::{IntegrationSettings, SaveOutcome, SettingsKey, SettingsUpdate};

/// Typed facade over a host `SettingsPort`
#[derive(Clone)]
pub struct SettingsStore {
    port: Arc<dyn SettingsPort>,
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore").finish_non_exhaustive()
    }
}

impl SettingsStore {
    /// Wraps the host's key-value store
    pub fn new(port: Arc<dyn SettingsPort>) -> Self {
        Self { port }
    }

    /// Reads a setting, falling back to `default` when it was never written
    pub async fn get_or(&self, key: SettingsKey, default: Value) -> Result<Value, SettingsError> {
        Ok(self.port.get(key.as_str()).await?.unwrap_or(default))
    }

    /// Writes a setting
    pub async fn set(&self, key: SettingsKey, value: Value) -> Result<(), SettingsError> {
        self.port.set(key.as_str(), value).await?;
        Ok(())
    }

    /// Stored API token, empty when not configured
    pub async fn api_token(&self) -> Result<String, SettingsError> {
        let value = self.get_or(SettingsKey::ApiToken, SettingsKey::ApiToken.read_default()).await?;
        decode_string(SettingsKey::ApiToken, value)
    }

    /// Forms whose submissions are forwarded
    pub async fn enabled_form_ids(&self) -> Result<BTreeSet<FormId>, SettingsError> {
        let value = self
            .get_or(SettingsKey::EnabledFormIds, SettingsKey::EnabledFormIds.read_default())
            .await?;
        decode_form_ids(value)
    }

    /// Raw field-mapping document
    pub async fn field_mapping(&self) -> Result<String, SettingsError> {
        let value = self
            .get_or(SettingsKey::FieldMapping, SettingsKey::FieldMapping.read_default())
            .await?;
        decode_string(SettingsKey::FieldMapping, value)
    }

    /// Reads all three settings
    pub async fn load(&self) -> Result<IntegrationSettings, SettingsError> {
        Ok(IntegrationSettings {
            api_token: self.api_token().await?,
            enabled_form_ids: self.enabled_form_ids().await?,
            field_mapping: self.field_mapping().await?,
        })
    }

    /// Writes install-time defaults for keys that were never written
    ///
    /// Safe to call on every start; existing values are left alone. Nothing
    /// is ever removed, so settings survive deactivation and reinstall.
    #[instrument(skip(self))]
    pub async fn install_defaults(&self) -> Result<Vec<SettingsKey>, SettingsError> {
        let mut installed = Vec::new();
        for key in SettingsKey::ALL {
            if let Some(default) = key.install_default() {
                if self.port.add_if_absent(key.as_str(), default).await? {
                    installed.push(key);
                }
            }
        }
        if !installed.is_empty() {
            info!(keys = ?installed, "Installed default settings");
        }
        Ok(installed)
    }

    /// Applies a settings-form submission
    #[instrument(skip(self, update))]
    pub async fn save(&self, update: SettingsUpdate) -> Result<SaveOutcome, SettingsError> {
        let mut outcome = SaveOutcome::default();

        if let Some(token) = update.api_token {
            let token = sanitize_text_field(&token);
            self.set(SettingsKey::ApiToken, Value::String(token)).await?;
            outcome.written.push(SettingsKey::ApiToken);
        }

        let ids: BTreeSet<FormId> = update.enabled_form_ids.unwrap_or_default().into_iter().collect();
        let ids = Value::Array(ids.iter().map(|id| Value::from(id.value())).collect());
        self.set(SettingsKey::EnabledFormIds, ids).await?;
        outcome.written.push(SettingsKey::EnabledFormIds);

        if let Some(mapping) = update.field_mapping {
            let mapping = sanitize_textarea_field(&mapping);
            match serde_json::from_str::<Value>(&mapping) {
                Ok(_) => {
                    self.set(SettingsKey::FieldMapping, Value::String(mapping)).await?;
                    outcome.written.push(SettingsKey::FieldMapping);
                }
                Err(e) => {
                    warn!(error = %e, "Rejected field mapping that is not valid JSON");
                    outcome.mapping_rejected = true;
                }
            }
        }

        debug!(written = ?outcome.written, "Settings saved");
        Ok(outcome)
    }

    /// Health of the underlying host store
    pub async fn health_check(&self) -> HealthCheckResult {
        self.port.health_check().await
    }
}

fn decode_string(key: SettingsKey, value: Value) -> Result<String, SettingsError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Null => Ok(String::new()),
        other => Err(SettingsError::invalid_stored(
            key,
            format!("expected a string, found {}", json_type(&other)),
        )),
    }
}

// Hosts that post checkbox values may have stored numeric strings.
fn decode_form_ids(value: Value) -> Result<BTreeSet<FormId>, SettingsError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Null => return Ok(BTreeSet::new()),
        other => {
            return Err(SettingsError::invalid_stored(
                SettingsKey::EnabledFormIds,
                format!("expected an array, found {}", json_type(&other)),
            ))
        }
    };

    items
        .into_iter()
        .map(|item| {
            let id = match &item {
                Value::Number(n) => n.as_u64().map(FormId::new),
                Value::String(s) => s.parse::<FormId>().ok(),
                _ => None,
            };
            id.ok_or_else(|| {
                SettingsError::invalid_stored(
                    SettingsKey::EnabledFormIds,
                    format!("{} is not a form id", item),
                )
            })
        })
        .collect()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
