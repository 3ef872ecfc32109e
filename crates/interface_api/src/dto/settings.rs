//! Settings DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::FormId;
use domain_forms::FormCatalogEntry;
use domain_settings::{IntegrationSettings, SaveOutcome, SettingsKey, SettingsUpdate};

/// Shown in place of the form list when discovery finds nothing
pub const NO_FORMS_NOTICE: &str = "No Breakdance forms found. Create forms in Breakdance first.";

/// One selectable form on the settings screen
#[derive(Debug, Serialize, Deserialize)]
pub struct FormOption {
    pub form_id: FormId,
    pub label: String,
    pub enabled: bool,
}

/// Settings screen model
///
/// The token itself is never returned, only whether one is stored.
#[derive(Debug, Serialize, Deserialize)]
pub struct SettingsPageResponse {
    pub has_api_token: bool,
    pub enabled_form_ids: Vec<FormId>,
    pub field_mapping: String,
    pub forms: Vec<FormOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl SettingsPageResponse {
    pub fn new(settings: &IntegrationSettings, catalog: Vec<FormCatalogEntry>) -> Self {
        let notice = catalog.is_empty().then(|| NO_FORMS_NOTICE.to_string());
        let forms = catalog
            .into_iter()
            .map(|entry| FormOption {
                enabled: settings.is_form_enabled(entry.form_id),
                form_id: entry.form_id,
                label: entry.label,
            })
            .collect();

        Self {
            has_api_token: settings.has_api_token(),
            enabled_form_ids: settings.enabled_form_ids.iter().copied().collect(),
            field_mapping: settings.field_mapping.clone(),
            forms,
            notice,
        }
    }
}

/// Settings form submission
///
/// A missing `enabled_form_ids` clears the enabled set, the way an HTML
/// form with every checkbox cleared posts nothing for it.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SaveSettingsRequest {
    #[validate(length(max = 1024))]
    pub api_token: Option<String>,
    pub enabled_form_ids: Option<Vec<FormId>>,
    #[validate(length(max = 65536))]
    pub field_mapping: Option<String>,
}

impl From<SaveSettingsRequest> for SettingsUpdate {
    fn from(request: SaveSettingsRequest) -> Self {
        SettingsUpdate {
            api_token: request.api_token,
            enabled_form_ids: request.enabled_form_ids,
            field_mapping: request.field_mapping,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveSettingsResponse {
    pub notice: String,
    pub written: Vec<SettingsKey>,
    pub mapping_rejected: bool,
    pub settings: SettingsPageResponse,
}

impl SaveSettingsResponse {
    pub fn new(outcome: SaveOutcome, settings: SettingsPageResponse) -> Self {
        Self {
            notice: outcome.notice().to_string(),
            written: outcome.written,
            mapping_rejected: outcome.mapping_rejected,
            settings,
        }
    }
}
