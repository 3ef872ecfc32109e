//! Submission forwarding pipeline
//!
//! Handles one form submission from the host:
//!
//! 1. skip silently unless the form is enabled
//! 2. strip the reserved metadata fields
//! 3. fail early when no API token is stored, then resolve the stored
//!    field mapping against the submitted fields
//! 4. on success, send the properties to the CRM with the stored token
//! 5. publish the result, success or failure, as a `SubmissionResultEvent`
//!
//! Each call reads the settings afresh and keeps no state between calls.
//! Nothing here panics or returns an error to the host; a settings read
//! failure ends the call with a log record.

use std::sync::Arc;

use tracing::{debug, error, instrument, warn};

use domain_contact::{token_missing, CrmError, CrmPort, CrmResult};
use domain_forms::{FieldSet, MappingResolver, SubmissionEvent};
use domain_settings::{SettingsError, SettingsStore};

use crate::events::{EventPublisher, SubmissionResultEvent};

/// What a call to [`SubmissionPipeline::handle`] did
#[derive(Debug, Clone, PartialEq)]
pub enum HandleOutcome {
    /// The form is not enabled; nothing was sent or published
    Skipped,
    /// A result was produced and handed to the publisher
    Published(CrmResult),
    /// Settings could not be read; nothing was sent or published
    SettingsUnavailable(String),
}

impl HandleOutcome {
    pub fn result(&self) -> Option<&CrmResult> {
        match self {
            HandleOutcome::Published(result) => Some(result),
            _ => None,
        }
    }
}

/// Forwards enabled form submissions to the CRM
#[derive(Clone)]
pub struct SubmissionPipeline {
    settings: SettingsStore,
    crm: Arc<dyn CrmPort>,
    publisher: Arc<dyn EventPublisher>,
}

impl std::fmt::Debug for SubmissionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionPipeline").finish_non_exhaustive()
    }
}

impl SubmissionPipeline {
    pub fn new(
        settings: SettingsStore,
        crm: Arc<dyn CrmPort>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            settings,
            crm,
            publisher,
        }
    }

    /// Processes one submission
    #[instrument(skip(self, event), fields(form_id = %event.form_id))]
    pub async fn handle(&self, event: SubmissionEvent) -> HandleOutcome {
        let enabled = match self.settings.enabled_form_ids().await {
            Ok(enabled) => enabled,
            Err(e) => return settings_unavailable(e),
        };
        if !enabled.contains(&event.form_id) {
            debug!("Form not enabled for forwarding");
            return HandleOutcome::Skipped;
        }

        let fields = event.user_fields();
        let result = match self.forward(&fields).await {
            Ok(result) => result,
            Err(e) => return settings_unavailable(e),
        };

        let notification = SubmissionResultEvent::new(event.form_id, fields, result.clone());
        if let Err(e) = self.publisher.publish(&notification).await {
            warn!(event_id = %notification.event_id, error = %e, "Result event not delivered");
        }

        HandleOutcome::Published(result)
    }

    async fn forward(&self, fields: &FieldSet) -> Result<CrmResult, SettingsError> {
        let token = self.settings.api_token().await?;
        if token_missing(&token) {
            debug!("API token not configured");
            return Ok(CrmError::missing_token().into());
        }

        let mapping = self.settings.field_mapping().await?;
        let properties = match MappingResolver::resolve(&mapping, fields) {
            Ok(properties) => properties,
            Err(e) => {
                debug!(reason = %e, "Submission not mappable");
                return Ok(CrmError::from(e).into());
            }
        };

        Ok(self.crm.send_contact(&token, &properties).await)
    }
}

fn settings_unavailable(e: SettingsError) -> HandleOutcome {
    error!(error = %e, "Settings unavailable, submission dropped");
    HandleOutcome::SettingsUnavailable(e.to_string())
}
