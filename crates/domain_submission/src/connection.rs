//! Connection check
//!
//! Verifies the stored API token against the CRM, for the administrator's
//! "test connection" action.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use domain_contact::{CrmError, CrmPort, CrmResult};
use domain_settings::SettingsStore;

#[derive(Clone)]
pub struct ConnectionCheck {
    settings: SettingsStore,
    crm: Arc<dyn CrmPort>,
}

impl ConnectionCheck {
    pub fn new(settings: SettingsStore, crm: Arc<dyn CrmPort>) -> Self {
        Self { settings, crm }
    }

    /// Tests the stored token
    ///
    /// An unreadable token is reported the same way as a missing one.
    #[instrument(skip(self))]
    pub async fn run(&self) -> CrmResult {
        let token = match self.settings.api_token().await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Could not read API token");
                return CrmError::missing_token().into();
            }
        };

        let result = self.crm.test_connection(&token).await;
        info!(success = result.is_success(), "Connection test finished");
        result
    }
}
