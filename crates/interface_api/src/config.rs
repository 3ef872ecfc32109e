//! API configuration

use serde::Deserialize;

use domain_contact::HubSpotConfig;
use domain_forms::DuplicateFormPolicy;
use infra_db::DatabaseConfig;

/// API configuration
///
/// Every field has a default, so a partially set environment still loads.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication and admin nonces
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// Lifetime of an admin action nonce in seconds
    pub nonce_ttl_secs: u64,
    /// Database URL
    pub database_url: String,
    /// Log level
    pub log_level: String,
    /// Root of the HubSpot REST API
    pub hubspot_base_url: String,
    /// Whole-request timeout for HubSpot calls
    pub hubspot_timeout_secs: u64,
    pub hubspot_max_redirects: usize,
    /// Label rule for a form embedded on several pages
    pub duplicate_form_policy: DuplicateFormPolicy,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let hubspot = HubSpotConfig::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            nonce_ttl_secs: 12 * 60 * 60,
            database_url: "postgres://localhost/formbridge".to_string(),
            log_level: "info".to_string(),
            hubspot_base_url: hubspot.base_url,
            hubspot_timeout_secs: hubspot.timeout_secs,
            hubspot_max_redirects: hubspot.max_redirects,
            duplicate_form_policy: DuplicateFormPolicy::default(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_*` environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn hubspot_config(&self) -> HubSpotConfig {
        HubSpotConfig {
            base_url: self.hubspot_base_url.clone(),
            timeout_secs: self.hubspot_timeout_secs,
            max_redirects: self.hubspot_max_redirects,
        }
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(&self.database_url)
    }
}
