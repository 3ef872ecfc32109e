//! HubSpot REST Adapter
//!
//! Implements `CrmPort` over the HubSpot v3 REST API:
//!
//! - `POST {base}/crm/v3/objects/contacts` with `{"properties": {...}}`
//! - `GET {base}/account-info/v3/details`
//!
//! Both use bearer-token auth, HTTP/1.1, a 30 second timeout and at most five
//! redirects by default.
//!
//! # Response handling
//!
//! - transport failure -> `RemoteTransport` with the client's error text
//! - 2xx -> success carrying the parsed body (`null` if not JSON)
//! - other status -> `RemoteApi` with the status, the body's `message` field
//!   (or "HubSpot API Error") and the parsed body
//!
//! There is no retry. A slow endpoint holds the caller until the timeout.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{redirect, Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use core_kernel::{DomainPort, PortError};
use domain_forms::PropertyMap;

use crate::error::CrmError;
use crate::ports::{token_missing, CrmPort};
use crate::result::CrmResult;

pub const DEFAULT_BASE_URL: &str = "https://api.hubapi.com";
pub const CONTACTS_PATH: &str = "/crm/v3/objects/contacts";
pub const ACCOUNT_INFO_PATH: &str = "/account-info/v3/details";

/// Message for an accepted contact
pub const CONTACT_SENT: &str = "Contact successfully sent to HubSpot";

/// Configuration for the HubSpot adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubSpotConfig {
    /// API origin, without a trailing path
    pub base_url: String,

    /// Whole-request timeout in seconds
    pub timeout_secs: u64,

    /// Redirects followed before giving up
    pub max_redirects: usize,
}

impl Default for HubSpotConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            max_redirects: 5,
        }
    }
}

impl HubSpotConfig {
    /// Config pointing at another origin, e.g. a local stub server
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Serialize)]
struct ContactPayload<'a> {
    properties: &'a PropertyMap,
}

/// HubSpot implementation of `CrmPort`
#[derive(Debug, Clone)]
pub struct HubSpotAdapter {
    config: HubSpotConfig,
    client: Client,
}

impl HubSpotAdapter {
    /// Builds the adapter and its HTTP client
    pub fn new(config: HubSpotConfig) -> Result<Self, PortError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(redirect::Policy::limited(config.max_redirects))
            .http1_only()
            .build()
            .map_err(|e| PortError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &HubSpotConfig {
        &self.config
    }

    async fn post_contact(&self, token: &str, properties: &PropertyMap) -> Result<Value, CrmError> {
        ensure_token(token)?;
        let request = self
            .client
            .post(self.config.url(CONTACTS_PATH))
            .header("Authorization", format!("Bearer {token}"))
            .json(&ContactPayload { properties });
        self.execute(request).await
    }

    async fn fetch_account_details(&self, token: &str) -> Result<Value, CrmError> {
        ensure_token(token)?;
        let request = self
            .client
            .get(self.config.url(ACCOUNT_INFO_PATH))
            .header("Authorization", format!("Bearer {token}"));
        self.execute(request).await
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Value, CrmError> {
        let start = Instant::now();

        let response = request.send().await.map_err(|e| {
            let kind = if e.is_timeout() {
                "timeout"
            } else if e.is_connect() {
                "connect"
            } else if e.is_redirect() {
                "redirect"
            } else {
                "request"
            };
            warn!(error = %e, kind, "HubSpot request failed before a response");
            CrmError::transport(e.to_string())
        })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| CrmError::transport(e.to_string()))?;
        let body = serde_json::from_slice::<Value>(&bytes).ok();
        let latency_ms = start.elapsed().as_millis() as u64;

        if status.is_success() {
            debug!(status = status.as_u16(), latency_ms, "HubSpot request succeeded");
            Ok(body.unwrap_or(Value::Null))
        } else {
            warn!(status = status.as_u16(), latency_ms, "HubSpot returned an error status");
            Err(CrmError::api(status.as_u16(), body))
        }
    }
}

fn ensure_token(token: &str) -> Result<(), CrmError> {
    if token_missing(token) {
        return Err(CrmError::missing_token());
    }
    Ok(())
}

/// Success message for a connection test, naming the portal
pub fn connected_message(details: &Value) -> String {
    let portal_id = match details.get("portalId") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    format!("Successfully connected to HubSpot (Account ID: {portal_id})")
}

impl DomainPort for HubSpotAdapter {}

#[async_trait]
impl CrmPort for HubSpotAdapter {
    #[instrument(skip(self, token, properties), fields(properties = properties.len()))]
    async fn send_contact(&self, token: &str, properties: &PropertyMap) -> CrmResult {
        match self.post_contact(token, properties).await {
            Ok(data) => {
                let contact_id = data.get("id").and_then(Value::as_str);
                info!(contact_id, "Contact sent to HubSpot");
                CrmResult::success(CONTACT_SENT, data)
            }
            Err(e) => e.into(),
        }
    }

    #[instrument(skip(self, token))]
    async fn test_connection(&self, token: &str) -> CrmResult {
        match self.fetch_account_details(token).await {
            Ok(details) => CrmResult::success(connected_message(&details), details),
            Err(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_defaults() {
        let config = HubSpotConfig::default();
        assert_eq!(config.base_url, "https://api.hubapi.com");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = HubSpotConfig::with_base_url("http://127.0.0.1:9000/");
        assert_eq!(config.url(CONTACTS_PATH), "http://127.0.0.1:9000/crm/v3/objects/contacts");
    }

    #[test]
    fn test_connected_message_portal_id_shapes() {
        assert_eq!(
            connected_message(&json!({"portalId": 12345})),
            "Successfully connected to HubSpot (Account ID: 12345)"
        );
        assert_eq!(
            connected_message(&json!({"portalId": "abc"})),
            "Successfully connected to HubSpot (Account ID: abc)"
        );
        assert_eq!(
            connected_message(&json!({})),
            "Successfully connected to HubSpot (Account ID: )"
        );
    }

    #[test]
    fn test_contact_payload_shape() {
        let mut properties = PropertyMap::new();
        properties.insert("email".to_string(), "a@x.com".to_string());
        let body = serde_json::to_value(ContactPayload { properties: &properties }).unwrap();
        assert_eq!(body, json!({"properties": {"email": "a@x.com"}}));
    }

    #[test]
    fn test_blank_tokens_rejected_before_request() {
        assert_eq!(ensure_token(""), Err(CrmError::missing_token()));
        assert_eq!(ensure_token("  \t"), Err(CrmError::missing_token()));
        assert_eq!(ensure_token("pat-na1-123"), Ok(()));
    }
}
