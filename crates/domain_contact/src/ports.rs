//! Contact Domain Ports
//!
//! `CrmPort` is the outbound seam to the CRM. The production adapter talks to
//! the HubSpot REST API; the mock records calls so callers can assert how
//! many requests a flow would have made.

use async_trait::async_trait;

use core_kernel::DomainPort;
use domain_forms::PropertyMap;

use crate::result::CrmResult;

/// Whether `token` counts as unset
///
/// Whitespace-only tokens count as unset too, so a token field that was
/// cleared to blanks fails locally rather than with a 401 from the CRM.
pub fn token_missing(token: &str) -> bool {
    token.trim().is_empty()
}

/// Contact upsert and credential check against the CRM
///
/// Both operations are single attempts: no retries, no caching. An empty
/// token fails without a request.
#[async_trait]
pub trait CrmPort: DomainPort {
    /// Creates or updates the contact identified by `properties["email"]`
    async fn send_contact(&self, token: &str, properties: &PropertyMap) -> CrmResult;

    /// Verifies the token by fetching the account details
    async fn test_connection(&self, token: &str) -> CrmResult;
}

/// Recording CRM port for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use serde_json::json;

    use crate::error::CrmError;

    /// Answers every call with a fixed result and counts requests
    ///
    /// Empty tokens fail like the real adapter and are not counted.
    #[derive(Debug)]
    pub struct RecordingCrmPort {
        response: CrmResult,
        requests: AtomicUsize,
        sent: Mutex<Vec<PropertyMap>>,
    }

    impl RecordingCrmPort {
        pub fn new(response: CrmResult) -> Self {
            Self {
                response,
                requests: AtomicUsize::new(0),
                sent: Mutex::new(Vec::new()),
            }
        }

        /// A port that accepts every contact
        pub fn accepting() -> Self {
            Self::new(CrmResult::success("Contact successfully sent to HubSpot", json!({"id": "1"})))
        }

        /// A port that rejects every call with `status`
        pub fn rejecting(status: u16, message: &str) -> Self {
            Self::new(CrmError::api(status, Some(json!({ "message": message }))).into())
        }

        /// Number of calls that would have reached the network
        pub fn request_count(&self) -> usize {
            self.requests.load(Ordering::SeqCst)
        }

        /// Property sets passed to `send_contact`
        pub fn sent(&self) -> Vec<PropertyMap> {
            self.sent.lock().map(|s| s.clone()).unwrap_or_default()
        }
    }

    impl DomainPort for RecordingCrmPort {}

    #[async_trait]
    impl CrmPort for RecordingCrmPort {
        async fn send_contact(&self, token: &str, properties: &PropertyMap) -> CrmResult {
            if token_missing(token) {
                return CrmError::missing_token().into();
            }
            self.requests.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut sent) = self.sent.lock() {
                sent.push(properties.clone());
            }
            self.response.clone()
        }

        async fn test_connection(&self, token: &str) -> CrmResult {
            if token_missing(token) {
                return CrmError::missing_token().into();
            }
            self.requests.fetch_add(1, Ordering::SeqCst);
            self.response.clone()
        }
    }
}
