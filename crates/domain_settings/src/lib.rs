//! Integration Settings Domain
//!
//! Owns the three settings that configure form forwarding: the CRM API
//! token, the set of enabled form ids, and the field-mapping document.
//!
//! Persistence belongs to the host and is reached through `SettingsPort`.
//! `SettingsStore` layers encoding, defaults and save-time validation on top.
//!
//! # Examples
//!
//! ```rust,ignore
//! use domain_settings::{SettingsStore, SettingsUpdate};
//!
//! let store = SettingsStore::new(port);
//! store.install_defaults().await?;
//!
//! let outcome = store.save(SettingsUpdate {
//!     api_token: Some("pat-na1-...".to_string()),
//!     enabled_form_ids: Some(vec![FormId::new(12)]),
//!     field_mapping: Some(r#"{"email": "email"}"#.to_string()),
//! }).await?;
//! assert!(!outcome.mapping_rejected);
//! ```

pub mod settings;
pub mod error;
pub mod sanitize;
pub mod ports;
pub mod store;

pub use settings::{
    IntegrationSettings, SettingsKey, SettingsUpdate, SaveOutcome, DEFAULT_FIELD_MAPPING,
};
pub use error::SettingsError;
pub use ports::SettingsPort;
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::InMemorySettingsPort;
pub use store::SettingsStore;
