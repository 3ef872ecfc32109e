//! CRM adapters
//!
//! - **HubSpotAdapter**: HubSpot v3 REST API over reqwest
//! - **RecordingCrmPort**: call-counting mock (re-exported from the ports module)

pub mod hubspot;

pub use hubspot::{HubSpotAdapter, HubSpotConfig};
