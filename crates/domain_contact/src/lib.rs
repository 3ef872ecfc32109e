//! Contact Domain
//!
//! Forwards resolved contact properties to the CRM and checks CRM
//! credentials. Every call produces a `CrmResult`; failures are values, never
//! panics or propagated errors.
//!
//! # Failure taxonomy
//!
//! | Kind | Detected | Example |
//! |---|---|---|
//! | `ConfigurationMissing` | locally | empty token, unusable mapping |
//! | `ValidationFailed` | locally | no mapped fields, no email |
//! | `RemoteTransport` | after sending | DNS, TLS, timeout |
//! | `RemoteApi` | after sending | HTTP 429 with `{"message": ...}` |

pub mod result;
pub mod error;
pub mod ports;
pub mod adapters;

pub use result::{CrmResult, FailureKind};
pub use error::{CrmError, GENERIC_API_ERROR, TOKEN_NOT_CONFIGURED};
pub use ports::{token_missing, CrmPort};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::RecordingCrmPort;
pub use adapters::hubspot::{connected_message, CONTACT_SENT};
pub use adapters::{HubSpotAdapter, HubSpotConfig};
