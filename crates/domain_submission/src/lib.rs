//! Submission Domain
//!
//! Wires settings, mapping and the CRM together:
//! - `SubmissionPipeline` forwards each enabled form submission and
//!   publishes the outcome
//! - `ConnectionCheck` tests the stored CRM token
//! - `events` holds the outbound result event and its publishers
//!
//! Collaborators are passed in at construction; there is no global registry.
//!
//! ```rust,ignore
//! let pipeline = SubmissionPipeline::new(
//!     SettingsStore::new(settings_port),
//!     Arc::new(HubSpotAdapter::new(HubSpotConfig::default())?),
//!     Arc::new(TracingPublisher),
//! );
//! pipeline.handle(event).await;
//! ```

pub mod events;
pub mod pipeline;
pub mod connection;

pub use events::{
    BroadcastPublisher, EventPublisher, FanoutPublisher, PublishError, SubmissionResultEvent,
    TracingPublisher,
};
#[cfg(any(test, feature = "mock"))]
pub use events::mock::{FailingPublisher, RecordingPublisher};
pub use pipeline::{HandleOutcome, SubmissionPipeline};
pub use connection::ConnectionCheck;
