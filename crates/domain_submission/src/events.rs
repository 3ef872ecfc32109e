//! Submission result events
//!
//! Every forwarded submission ends in exactly one `SubmissionResultEvent`,
//! whether the CRM accepted it or not. Subscribers (logging, downstream
//! automation) receive it through an `EventPublisher`.
//!
//! Publication is best-effort. A failing subscriber is logged by the
//! pipeline and never affects the submission.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use core_kernel::{EventId, FormId};
use domain_contact::CrmResult;
use domain_forms::FieldSet;

/// Outcome of forwarding one submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResultEvent {
    pub event_id: EventId,
    pub occurred_at: DateTime<Utc>,
    pub form_id: FormId,
    /// User-entered fields, reserved metadata removed
    pub fields: FieldSet,
    pub result: CrmResult,
}

impl SubmissionResultEvent {
    pub fn new(form_id: FormId, fields: FieldSet, result: CrmResult) -> Self {
        Self {
            event_id: EventId::new_v7(),
            occurred_at: Utc::now(),
            form_id,
            fields,
            result,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    #[error("Subscriber rejected event: {0}")]
    Rejected(String),
}

/// Delivers result events to subscribers
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &SubmissionResultEvent) -> Result<(), PublishError>;
}

/// In-process fan-out over a tokio broadcast channel
///
/// Publishing with no live receivers is not an error.
#[derive(Debug, Clone)]
pub struct BroadcastPublisher {
    sender: broadcast::Sender<SubmissionResultEvent>,
}

impl BroadcastPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SubmissionResultEvent> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastPublisher {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl EventPublisher for BroadcastPublisher {
    async fn publish(&self, event: &SubmissionResultEvent) -> Result<(), PublishError> {
        match self.sender.send(event.clone()) {
            Ok(receivers) => debug!(event_id = %event.event_id, receivers, "Result event broadcast"),
            Err(_) => debug!(event_id = %event.event_id, "No subscribers for result event"),
        }
        Ok(())
    }
}

/// Writes each result event as a structured log record
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPublisher;

#[async_trait]
impl EventPublisher for TracingPublisher {
    async fn publish(&self, event: &SubmissionResultEvent) -> Result<(), PublishError> {
        // Field names only; submitted values may be personal data.
        let field_names: Vec<&str> = event.fields.keys().map(String::as_str).collect();
        match &event.result {
            CrmResult::Success { message, .. } => info!(
                event_id = %event.event_id,
                form_id = %event.form_id,
                fields = ?field_names,
                message = %message,
                "Submission forwarded"
            ),
            CrmResult::Failure {
                message,
                status_code,
                kind,
                ..
            } => warn!(
                event_id = %event.event_id,
                form_id = %event.form_id,
                fields = ?field_names,
                kind = ?kind,
                status = ?status_code,
                message = %message,
                "Submission not forwarded"
            ),
        }
        Ok(())
    }
}

/// Publishes to several publishers in order
///
/// Every publisher is tried; the first error is returned afterwards.
#[derive(Clone, Default)]
pub struct FanoutPublisher {
    publishers: Vec<Arc<dyn EventPublisher>>,
}

impl FanoutPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publishers.push(publisher);
        self
    }

    pub fn len(&self) -> usize {
        self.publishers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.publishers.is_empty()
    }
}

#[async_trait]
impl EventPublisher for FanoutPublisher {
    async fn publish(&self, event: &SubmissionResultEvent) -> Result<(), PublishError> {
        let mut first_error = None;
        for publisher in &self.publishers {
            if let Err(e) = publisher.publish(event).await {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// Publishers for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Keeps every published event
    #[derive(Debug, Default)]
    pub struct RecordingPublisher {
        events: Mutex<Vec<SubmissionResultEvent>>,
    }

    impl RecordingPublisher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<SubmissionResultEvent> {
            self.events.lock().map(|e| e.clone()).unwrap_or_default()
        }

        pub fn count(&self) -> usize {
            self.events.lock().map(|e| e.len()).unwrap_or(0)
        }
    }

    #[async_trait]
    impl EventPublisher for RecordingPublisher {
        async fn publish(&self, event: &SubmissionResultEvent) -> Result<(), PublishError> {
            if let Ok(mut events) = self.events.lock() {
                events.push(event.clone());
            }
            Ok(())
        }
    }

    /// Rejects every event
    #[derive(Debug, Default)]
    pub struct FailingPublisher;

    #[async_trait]
    impl EventPublisher for FailingPublisher {
        async fn publish(&self, _event: &SubmissionResultEvent) -> Result<(), PublishError> {
            Err(PublishError::Rejected("subscriber unavailable".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{FailingPublisher, RecordingPublisher};
    use super::*;
    use domain_contact::FailureKind;

    fn event() -> SubmissionResultEvent {
        SubmissionResultEvent::new(
            FormId::new(3),
            FieldSet::from([("email".to_string(), "a@x.com".to_string())]),
            CrmResult::failure(FailureKind::ValidationFailed, "No mappable form fields found."),
        )
    }

    #[tokio::test]
    async fn test_broadcast_delivers_to_subscribers() {
        let publisher = BroadcastPublisher::new(8);
        let mut rx = publisher.subscribe();

        let sent = event();
        publisher.publish(&sent).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), sent);
    }

    #[tokio::test]
    async fn test_broadcast_without_subscribers_is_ok() {
        let publisher = BroadcastPublisher::default();
        assert_eq!(publisher.receiver_count(), 0);
        assert!(publisher.publish(&event()).await.is_ok());
    }

    #[tokio::test]
    async fn test_fanout_tries_every_publisher() {
        let recorder = Arc::new(RecordingPublisher::new());
        let fanout = FanoutPublisher::new()
            .with(Arc::new(FailingPublisher))
            .with(Arc::new(TracingPublisher))
            .with(recorder.clone());

        let result = fanout.publish(&event()).await;

        assert!(matches!(result, Err(PublishError::Rejected(_))));
        assert_eq!(recorder.count(), 1);
        assert_eq!(fanout.len(), 3);
    }

    #[test]
    fn test_event_serializes_result_tag() {
        let value = serde_json::to_value(event()).unwrap();
        assert_eq!(value["form_id"], 3);
        assert_eq!(value["result"]["outcome"], "failure");
        assert_eq!(value["fields"]["email"], "a@x.com");
    }
}
