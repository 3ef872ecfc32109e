//! Pipeline wired to the real HubSpot adapter and a stub CRM server

use std::sync::Arc;

use proptest::prelude::*;
use serde_json::json;

use domain_contact::{FailureKind, HubSpotAdapter, HubSpotConfig, CONTACT_SENT};
use domain_settings::{InMemorySettingsPort, SettingsStore};
use domain_submission::{
    BroadcastPublisher, ConnectionCheck, FanoutPublisher, HandleOutcome, RecordingPublisher,
    SubmissionPipeline, TracingPublisher,
};
use test_utils::builders::SubmissionEventBuilder;
use test_utils::fixtures::{fake_email, STANDARD_MAPPING};
use test_utils::generators::field_set_strategy;
use test_utils::stub_crm::{StubCrmServer, StubResponse};

async fn settings(token: &str, enabled: &[u64]) -> SettingsStore {
    let port = InMemorySettingsPort::with_values([
        ("api_token", json!(token)),
        ("enabled_form_ids", json!(enabled)),
        ("field_mapping", json!(STANDARD_MAPPING)),
    ])
    .await;
    SettingsStore::new(Arc::new(port))
}

fn hubspot(server: &StubCrmServer) -> Arc<HubSpotAdapter> {
    Arc::new(HubSpotAdapter::new(HubSpotConfig::with_base_url(server.base_url())).unwrap())
}

#[tokio::test]
async fn test_submission_reaches_crm_and_subscribers() {
    let server = StubCrmServer::builder()
        .contacts(StubResponse::json(201, json!({"id": "123"})))
        .start()
        .await;
    let broadcast = BroadcastPublisher::new(4);
    let mut subscriber = broadcast.subscribe();
    let publisher = FanoutPublisher::new()
        .with(Arc::new(TracingPublisher))
        .with(Arc::new(broadcast));
    let pipeline = SubmissionPipeline::new(settings("pat-1", &[12]).await, hubspot(&server), Arc::new(publisher));

    let email = fake_email();
    let outcome = pipeline
        .handle(
            SubmissionEventBuilder::new(12)
                .field("name", "Ann")
                .field("email", &email)
                .with_metadata()
                .build(),
        )
        .await;

    assert_eq!(outcome.result().unwrap().message(), CONTACT_SENT);

    let request = server.last_request().unwrap();
    assert_eq!(request.authorization.as_deref(), Some("Bearer pat-1"));
    assert_eq!(
        request.body,
        Some(json!({"properties": {"firstname": "Ann", "email": email}}))
    );

    let event = subscriber.recv().await.unwrap();
    assert_eq!(event.result.data().unwrap()["id"], "123");
}

#[tokio::test]
async fn test_rate_limit_surfaces_in_event() {
    let server = StubCrmServer::builder()
        .contacts(StubResponse::json(429, json!({"message": "rate limited"})))
        .start()
        .await;
    let published = Arc::new(RecordingPublisher::new());
    let pipeline = SubmissionPipeline::new(settings("pat-1", &[12]).await, hubspot(&server), published.clone());

    pipeline
        .handle(SubmissionEventBuilder::new(12).field("email", "a@x.com").build())
        .await;

    let event = &published.events()[0];
    assert_eq!(event.result.status_code(), Some(429));
    assert_eq!(event.result.message(), "rate limited");
    assert_eq!(event.result.kind(), Some(FailureKind::RemoteApi));
    assert_eq!(server.request_count(), 1);
}

#[tokio::test]
async fn test_missing_token_never_reaches_crm() {
    let server = StubCrmServer::responding(StubResponse::json(200, json!({}))).await;
    let published = Arc::new(RecordingPublisher::new());
    let pipeline = SubmissionPipeline::new(settings("", &[12]).await, hubspot(&server), published.clone());

    pipeline
        .handle(SubmissionEventBuilder::new(12).field("email", "a@x.com").build())
        .await;

    assert_eq!(server.request_count(), 0);
    assert_eq!(
        published.events()[0].result.kind(),
        Some(FailureKind::ConfigurationMissing)
    );
}

#[tokio::test]
async fn test_connection_check_uses_stored_token() {
    let server = StubCrmServer::builder()
        .account_info(StubResponse::json(200, json!({"portalId": 777})))
        .start()
        .await;
    let check = ConnectionCheck::new(settings("pat-9", &[]).await, hubspot(&server));

    let result = check.run().await;

    assert_eq!(result.message(), "Successfully connected to HubSpot (Account ID: 777)");
    assert_eq!(
        server.last_request().unwrap().authorization.as_deref(),
        Some("Bearer pat-9")
    );
}

#[tokio::test]
async fn test_connection_check_without_token() {
    let server = StubCrmServer::responding(StubResponse::json(200, json!({}))).await;
    let check = ConnectionCheck::new(settings("", &[]).await, hubspot(&server));

    let result = check.run().await;

    assert_eq!(result.message(), "HubSpot API token is not configured.");
    assert_eq!(server.request_count(), 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn disabled_forms_make_no_calls_and_no_events(
        enabled in prop::collection::btree_set(1u64..50, 0..5),
        form_id in 50u64..1000,
        fields in field_set_strategy(),
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let server = StubCrmServer::responding(StubResponse::json(200, json!({"id": "1"}))).await;
            let published = Arc::new(RecordingPublisher::new());
            let enabled: Vec<u64> = enabled.into_iter().collect();
            let pipeline = SubmissionPipeline::new(settings("pat-1", &enabled).await, hubspot(&server), published.clone());

            let mut builder = SubmissionEventBuilder::new(form_id);
            for (name, value) in fields {
                builder = builder.field(name, value);
            }
            let outcome = pipeline.handle(builder.build()).await;

            assert_eq!(outcome, HandleOutcome::Skipped);
            assert_eq!(server.request_count(), 0);
            assert_eq!(published.count(), 0);
        });
    }
}
