//! Stub CRM HTTP Server
//!
//! A local axum server standing in for the HubSpot API. Each path answers
//! with a canned response and every request is recorded, so tests can check
//! both what was sent and that nothing was sent at all.
//!
//! ```rust,ignore
//! let server = StubCrmServer::builder()
//!     .route("/crm/v3/objects/contacts", StubResponse::json(201, json!({"id": "123"})))
//!     .start()
//!     .await;
//!
//! let adapter = HubSpotAdapter::new(HubSpotConfig::with_base_url(server.base_url()))?;
//! // ...
//! assert_eq!(server.request_count(), 1);
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub const CONTACTS_PATH: &str = "/crm/v3/objects/contacts";
pub const ACCOUNT_INFO_PATH: &str = "/account-info/v3/details";

/// Canned response for one path
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
    pub content_type: &'static str,
    pub delay: Option<Duration>,
}

impl StubResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            content_type: "application/json",
            delay: None,
        }
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: "text/plain",
            delay: None,
        }
    }

    /// Redirect to `location`
    pub fn redirect(location: &str) -> Self {
        Self {
            status: 302,
            body: location.to_string(),
            content_type: "text/plain",
            delay: None,
        }
    }

    /// Holds the response back for `delay`
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// A request as received by the stub
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
struct StubState {
    responses: Arc<HashMap<String, StubResponse>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Builder for [`StubCrmServer`]
#[derive(Debug, Default)]
pub struct StubCrmServerBuilder {
    responses: HashMap<String, StubResponse>,
}

impl StubCrmServerBuilder {
    /// Answers requests to `path` with `response`; unknown paths get 404
    pub fn route(mut self, path: &str, response: StubResponse) -> Self {
        self.responses.insert(path.to_string(), response);
        self
    }

    /// Answers the contacts endpoint
    pub fn contacts(self, response: StubResponse) -> Self {
        self.route(CONTACTS_PATH, response)
    }

    /// Answers the account-info endpoint
    pub fn account_info(self, response: StubResponse) -> Self {
        self.route(ACCOUNT_INFO_PATH, response)
    }

    /// Binds to an ephemeral local port and starts serving
    pub async fn start(self) -> StubCrmServer {
        let state = StubState {
            responses: Arc::new(self.responses),
            requests: Arc::new(Mutex::new(Vec::new())),
        };

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub CRM listener");
        let addr = listener.local_addr().expect("Stub CRM listener has no address");

        let router = Router::new().fallback(handle).with_state(state.clone());
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        StubCrmServer {
            addr,
            requests: state.requests,
            _shutdown: shutdown_tx,
        }
    }
}

/// Running stub server; stops when dropped
pub struct StubCrmServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    _shutdown: oneshot::Sender<()>,
}

impl StubCrmServer {
    pub fn builder() -> StubCrmServerBuilder {
        StubCrmServerBuilder::default()
    }

    /// A server answering both endpoints with the same response
    pub async fn responding(response: StubResponse) -> Self {
        Self::builder()
            .contacts(response.clone())
            .account_info(response)
            .start()
            .await
    }

    /// Origin to use as the CRM base URL
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// The most recent request, if any
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests().pop()
    }
}

/// A base URL on which nothing is listening
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener.local_addr().expect("Probe listener has no address");
    drop(listener);
    format!("http://{addr}")
}

async fn handle(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let recorded = RecordedRequest {
        method,
        path: uri.path().to_string(),
        authorization: header_text(header::AUTHORIZATION),
        content_type: header_text(header::CONTENT_TYPE),
        body: serde_json::from_slice(&body).ok(),
    };
    if let Ok(mut requests) = state.requests.lock() {
        requests.push(recorded);
    }

    let Some(stub) = state.responses.get(uri.path()).cloned() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    if let Some(delay) = stub.delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(stub.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_redirection() {
        return (status, [(header::LOCATION, stub.body)]).into_response();
    }
    (status, [(header::CONTENT_TYPE, stub.content_type)], stub.body).into_response()
}
