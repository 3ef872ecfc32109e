//! HTTP API Layer
//!
//! The admin and host-facing surface of formbridge, using Axum.
//!
//! # Routes
//!
//! - `GET /health`, `GET /health/ready`: public
//! - `GET|POST /admin/settings`, `GET /admin/nonce`, `POST /admin/test-connection`:
//!   bearer JWT with the `manage_options` role; state-changing actions also
//!   need an `X-Admin-Nonce` header
//! - `POST /hooks/form-submitted`: bearer JWT with the `form_host` role
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(config, settings, pages, crm, publisher);
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_contact::CrmPort;
use domain_forms::{FormDiscovery, LayoutFormIdExtractor, PagePort};
use domain_settings::{SettingsPort, SettingsStore};
use domain_submission::{ConnectionCheck, EventPublisher, SubmissionPipeline};

use crate::config::ApiConfig;
use crate::handlers::{admin, health, hooks, settings};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub settings: SettingsStore,
    pub discovery: FormDiscovery,
    pub pipeline: SubmissionPipeline,
    pub connection: ConnectionCheck,
}

impl AppState {
    /// Wires the services over the given ports
    pub fn new(
        config: ApiConfig,
        settings: Arc<dyn SettingsPort>,
        pages: Arc<dyn PagePort>,
        crm: Arc<dyn CrmPort>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        let settings = SettingsStore::new(settings);
        let discovery = FormDiscovery::new(pages, Arc::new(LayoutFormIdExtractor::new()))
            .with_policy(config.duplicate_form_policy);
        let pipeline = SubmissionPipeline::new(settings.clone(), crm.clone(), publisher);
        let connection = ConnectionCheck::new(settings.clone(), crm);

        Self {
            config,
            settings,
            discovery,
            pipeline,
            connection,
        }
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let admin_routes = Router::new()
        .route("/settings", get(settings::get_settings).post(settings::save_settings))
        .route("/nonce", get(admin::issue_nonce))
        .route("/test-connection", post(admin::test_connection));

    let hook_routes = Router::new().route("/form-submitted", post(hooks::form_submitted));

    let protected_routes = Router::new()
        .nest("/admin", admin_routes)
        .nest("/hooks", hook_routes)
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
