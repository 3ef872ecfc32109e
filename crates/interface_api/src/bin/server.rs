//! formbridge - API Server Binary
//!
//! Starts the HTTP API: admin settings, connection test, and the inbound
//! submission hook, backed by PostgreSQL and the HubSpot REST API.
//!
//! # Usage
//!
//! ```bash
//! API_DATABASE_URL=postgres://... API_JWT_SECRET=... cargo run --bin formbridge-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_JWT_SECRET` - JWT and nonce signing secret (required in production)
//! * `API_JWT_EXPIRATION_SECS` - JWT token expiration in seconds (default: 3600)
//! * `API_NONCE_TTL_SECS` - Admin nonce lifetime in seconds (default: 43200)
//! * `API_DATABASE_URL` - PostgreSQL connection string
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_HUBSPOT_BASE_URL` - HubSpot API root (default: https://api.hubapi.com)
//! * `API_HUBSPOT_TIMEOUT_SECS` - HubSpot request timeout (default: 30)
//! * `API_HUBSPOT_MAX_REDIRECTS` - Redirects followed (default: 5)
//! * `API_DUPLICATE_FORM_POLICY` - last_page_wins, first_page_wins or aggregate_pages

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_contact::HubSpotAdapter;
use domain_settings::SettingsStore;
use domain_submission::TracingPublisher;
use infra_db::{create_pool, run_migrations, PostgresPageAdapter, PostgresSettingsAdapter};
use interface_api::{config::ApiConfig, create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("Invalid API_* configuration")?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        hubspot = %config.hubspot_base_url,
        "Starting formbridge API server"
    );

    let pool = create_pool(config.database_config()).await?;
    run_migrations(&pool).await?;

    let settings = Arc::new(PostgresSettingsAdapter::new(pool.clone()));
    let installed = SettingsStore::new(settings.clone()).install_defaults().await?;
    tracing::info!(count = installed.len(), "Default settings checked");

    let crm = HubSpotAdapter::new(config.hubspot_config())
        .context("Failed to build the HubSpot client")?;

    let state = AppState::new(
        config.clone(),
        settings,
        Arc::new(PostgresPageAdapter::new(pool)),
        Arc::new(crm),
        Arc::new(TracingPublisher),
    );
    let app = create_router(state);

    let addr: SocketAddr = config.server_addr().parse()?;
    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber; `RUST_LOG` wins over the configured level
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
