//! PostgreSQL Settings Adapter
//!
//! Implements `SettingsPort` over the `integration_options` table. Values are
//! stored as JSONB exactly as the settings store hands them over.
//!
//! `add_if_absent` is a single `INSERT .. ON CONFLICT DO NOTHING`, so two
//! processes installing defaults at once cannot overwrite each other.

use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_settings::SettingsPort;

use crate::repositories::OptionsRepository;

const ADAPTER_ID: &str = "postgres-settings-adapter";

/// PostgreSQL-backed implementation of the SettingsPort trait
#[derive(Debug, Clone)]
pub struct PostgresSettingsAdapter {
    repository: OptionsRepository,
    pool: PgPool,
}

impl PostgresSettingsAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: OptionsRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresSettingsAdapter {}

#[async_trait]
impl HealthCheckable for PostgresSettingsAdapter {
    /// Runs `SELECT 1` against the pool
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult::healthy(ADAPTER_ID, latency_ms),
            Err(e) => HealthCheckResult::unhealthy(ADAPTER_ID, latency_ms, format!("Database error: {}", e)),
        }
    }
}

#[async_trait]
impl SettingsPort for PostgresSettingsAdapter {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<Value>, PortError> {
        let value = self.repository.find(key).await?;
        debug!(found = value.is_some(), "Option read");
        Ok(value)
    }

    // Values are never logged: the token lives here.
    #[instrument(skip(self, value))]
    async fn set(&self, key: &str, value: Value) -> Result<(), PortError> {
        self.repository.upsert(key, &value).await?;
        debug!("Option written");
        Ok(())
    }

    #[instrument(skip(self, value))]
    async fn add_if_absent(&self, key: &str, value: Value) -> Result<bool, PortError> {
        let inserted = self.repository.insert_if_absent(key, &value).await?;
        debug!(inserted, "Option default checked");
        Ok(inserted)
    }
}
