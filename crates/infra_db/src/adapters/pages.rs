//! PostgreSQL Page Adapter
//!
//! Implements `PagePort` over the `pages` table.

use std::time::Instant;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_forms::{Page, PagePort};

use crate::repositories::{PageRepository, PageRow};

const ADAPTER_ID: &str = "postgres-page-adapter";

#[derive(Debug, Clone)]
pub struct PostgresPageAdapter {
    repository: PageRepository,
    pool: PgPool,
}

impl PostgresPageAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PageRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn repository(&self) -> &PageRepository {
        &self.repository
    }
}

impl DomainPort for PostgresPageAdapter {}

#[async_trait]
impl HealthCheckable for PostgresPageAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let result = sqlx::query_scalar::<_, i64>("SELECT count(*) FROM pages WHERE false")
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
impl PagePort for PostgresPageAdapter {
    #[instrument(skip(self))]
    async fn published_pages(&self) -> Result<Vec<Page>, PortError> {
        let rows = self.repository.find_published().await?;
        debug!(count = rows.len(), "Published pages loaded");
        Ok(rows.into_iter().filter_map(row_to_page).collect())
    }
}

/// Host ids are unsigned; a negative id is a corrupt row and is skipped
fn row_to_page(row: PageRow) -> Option<Page> {
    match u64::try_from(row.page_id) {
        Ok(id) => Some(Page::new(id, row.title, row.layout)),
        Err(_) => {
            warn!(page_id = row.page_id, "Skipping page with negative id");
            None
        }
    }
}
