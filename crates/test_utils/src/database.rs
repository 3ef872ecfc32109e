//! Database Test Utilities
//!
//! Throwaway PostgreSQL containers with the workspace migrations applied,
//! one per test.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};

const IMAGE: (&str, &str) = ("postgres", "16-alpine");
const CREDENTIALS: (&str, &str) = ("formbridge", "formbridge");
const DATABASE: &str = "formbridge_test";
const READY_LINE: &str = "database system is ready to accept connections";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Builds the connection URL for the test database at `host:port`
pub fn test_database_url(host: &str, port: u16) -> String {
    let (user, password) = CREDENTIALS;
    format!("postgres://{user}:{password}@{host}:{port}/{DATABASE}")
}

/// A migrated database that lives as long as its container
///
/// Dropping the value stops the container.
pub struct TestDatabase {
    _container: ContainerAsync<GenericImage>,
    pool: PgPool,
}

impl TestDatabase {
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Starts a fresh, migrated database for a single test
///
/// # Errors
///
/// Returns an error if docker is unavailable, the container never becomes
/// ready, or a migration fails.
pub async fn create_isolated_test_database() -> Result<TestDatabase, BoxError> {
    let (user, password) = CREDENTIALS;
    let container = GenericImage::new(IMAGE.0, IMAGE.1)
        .with_exposed_port(5432.tcp())
        .with_wait_for(WaitFor::message_on_stderr(READY_LINE))
        .with_env_var("POSTGRES_USER", user)
        .with_env_var("POSTGRES_PASSWORD", password)
        .with_env_var("POSTGRES_DB", DATABASE)
        .start()
        .await?;

    let host = container.get_host().await?.to_string();
    let port = container.get_host_port_ipv4(5432).await?;
    let url = test_database_url(&host, port);

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&url)
        .await?;
    infra_db::run_migrations(&pool).await?;

    Ok(TestDatabase {
        _container: container,
        pool,
    })
}
