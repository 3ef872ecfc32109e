//! Infrastructure Database Layer
//!
//! PostgreSQL storage for the integration settings and the mirrored page
//! catalogue, using SQLx.
//!
//! # Architecture
//!
//! Repositories own the SQL. Adapters wrap them and implement the domain
//! ports (`SettingsPort`, `PagePort`), translating `DatabaseError` into
//! `PortError` at the boundary.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresSettingsAdapter};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/formbridge")).await?;
//! run_migrations(&pool).await?;
//! let settings = PostgresSettingsAdapter::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, create_pool_from_url, run_migrations, DatabaseConfig};
pub use error::DatabaseError;
pub use repositories::{OptionsRepository, PageRepository, PageRow};
pub use adapters::{PostgresPageAdapter, PostgresSettingsAdapter};
