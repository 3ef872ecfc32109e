//! Domain Adapters
//!
//! PostgreSQL implementations of the domain ports:
//!
//! - **PostgresSettingsAdapter**: `SettingsPort` over `integration_options`
//! - **PostgresPageAdapter**: `PagePort` over `pages`
//!
//! ```rust,ignore
//! use infra_db::adapters::{PostgresPageAdapter, PostgresSettingsAdapter};
//!
//! let settings: Arc<dyn SettingsPort> = Arc::new(PostgresSettingsAdapter::new(pool.clone()));
//! let pages: Arc<dyn PagePort> = Arc::new(PostgresPageAdapter::new(pool));
//! ```

pub mod settings;
pub mod pages;

pub use settings::PostgresSettingsAdapter;
pub use pages::PostgresPageAdapter;
