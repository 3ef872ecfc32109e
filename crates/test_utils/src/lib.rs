//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! formbridge test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built mappings, layouts, and contact data
//! - `builders`: Builders for submissions and pages
//! - `database`: PostgreSQL test container management
//! - `assertions`: Assertion helpers for property maps and health checks
//! - `generators`: Property-based test data generators
//! - `stub_crm`: Local HTTP server standing in for the CRM API

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;
pub mod stub_crm;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
