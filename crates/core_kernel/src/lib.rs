//! Core Kernel - Foundational types shared by every formbridge crate
//!
//! This crate provides the building blocks used across all domain modules:
//! - Strongly-typed identifiers for host-owned and system-minted entities
//! - Port error and health-check types for the ports-and-adapters layout
//! - The kernel error type

pub mod identifiers;
pub mod ports;
pub mod error;

pub use identifiers::{FormId, PageId, EventId};
pub use ports::{
    PortError, DomainPort, AdapterHealth, HealthCheckResult, HealthCheckable,
};
pub use error::CoreError;
