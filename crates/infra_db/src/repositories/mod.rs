//! Repository implementations
//!
//! Plain SQL access to each table; the adapters layer the domain ports on top.

pub mod options;
pub mod pages;

pub use options::OptionsRepository;
pub use pages::{PageRepository, PageRow};
