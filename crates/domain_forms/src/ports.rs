//! Form Domain Ports
//!
//! Pages and their stored builder layouts live in the host's content store.
//! `PagePort` is the read-only view of that store used by form discovery.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use core_kernel::{DomainPort, PageId, PortError};

/// A published page and its stored builder layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub title: String,
    /// Serialized builder layout; `None` for pages not built with the form builder
    pub layout: Option<String>,
}

impl Page {
    /// Creates a page with a layout document
    pub fn new(id: u64, title: impl Into<String>, layout: Option<String>) -> Self {
        Self {
            id: PageId::new(id),
            title: title.into(),
            layout,
        }
    }
}

/// Read access to the host's published pages
#[async_trait]
pub trait PagePort: DomainPort {
    /// All published pages, in the host's natural order
    async fn published_pages(&self) -> Result<Vec<Page>, PortError>;
}

/// Fixed page list for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Debug, Default)]
    pub struct StaticPagePort {
        pages: Vec<Page>,
        failing: AtomicBool,
    }

    impl StaticPagePort {
        pub fn new(pages: Vec<Page>) -> Self {
            Self {
                pages,
                failing: AtomicBool::new(false),
            }
        }

        /// A port whose every query fails
        pub fn failing() -> Self {
            Self {
                pages: Vec::new(),
                failing: AtomicBool::new(true),
            }
        }
    }

    impl DomainPort for StaticPagePort {}

    #[async_trait]
    impl PagePort for StaticPagePort {
        async fn published_pages(&self) -> Result<Vec<Page>, PortError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(PortError::connection("content store unavailable"));
            }
            Ok(self.pages.clone())
        }
    }
}
