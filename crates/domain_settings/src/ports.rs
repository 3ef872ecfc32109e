//! Settings Domain Ports
//!
//! The host supplies durable key-value storage; this crate only decides what
//! goes into it. `SettingsPort` is that storage seen from the inside.
//!
//! # Contract
//!
//! - `get` returns `None` for a key that was never written
//! - `set` is a durable write visible to every later `get`, in this process
//!   and after a restart
//! - concurrent writers race; the last write wins
//! - storage failures are reported as `PortError` and are not interpreted
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_settings::{SettingsPort, SettingsStore};
//! use std::sync::Arc;
//!
//! let port: Arc<dyn SettingsPort> = Arc::new(PostgresSettingsAdapter::new(pool));
//! let store = SettingsStore::new(port);
//! let token = store.api_token().await?;
//! ```

use async_trait::async_trait;
use serde_json::Value;

use core_kernel::{DomainPort, HealthCheckable, PortError};

/// Raw key-value persistence supplied by the host
#[async_trait]
pub trait SettingsPort: DomainPort + HealthCheckable {
    /// Reads the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<Value>, PortError>;

    /// Stores `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: Value) -> Result<(), PortError>;

    /// Stores `value` only when `key` has never been written
    ///
    /// Returns true when the value was written. The default implementation
    /// is a read followed by a write; adapters with an atomic insert should
    /// override it.
    async fn add_if_absent(&self, key: &str, value: Value) -> Result<bool, PortError> {
        if self.get(key).await?.is_some() {
            return Ok(false);
        }
        self.set(key, value).await?;
        Ok(true)
    }
}

/// In-memory implementation of SettingsPort for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use chrono::Utc;
    use core_kernel::{AdapterHealth, HealthCheckResult};

    /// Key-value map behind a lock, with switches for failure injection
    #[derive(Debug, Default)]
    pub struct InMemorySettingsPort {
        values: Arc<RwLock<HashMap<String, Value>>>,
        writes: AtomicUsize,
        fail_reads: AtomicBool,
        fail_writes: AtomicBool,
    }

    impl InMemorySettingsPort {
        /// Creates an empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates the store
        pub async fn with_values<I, K>(values: I) -> Self
        where
            I: IntoIterator<Item = (K, Value)>,
            K: Into<String>,
        {
            let port = Self::new();
            {
                let mut map = port.values.write().await;
                for (key, value) in values {
                    map.insert(key.into(), value);
                }
            }
            port
        }

        /// Makes every subsequent read fail with a connection error
        pub fn fail_reads(&self, fail: bool) {
            self.fail_reads.store(fail, Ordering::SeqCst);
        }

        /// Makes every subsequent write fail with a connection error
        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        /// Number of successful writes so far
        pub fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        /// Current raw value of a key
        pub async fn raw(&self, key: &str) -> Option<Value> {
            self.values.read().await.get(key).cloned()
        }
    }

    impl DomainPort for InMemorySettingsPort {}

    #[async_trait]
    impl HealthCheckable for InMemorySettingsPort {
        async fn health_check(&self) -> HealthCheckResult {
            let status = if self.fail_reads.load(Ordering::SeqCst) {
                AdapterHealth::Unhealthy
            } else {
                AdapterHealth::Healthy
            };
            HealthCheckResult {
                adapter_id: "in-memory-settings".to_string(),
                status,
                latency_ms: 0,
                message: None,
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl SettingsPort for InMemorySettingsPort {
        async fn get(&self, key: &str) -> Result<Option<Value>, PortError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(PortError::connection("settings store unavailable"));
            }
            Ok(self.values.read().await.get(key).cloned())
        }

        async fn set(&self, key: &str, value: Value) -> Result<(), PortError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(PortError::connection("settings store unavailable"));
            }
            self.values.write().await.insert(key.to_string(), value);
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}
