//! Application state shared across handlers.

use crate::config::Config;
use crate::store::Store;
use std::sync::atomic::AtomicU64;
use std::time::Instant;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub start_time: Instant,
    pub request_count: AtomicU64,
}

impl AppState {
    /// Create application state from configuration, opening the store.
    pub async fn new(config: Config) -> Result<Self, crate::Error> {
        let store = Store::connect(&config.database_url, config.max_connections).await?;
        Ok(Self::with_store(config, store))
    }

    /// Create application state around an already-open store.
    pub fn with_store(config: Config, store: Store) -> Self {
        Self {
            config,
            store,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }
}
