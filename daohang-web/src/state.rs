//! Application state shared by all handlers

use crate::{WebConfig, WebError, WebResult};
use daohang_applications::DaohangApplication;
use daohang_core::{DaohangConfig, KeyValueStore, MemoryKvStore, StorageBackend};
use std::sync::Arc;
use tracing::info;

#[cfg(feature = "sqlite")]
use crate::database::SqliteKvStore;

/// Cloned into every request; everything mutable lives behind the key-value store
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: WebConfig,
    /// Site, security and storage settings
    pub settings: Arc<DaohangConfig>,
    /// Sessions, credentials and the navigation document
    pub application: Arc<DaohangApplication>,
}

impl AppState {
    /// Create state with the store selected by `settings.storage`
    pub async fn new(config: WebConfig, settings: DaohangConfig) -> WebResult<Self> {
        let store = open_store(&settings).await?;
        Ok(Self::with_store(config, settings, store))
    }

    /// Create state over an existing store
    pub fn with_store(
        config: WebConfig,
        settings: DaohangConfig,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let application = Arc::new(DaohangApplication::new(&settings, store));

        Self {
            config,
            settings: Arc::new(settings),
            application,
        }
    }
}

async fn open_store(settings: &DaohangConfig) -> WebResult<Arc<dyn KeyValueStore>> {
    match settings.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory key-value store; data is lost on restart");
            Ok(Arc::new(MemoryKvStore::new()))
        }
        StorageBackend::Sqlite => open_sqlite(settings).await,
    }
}

#[cfg(feature = "sqlite")]
async fn open_sqlite(settings: &DaohangConfig) -> WebResult<Arc<dyn KeyValueStore>> {
    let url = settings
        .storage
        .database_url
        .as_deref()
        .ok_or_else(|| WebError::Config("storage.database_url is not set".to_string()))?;

    Ok(Arc::new(SqliteKvStore::connect(url).await?))
}

#[cfg(not(feature = "sqlite"))]
async fn open_sqlite(_settings: &DaohangConfig) -> WebResult<Arc<dyn KeyValueStore>> {
    Err(WebError::Config(
        "The sqlite backend needs the `sqlite` feature".to_string(),
    ))
}
