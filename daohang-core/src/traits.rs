//! Core trait definitions

use crate::error::DaohangResult;
use async_trait::async_trait;
use std::time::Duration;

/// Options accepted by [`KeyValueStore::put`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PutOptions {
    /// Let the store evict the entry on its own once this much time has passed
    pub expiration_ttl: Option<Duration>,
}

impl PutOptions {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            expiration_ttl: Some(ttl),
        }
    }
}

/// String-keyed, string-valued persistent map.
///
/// This is the only persistence capability the application needs. Every call may
/// be delayed or fail independently; implementations must not retry on behalf of
/// the caller.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `None` when the key is absent or has expired
    async fn get(&self, key: &str) -> DaohangResult<Option<String>>;

    /// Write a value, replacing any previous one
    async fn put(&self, key: &str, value: &str, options: PutOptions) -> DaohangResult<()>;

    /// Remove a key. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> DaohangResult<()>;
}
