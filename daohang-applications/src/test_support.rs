//! Store doubles for unit tests

use async_trait::async_trait;
use daohang_core::{storage_error, DaohangResult, KeyValueStore, MemoryKvStore, PutOptions};
use std::sync::Arc;
use tokio::sync::Mutex;

/// A store whose every call fails
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> DaohangResult<Option<String>> {
        Err(storage_error!("store offline", "failing_store"))
    }

    async fn put(&self, _key: &str, _value: &str, _options: PutOptions) -> DaohangResult<()> {
        Err(storage_error!("store offline", "failing_store"))
    }

    async fn delete(&self, _key: &str) -> DaohangResult<()> {
        Err(storage_error!("store offline", "failing_store"))
    }
}

/// Memory store that refuses deletions
pub struct DeleteFailsStore {
    inner: MemoryKvStore,
}

impl DeleteFailsStore {
    pub fn new(inner: MemoryKvStore) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl KeyValueStore for DeleteFailsStore {
    async fn get(&self, key: &str) -> DaohangResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: &str, options: PutOptions) -> DaohangResult<()> {
        self.inner.put(key, value, options).await
    }

    async fn delete(&self, _key: &str) -> DaohangResult<()> {
        Err(storage_error!("delete rejected", "delete_fails_store"))
    }
}

/// Memory store that remembers the key and options of every `put`
#[derive(Clone, Default)]
pub struct RecordingStore {
    inner: MemoryKvStore,
    puts: Arc<Mutex<Vec<(String, PutOptions)>>>,
}

impl RecordingStore {
    pub async fn puts(&self) -> Vec<(String, PutOptions)> {
        self.puts.lock().await.clone()
    }
}

#[async_trait]
impl KeyValueStore for RecordingStore {
    async fn get(&self, key: &str) -> DaohangResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: &str, options: PutOptions) -> DaohangResult<()> {
        self.puts.lock().await.push((key.to_string(), options));
        self.inner.put(key, value, options).await
    }

    async fn delete(&self, key: &str) -> DaohangResult<()> {
        self.inner.delete(key).await
    }
}
