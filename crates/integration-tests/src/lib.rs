//! Shared fixtures for the cross-crate tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use domains::{DomainError, KeyValueStore, Result};
use services::{ManualClock, Store, UuidV7Ids};
use storage_adapters::MemoryKeyValueStore;

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap()
}

pub struct Harness {
    pub store: Arc<Store>,
    pub kv: Arc<MemoryKeyValueStore>,
    pub clock: Arc<ManualClock>,
}

/// A seeded store over an in-memory medium and a manual clock.
pub async fn harness() -> Harness {
    let kv = Arc::new(MemoryKeyValueStore::new());
    let clock = Arc::new(ManualClock::new(start()));
    let store = Store::open(kv.clone(), clock.clone(), Arc::new(UuidV7Ids))
        .await
        .unwrap();
    Harness {
        store: Arc::new(store),
        kv,
        clock,
    }
}

/// Wraps a medium and refuses writes to keys ending in `suffix`, the way a
/// full browser quota refuses a write.
pub struct RefusingWrites<K> {
    inner: K,
    suffix: &'static str,
}

impl<K> RefusingWrites<K> {
    pub fn new(inner: K, suffix: &'static str) -> Self {
        Self { inner, suffix }
    }
}

#[async_trait]
impl<K: KeyValueStore> KeyValueStore for RefusingWrites<K> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        if key.ends_with(self.suffix) {
            return Err(DomainError::storage(format!("quota exceeded writing {key}")));
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key).await
    }
}
