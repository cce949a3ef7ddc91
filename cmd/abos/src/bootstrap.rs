//! Wiring: logging and the store, assembled from `Settings`.

use std::sync::Arc;

use anyhow::Context;
use configs::{LogFormat, Settings, StorageBackend};
use domains::KeyValueStore;
use services::{Store, SystemClock, UuidV7Ids};
use storage_adapters::MemoryKeyValueStore;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so command output on stdout stays machine readable.
/// `RUST_LOG` wins over `log.level`.
pub fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match settings.log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }

    if let Some(env_file) = &settings.env_file {
        tracing::debug!(path = %env_file.display(), "loaded .env");
    }
}

async fn key_value_store(settings: &Settings) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    match settings.storage.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryKeyValueStore::new())),
        #[cfg(feature = "kv-file")]
        StorageBackend::File => {
            let kv = storage_adapters::FileKeyValueStore::open(&settings.storage.data_dir)
                .await
                .with_context(|| {
                    format!(
                        "cannot open data directory {}",
                        settings.storage.data_dir.display()
                    )
                })?;
            Ok(Arc::new(kv))
        }
        #[cfg(not(feature = "kv-file"))]
        StorageBackend::File => {
            anyhow::bail!("the file backend is not compiled in; rebuild with feature kv-file")
        }
    }
}

/// Builds the store and, unless disabled, seeds empty collections.
pub async fn open_store(settings: &Settings) -> anyhow::Result<Arc<Store>> {
    let kv = key_value_store(settings).await?;
    let store = Store::new(kv, Arc::new(SystemClock), Arc::new(UuidV7Ids))
        .with_key_prefix(settings.storage.key_prefix.clone());

    if settings.storage.seed_demo_data {
        store.initialize().await.context("failed to seed the store")?;
    }
    Ok(Arc::new(store))
}
