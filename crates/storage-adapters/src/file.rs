//! # File-backed key-value store
//!
//! Each key is a file `<root>/<key>.json`. Every write goes to its own
//! uniquely named temp file in the root, which is then renamed over the
//! target. Readers see either the previous value or the new one in full;
//! concurrent writers to one key are last-write-wins.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use domains::{DomainError, KeyValueStore, Result};
use tempfile::NamedTempFile;
use tokio::fs;

pub struct FileKeyValueStore {
    /// Root directory for all keys (e.g. "./data")
    root_path: PathBuf,
}

impl FileKeyValueStore {
    /// Creates the root directory if it does not exist yet.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root_path = root.into();
        fs::create_dir_all(&root_path)
            .await
            .map_err(|e| io_error("create data directory", &root_path, e))?;
        tracing::info!(path = %root_path.display(), "file key-value store opened");
        Ok(Self { root_path })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(DomainError::storage(format!("invalid key {key:?}")));
        }
        Ok(self.root_path.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error("read", &path, e)),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let path = self.path_for(key)?;
        let root = self.root_path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&root, &path, &value))
            .await
            .map_err(|e| DomainError::storage(format!("write task failed: {e}")))?
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error("remove", &path, e)),
        }
    }
}

/// Temp file in `dir` (same filesystem as `path`), then rename.
fn write_atomic(dir: &Path, path: &Path, value: &str) -> Result<()> {
    let mut tmp =
        NamedTempFile::new_in(dir).map_err(|e| io_error("create temp file in", dir, e))?;
    tmp.write_all(value.as_bytes())
        .map_err(|e| io_error("write", tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| io_error("replace", path, e.error))?;
    Ok(())
}

fn io_error(action: &str, path: &Path, e: std::io::Error) -> DomainError {
    DomainError::storage(format!("failed to {action} {}: {e}", path.display()))
}
