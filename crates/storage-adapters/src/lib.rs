//! # storage-adapters
//!
//! Implementations of the `KeyValueStore` port.
//!
//! - [`memory`]: process-local map, used by tests and the `memory` backend
//! - [`file`]: one file per key under a data directory (feature `kv-file`)

pub mod memory;

#[cfg(feature = "kv-file")]
pub mod file;

pub use memory::MemoryKeyValueStore;

#[cfg(feature = "kv-file")]
pub use file::FileKeyValueStore;
