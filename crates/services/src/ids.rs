//! Record id generation.
//!
//! We use UUID v7: a millisecond timestamp followed by random bits, so ids
//! sort roughly by creation time and collisions are not a practical concern.

use std::sync::atomic::{AtomicU64, Ordering};

use domains::{IdGenerator, RecordId};
use uuid::Uuid;

#[derive(Debug, Default, Clone, Copy)]
pub struct UuidV7Ids;

impl IdGenerator for UuidV7Ids {
    fn next_id(&self) -> RecordId {
        RecordId::new(Uuid::now_v7().to_string())
    }
}

/// Deterministic ids (`<prefix>-1`, `<prefix>-2`, ...) for reproducible
/// fixtures.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> RecordId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        RecordId::new(format!("{}-{n}", self.prefix))
    }
}
