//! Process-local store with the same expiry rules as the file store

use crate::envelope::{Envelope, DEFAULT_TTL_DAYS};
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use raffle_kernel::persistence::{WinnerRecord, WinnerStore, DEFAULT_STORAGE_KEY};
use raffle_kernel::{StoreError, Winner};
use std::sync::Arc;

/// In-memory winner history
///
/// Clones share the same slot.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<Envelope>>>,
    ttl: Duration,
}

impl MemoryStore {
    /// Empty store with the default expiry
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            ttl: Duration::days(DEFAULT_TTL_DAYS),
        }
    }

    /// With record lifetime
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Raw stored envelope, if any
    #[must_use]
    pub fn envelope(&self) -> Option<Envelope> {
        self.slot.lock().clone()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WinnerStore for MemoryStore {
    fn load(&self) -> Result<Vec<Winner>, StoreError> {
        let mut slot = self.slot.lock();
        if slot.as_ref().is_some_and(|e| e.is_expired(Utc::now())) {
            *slot = None;
        }
        Ok(slot
            .as_ref()
            .map(|e| e.record.winners.clone())
            .unwrap_or_default())
    }

    fn save(&self, winners: &[Winner]) -> Result<(), StoreError> {
        let envelope = Envelope::seal(
            DEFAULT_STORAGE_KEY,
            WinnerRecord::new(winners.to_vec()),
            Utc::now(),
            self.ttl,
        );
        *self.slot.lock() = Some(envelope);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot.lock() = None;
        Ok(())
    }
}
