//! Persistence adapter interface
//!
//! The kernel only needs three calls: load once at startup, save after every
//! winner-list change and clear on reset. Storage format and medium belong to
//! the implementations in `raffle-store`.

use crate::error::StoreError;
use crate::types::Winner;
use serde::{Deserialize, Serialize};

/// Default storage key for the winner record
pub const DEFAULT_STORAGE_KEY: &str = "raffle-winners";

/// Persisted record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerRecord {
    /// Winner history, oldest first
    #[serde(default)]
    pub winners: Vec<Winner>,
}

impl WinnerRecord {
    /// Wrap a winner list
    #[must_use]
    pub fn new(winners: Vec<Winner>) -> Self {
        Self { winners }
    }
}

/// Winner history storage
#[cfg_attr(test, mockall::automock)]
pub trait WinnerStore {
    /// Read stored history
    ///
    /// Missing or expired records are `Ok(vec![])`; unreadable ones are errors.
    fn load(&self) -> Result<Vec<Winner>, StoreError>;

    /// Replace stored history
    fn save(&self, winners: &[Winner]) -> Result<(), StoreError>;

    /// Forget stored history
    fn clear(&self) -> Result<(), StoreError>;
}

/// Load from `store`, treating any failure as empty history
pub fn load_or_default<S: WinnerStore + ?Sized>(store: &S) -> Vec<Winner> {
    match store.load() {
        Ok(winners) => winners,
        Err(e) => {
            tracing::warn!("Ignoring unreadable winner history: {}", e);
            Vec::new()
        }
    }
}

impl<S: WinnerStore + ?Sized> WinnerStore for Box<S> {
    fn load(&self) -> Result<Vec<Winner>, StoreError> {
        (**self).load()
    }

    fn save(&self, winners: &[Winner]) -> Result<(), StoreError> {
        (**self).save(winners)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

impl<S: WinnerStore + ?Sized> WinnerStore for std::sync::Arc<S> {
    fn load(&self) -> Result<Vec<Winner>, StoreError> {
        (**self).load()
    }

    fn save(&self, winners: &[Winner]) -> Result<(), StoreError> {
        (**self).save(winners)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}
