//! JSON file store
//!
//! One file per storage key under a data directory. Writes go to a sibling
//! temp file that is renamed into place, so a crash mid-write leaves the
//! previous record intact.

use crate::envelope::{Envelope, DEFAULT_TTL_DAYS};
use chrono::{Duration, Utc};
use raffle_kernel::persistence::{WinnerRecord, WinnerStore, DEFAULT_STORAGE_KEY};
use raffle_kernel::{StoreError, Winner};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Winner history in `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
    key: String,
    ttl: Duration,
}

impl JsonFileStore {
    /// Store under `dir` with the default key and expiry
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            key: DEFAULT_STORAGE_KEY.to_string(),
            ttl: Duration::days(DEFAULT_TTL_DAYS),
        }
    }

    /// With storage key
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// With record lifetime
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Path of the record file
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(&self.key)))
    }

    /// Storage key
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    fn read_envelope(&self, path: &Path) -> Result<Option<Envelope>, StoreError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io_error(path, e)),
        };
        let envelope: Envelope = serde_json::from_slice(&bytes).map_err(StoreError::malformed)?;
        if envelope.key != self.key {
            return Err(StoreError::malformed(format!(
                "record key '{}' does not match '{}'",
                envelope.key, self.key
            )));
        }
        Ok(Some(envelope))
    }
}

impl WinnerStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Winner>, StoreError> {
        let path = self.path();
        match self.read_envelope(&path)? {
            None => {
                tracing::debug!("No winner history at {}", path.display());
                Ok(Vec::new())
            }
            Some(envelope) if envelope.is_expired(Utc::now()) => {
                tracing::info!(
                    "Winner history at {} expired on {}",
                    path.display(),
                    envelope.expires_at
                );
                Ok(Vec::new())
            }
            Some(envelope) => Ok(envelope.record.winners),
        }
    }

    fn save(&self, winners: &[Winner]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::io_error(&self.dir, e))?;

        let envelope = Envelope::seal(
            self.key.clone(),
            WinnerRecord::new(winners.to_vec()),
            Utc::now(),
            self.ttl,
        );
        let json = serde_json::to_vec_pretty(&envelope).map_err(StoreError::malformed)?;

        let path = self.path();
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| StoreError::io_error(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::io_error(&path, e))?;

        tracing::debug!("Saved {} winners to {}", winners.len(), path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let path = self.path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io_error(path, e)),
        }
    }
}

/// Keep keys usable as file names
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_becomes_safe_file_name() {
        let store = JsonFileStore::new("/tmp/x").with_key("../raffle winners");
        assert_eq!(store.path(), PathBuf::from("/tmp/x/___raffle_winners.json"));
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(store.load().unwrap().is_empty());
        assert!(store.clear().is_ok());
    }
}
