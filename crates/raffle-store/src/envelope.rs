//! Keyed, expiring wrapper around the winner record

use chrono::{DateTime, Duration, Utc};
use raffle_kernel::persistence::WinnerRecord;
use serde::{Deserialize, Serialize};

/// Default lifetime of a stored record
pub const DEFAULT_TTL_DAYS: i64 = 30;

/// Longest lifetime a record can be given; longer ones are clamped
pub const MAX_TTL_DAYS: i64 = 36_500;

/// Stored form of a [`WinnerRecord`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Storage key the record was written under
    pub key: String,
    /// When the record was written
    pub saved_at: DateTime<Utc>,
    /// After this instant the record reads as empty
    pub expires_at: DateTime<Utc>,
    /// Payload
    pub record: WinnerRecord,
}

impl Envelope {
    /// Wrap `record` under `key`, valid for `ttl` from `now`
    ///
    /// `ttl` is clamped to `0..=MAX_TTL_DAYS` days.
    #[must_use]
    pub fn seal(key: impl Into<String>, record: WinnerRecord, now: DateTime<Utc>, ttl: Duration) -> Self {
        let ttl = ttl.clamp(Duration::zero(), Duration::days(MAX_TTL_DAYS));
        Self {
            key: key.into(),
            saved_at: now,
            expires_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
            record,
        }
    }

    /// Whether the record has expired at `now`
    #[inline]
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
