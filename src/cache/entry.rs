//! Cache Entry Module
//!
//! Defines the stored unit shared by both tiers: an opaque JSON payload
//! plus an optional absolute expiry timestamp.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Cache Entry ==
/// A single cache entry as held in memory and persisted on disk.
///
/// The payload is kept in its serialized (`serde_json::Value`) form so a
/// memory-tier read observes the same serialize/deserialize round trip as
/// a disk-tier read. The persisted JSON object carries exactly these two
/// fields, with `expires_at` omitted entirely for entries that never
/// expire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
    /// The stored value
    pub payload: Value,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry with an optional TTL.
    ///
    /// # Arguments
    /// * `payload` - The already-serialized value to store
    /// * `ttl` - Optional TTL; the entry expires that far from now
    pub fn new(payload: Value, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|ttl| {
            let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
            current_timestamp_ms().saturating_add(millis)
        });

        Self {
            expires_at,
            payload,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is considered expired when the current
    /// time is greater than or equal to the expiration time, so an entry
    /// is live strictly until its TTL has fully elapsed.
    ///
    /// # Returns
    /// - `true` if the entry has a TTL and the current time >= expiration time
    /// - `false` if the entry has no TTL (never expires) or TTL hasn't elapsed
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
