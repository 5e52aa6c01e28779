//! Cookie-style key/value storage with per-entry expiry.
//!
//! DESIGN
//! ======
//! `CookieStore` is the raw jar: reads and writes are not gated by anything.
//! Expiry belongs to the jar implementation, so an expired entry simply reads
//! as absent. Consent checks live one layer up in [`persistence`], which is
//! the only code that writes guest data.

pub mod file;
pub mod persistence;

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub use file::FileCookieJar;
pub use persistence::GuestPersistence;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("cookie jar io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("cookie jar encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Raw cookie jar. Implementations enforce `ttl` expiry themselves.
pub trait CookieStore: Send + Sync {
    /// Store `value` under `key` for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backing storage cannot be written.
    fn write(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;

    /// Read a live entry. Expired or missing entries are `None`.
    fn read(&self, key: &str) -> Option<String>;

    /// Remove an entry.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backing storage cannot be written.
    fn erase(&self, key: &str) -> Result<(), StoreError>;
}

// =============================================================================
// IN-MEMORY JAR
// =============================================================================

/// Stand-in expiry for a ttl too large to add to an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

/// Process-local jar. Contents vanish with the process.
#[derive(Default)]
pub struct MemoryCookieJar {
    entries: Mutex<HashMap<String, MemoryEntry>>,
}

impl MemoryCookieJar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn write_at(&self, key: &str, value: &str, ttl: Duration, now: Instant) {
        // A ttl past what `Instant` can represent is clamped, never wrapped.
        let expires_at = now
            .checked_add(ttl)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now);
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.insert(key.to_string(), MemoryEntry { value: value.to_string(), expires_at });
    }

    fn read_at(&self, key: &str, now: Instant) -> Option<String> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }
}

impl CookieStore for MemoryCookieJar {
    fn write(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        self.write_at(key, value, ttl, Instant::now());
        Ok(())
    }

    fn read(&self, key: &str) -> Option<String> {
        self.read_at(key, Instant::now())
    }

    fn erase(&self, key: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
