//! JSON-file cookie jar so guest state survives process restarts.
//!
//! The whole jar is held in memory and rewritten on every mutation via a
//! temp file + rename. Expired entries are dropped on open and on read.
//! Memory only changes once the file write has landed, so a failed write
//! leaves the jar exactly as it was.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::warn;

use super::{CookieStore, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FileEntry {
    value: String,
    /// Unix seconds.
    expires_at: i64,
}

pub struct FileCookieJar {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, FileEntry>>,
}

impl FileCookieJar {
    /// Open (or lazily create) the jar at `path`.
    ///
    /// A missing file is an empty jar. An unreadable or corrupt file is
    /// logged and treated as empty; it is overwritten on the next write.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let now = unix_now();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, FileEntry>>(&raw) {
                Ok(mut map) => {
                    map.retain(|_, entry| entry.expires_at > now);
                    map
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "cookie jar corrupt, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cookie jar unreadable, starting empty");
                BTreeMap::new()
            }
        };
        Self { path, entries: Mutex::new(entries) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, FileEntry>) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl CookieStore for FileCookieJar {
    fn write(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut next = entries.clone();
        next.insert(
            key.to_string(),
            FileEntry { value: value.to_string(), expires_at: unix_now().saturating_add(ttl_secs) },
        );
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    fn read(&self, key: &str) -> Option<String> {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        entries
            .get(key)
            .filter(|entry| entry.expires_at > unix_now())
            .map(|entry| entry.value.clone())
    }

    fn erase(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }
}

fn unix_now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

#[cfg(test)]
#[path = "file_test.rs"]
mod tests;
