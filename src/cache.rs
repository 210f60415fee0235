//! Persistent age cache: registrable domain -> last-known registration date.
//!
//! One JSON file per registrable domain under a cache directory. Entries
//! expire after [`CACHE_TTL`] and are evicted eagerly on read rather than by
//! a background sweep. The cache is a politeness/performance optimization,
//! never a correctness dependency: callers log and swallow write failures.

use std::path::PathBuf;
use std::time::SystemTime;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::CACHE_TTL;
use crate::storage;

/// A cached registration date together with when it was fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgeCacheEntry {
    /// The cache key this entry was stored under.
    pub registrable_domain: String,
    /// Registration date reported by the registry.
    pub registration_date: DateTime<Utc>,
    /// When the entry was written; drives TTL expiry.
    pub cached_at: SystemTime,
}

/// File-backed cache of registration dates.
#[derive(Debug, Clone)]
pub struct AgeCache {
    dir: PathBuf,
}

impl AgeCache {
    /// Creates a cache rooted at `dir`. The directory is created lazily on
    /// the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn entry_path(&self, registrable_domain: &str) -> PathBuf {
        self.dir
            .join(format!("{}.json", registrable_domain.replace('.', "_")))
    }

    /// Returns the cached entry, or `None` when no entry exists, the entry
    /// is malformed, or it is older than the TTL. Expired and malformed
    /// entries are deleted as a side effect of the read.
    pub fn get(&self, registrable_domain: &str) -> Option<AgeCacheEntry> {
        let path = self.entry_path(registrable_domain);
        let entry: AgeCacheEntry = match storage::load_json(&path) {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Dropping unreadable cache entry for {registrable_domain}: {e:#}");
                let _ = std::fs::remove_file(&path);
                return None;
            }
        };

        let age = entry.cached_at.elapsed().unwrap_or_default();
        if age > CACHE_TTL {
            log::debug!("Cache entry for {registrable_domain} expired, evicting");
            let _ = std::fs::remove_file(&path);
            return None;
        }

        Some(entry)
    }

    /// Stores a registration date, overwriting any previous entry
    /// (last-write-wins, no versioning).
    pub fn put(
        &self,
        registrable_domain: &str,
        registration_date: DateTime<Utc>,
    ) -> Result<()> {
        let entry = AgeCacheEntry {
            registrable_domain: registrable_domain.to_string(),
            registration_date,
            cached_at: SystemTime::now(),
        };
        storage::save_json(&self.entry_path(registrable_domain), &entry)
    }
}
