//! Persistent whitelist of user-approved registrable domains.
//!
//! Presence means "never alert for this domain again": the effective tier is
//! forced to GREEN regardless of the computed age. Entries are created only
//! by an explicit user action and never expire.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;

use crate::storage;

/// Durable set of registrable domains the user chose to trust.
#[derive(Debug, Clone)]
pub struct WhitelistStore {
    path: PathBuf,
}

impl WhitelistStore {
    /// Creates a store backed by the JSON file at `path`. The file is
    /// created lazily on the first add.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> BTreeSet<String> {
        match storage::load_json(&self.path) {
            Ok(Some(set)) => set,
            Ok(None) => BTreeSet::new(),
            Err(e) => {
                log::warn!("Failed to load whitelist, treating as empty: {e:#}");
                BTreeSet::new()
            }
        }
    }

    /// Whether the user has approved this registrable domain.
    pub fn is_whitelisted(&self, registrable_domain: &str) -> bool {
        self.load().contains(registrable_domain)
    }

    /// Adds a domain to the whitelist. Idempotent: re-adding is a no-op.
    ///
    /// The update is read-merge-write, so entries for other domains written
    /// since our last read are preserved.
    pub fn add(&self, registrable_domain: &str) -> Result<()> {
        let mut set = self.load();
        if !set.insert(registrable_domain.to_string()) {
            return Ok(());
        }
        storage::save_json(&self.path, &set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_means_nothing_whitelisted() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = WhitelistStore::new(dir.path().join("whitelist.json"));
        assert!(!store.is_whitelisted("example.com"));
    }

    #[test]
    fn test_add_and_query() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = WhitelistStore::new(dir.path().join("whitelist.json"));

        store.add("example.com").expect("add");
        assert!(store.is_whitelisted("example.com"));
        assert!(!store.is_whitelisted("other.com"));
    }

    #[test]
    fn test_add_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = WhitelistStore::new(dir.path().join("whitelist.json"));

        store.add("example.com").expect("add");
        store.add("example.com").expect("re-add");
        assert!(store.is_whitelisted("example.com"));
    }

    #[test]
    fn test_add_preserves_other_entries() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = WhitelistStore::new(dir.path().join("whitelist.json"));

        store.add("first.com").expect("add");
        store.add("second.co.uk").expect("add");

        assert!(store.is_whitelisted("first.com"));
        assert!(store.is_whitelisted("second.co.uk"));
    }

    #[test]
    fn test_two_handles_share_the_same_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("whitelist.json");
        let writer = WhitelistStore::new(&path);
        let reader = WhitelistStore::new(&path);

        writer.add("example.com").expect("add");
        assert!(reader.is_whitelisted("example.com"));
    }
}
