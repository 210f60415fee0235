//! JSON-file persistence shared by the age cache and the whitelist.
//!
//! Both stores are durable key-value namespaces with no transactional
//! guarantees; individual file reads/writes are the atomicity unit.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Loads a JSON value from disk. `Ok(None)` when the file does not exist.
pub(crate) fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).context("Failed to read storage file")?;
    let value = serde_json::from_str(&content).context("Failed to parse storage file")?;
    Ok(Some(value))
}

/// Saves a JSON value to disk, creating parent directories as needed and
/// overwriting any previous content.
pub(crate) fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("Failed to create storage directory")?;
        }
    }

    let content =
        serde_json::to_string_pretty(value).context("Failed to serialize storage value")?;
    std::fs::write(path, content).context("Failed to write storage file")?;
    Ok(())
}
