//! Local profile storage
//!
//! Persists the acting user's display name between sessions. The name is the
//! only value the app keeps on the local device; it lives under one fixed
//! key in a small TOML key-value file inside the data directory, loaded once
//! at startup and rewritten on every change.
//!
//! The storage is modeled as an explicit [`KvStore`] interface injected into
//! the presentation layer. The sync controller never sees this module; it
//! only ever receives the name as a plain argument to `add`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// The fixed key the display name is stored under
pub const DISPLAY_NAME_KEY: &str = "display_name";

/// Minimal key-value persistence interface
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// TOML-file-backed [`KvStore`]
pub struct FileKvStore {
    path: PathBuf,
}

impl FileKvStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read profile file: {:?}", self.path))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse profile file: {:?}", self.path))
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_map()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create profile directory: {:?}", parent))?;
        }
        let content = toml::to_string_pretty(&map).context("Failed to serialize profile")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write profile file: {:?}", self.path))
    }
}

/// Load the saved display name; blank or missing comes back as `None`
pub fn load_display_name(store: &impl KvStore) -> Result<Option<String>> {
    Ok(store
        .get(DISPLAY_NAME_KEY)?
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty()))
}

/// Persist the display name; blank names are rejected
pub fn save_display_name(store: &impl KvStore, name: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Display name cannot be empty");
    }
    store.set(DISPLAY_NAME_KEY, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> FileKvStore {
        FileKvStore::new(dir.path().join("profile.toml"))
    }

    #[test]
    fn test_get_missing_file() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.get(DISPLAY_NAME_KEY).unwrap(), None);
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.set(DISPLAY_NAME_KEY, "Alex").unwrap();
        assert_eq!(store.get(DISPLAY_NAME_KEY).unwrap(), Some("Alex".to_string()));
    }

    #[test]
    fn test_set_overwrites_previous_value() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.set(DISPLAY_NAME_KEY, "Alex").unwrap();
        store.set(DISPLAY_NAME_KEY, "Beck").unwrap();
        assert_eq!(store.get(DISPLAY_NAME_KEY).unwrap(), Some("Beck".to_string()));
    }

    #[test]
    fn test_set_preserves_other_keys() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.set("other", "value").unwrap();
        store.set(DISPLAY_NAME_KEY, "Alex").unwrap();
        assert_eq!(store.get("other").unwrap(), Some("value".to_string()));
    }

    #[test]
    fn test_load_display_name_trims() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.set(DISPLAY_NAME_KEY, "  Alex  ").unwrap();
        assert_eq!(load_display_name(&store).unwrap(), Some("Alex".to_string()));
    }

    #[test]
    fn test_load_display_name_blank_is_none() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.set(DISPLAY_NAME_KEY, "   ").unwrap();
        assert_eq!(load_display_name(&store).unwrap(), None);
    }

    #[test]
    fn test_save_display_name_rejects_blank() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        assert!(save_display_name(&store, "   ").is_err());
        assert_eq!(load_display_name(&store).unwrap(), None);
    }

    #[test]
    fn test_save_display_name_trims() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        save_display_name(&store, "  Alex  ").unwrap();
        assert_eq!(store.get(DISPLAY_NAME_KEY).unwrap(), Some("Alex".to_string()));
    }
}
