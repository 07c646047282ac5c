//! # Persistent Store
//!
//! Key/value string storage for the transcript snapshot and the theme.
//!
//! `FileStore` keeps every key in one JSON object (`~/.gemchat/storage.json`
//! by default). The file is read once on open and rewritten on each change
//! using atomic rename (write `.tmp`, then `rename()`).
//!
//! Callers never see storage errors: failures are logged and the store
//! carries on with its in-memory view.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::core::state::Theme;

const TRANSCRIPT_KEY: &str = "savedChats";
const THEME_KEY: &str = "themeColor";

#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Corrupt(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "storage I/O error: {e}"),
            StoreError::Corrupt(e) => write!(f, "storage file is corrupt: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// A string-keyed store of string values.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// Store backed by a single JSON file.
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens (or lazily creates) the store at `path`.
    ///
    /// A missing file is an empty store. An unreadable or corrupt file is
    /// logged and also treated as empty; it is overwritten on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match read_entries(&path) {
            Ok(entries) => {
                debug!("Opened store {} ({} keys)", path.display(), entries.len());
                entries
            }
            Err(e) => {
                warn!("Ignoring store {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) {
        if let Err(e) = atomic_write_json(&self.path, &self.entries) {
            warn!("Failed to write store {}: {}", self.path.display(), e);
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush();
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.flush();
        }
    }
}

/// In-memory store, mostly for tests.
#[derive(Default, Debug)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

fn read_entries(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let json = fs::read_to_string(path).map_err(StoreError::Io)?;
    serde_json::from_str(&json).map_err(StoreError::Corrupt)
}

/// Atomically write `entries` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json(path: &Path, entries: &BTreeMap<String, String>) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(entries)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Chat-specific view over a [`KeyValueStore`].
pub struct ChatStore<S: KeyValueStore> {
    inner: S,
}

impl<S: KeyValueStore> ChatStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Saves the serialized transcript, replacing any previous snapshot.
    pub fn save(&mut self, snapshot: &str) {
        self.inner.set(TRANSCRIPT_KEY, snapshot);
        debug!("Transcript saved ({} bytes)", snapshot.len());
    }

    /// Returns the saved snapshot, or `None` if nothing (or an empty string) is stored.
    pub fn load(&self) -> Option<String> {
        self.inner.get(TRANSCRIPT_KEY).filter(|s| !s.is_empty())
    }

    /// Removes the saved transcript. The theme is left alone.
    pub fn clear(&mut self) {
        self.inner.remove(TRANSCRIPT_KEY);
        info!("Saved transcript cleared");
    }

    pub fn save_theme(&mut self, theme: Theme) {
        self.inner.set(THEME_KEY, theme.storage_value());
    }

    /// Stored theme; anything other than `light_mode` means dark.
    pub fn load_theme(&self) -> Theme {
        Theme::from_storage_value(self.inner.get(THEME_KEY).as_deref())
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_store_save_load_clear() {
        let mut store = ChatStore::new(MemoryStore::default());
        assert_eq!(store.load(), None);

        store.save("[1]");
        assert_eq!(store.load().as_deref(), Some("[1]"));

        store.clear();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_empty_snapshot_reads_as_absent() {
        let mut store = ChatStore::new(MemoryStore::default());
        store.save("");
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_theme_defaults_to_dark() {
        let store = ChatStore::new(MemoryStore::default());
        assert_eq!(store.load_theme(), Theme::Dark);
    }

    #[test]
    fn test_theme_round_trip_and_clear_keeps_theme() {
        let mut store = ChatStore::new(MemoryStore::default());
        store.save_theme(Theme::Light);
        store.save("[]");
        store.clear();
        assert_eq!(store.load_theme(), Theme::Light);
        assert_eq!(store.inner().get(THEME_KEY).as_deref(), Some("light_mode"));
    }

    #[test]
    fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let mut store = FileStore::open(&path);
        store.set("savedChats", "snapshot");
        store.set("themeColor", "light_mode");
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("savedChats").as_deref(), Some("snapshot"));
        assert_eq!(reopened.get("themeColor").as_deref(), Some("light_mode"));
    }

    #[test]
    fn test_file_store_remove() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let mut store = FileStore::open(&path);
        store.set("savedChats", "snapshot");
        store.remove("savedChats");

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("savedChats"), None);
    }

    #[test]
    fn test_corrupt_file_is_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        let mut store = FileStore::open(&path);
        assert_eq!(store.get("savedChats"), None);

        store.set("savedChats", "fresh");
        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("savedChats").as_deref(), Some("fresh"));
    }
}
