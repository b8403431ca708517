//! String key/value storage with browser local-storage semantics.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::StoreError;

/// Key/value store holding string values, like a browser's `localStorage`.
///
/// Supports both in-memory (ephemeral) and persistent (file-backed) modes.
/// Use [`in_memory`](Self::in_memory) for tests and
/// [`open_persistent`](Self::open_persistent) for a JSON file that survives
/// across process restarts. Every mutation writes the whole map through to
/// the file.
pub struct LocalStorage {
    path: Option<PathBuf>,
    items: Mutex<BTreeMap<String, String>>,
}

impl LocalStorage {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            items: Mutex::new(BTreeMap::new()),
        }
    }

    /// Open or create a storage file. A missing file starts empty.
    pub fn open_persistent(path: &Path) -> Result<Self, StoreError> {
        let items = match std::fs::read_to_string(path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        info!(path = %path.display(), keys = items.len(), "opened local storage");
        Ok(Self {
            path: Some(path.to_path_buf()),
            items: Mutex::new(items),
        })
    }

    pub fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let items = self.items.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|items| {
            items.insert(key.to_string(), value.to_string());
            true
        })
    }

    pub fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.update(|items| items.remove(key).is_some())
    }

    /// Remove several keys with a single write.
    pub fn remove_items(&self, keys: &[&str]) -> Result<(), StoreError> {
        self.update(|items| {
            let before = items.len();
            for key in keys {
                items.remove(*key);
            }
            items.len() != before
        })
    }

    /// Apply `change` to a copy of the map and keep it only once it is on
    /// disk. `change` returns whether anything changed.
    fn update(&self, change: impl FnOnce(&mut BTreeMap<String, String>) -> bool) -> Result<(), StoreError> {
        let mut items = self.items.lock().map_err(|_| StoreError::Poisoned)?;
        let mut next = items.clone();
        if !change(&mut next) {
            return Ok(());
        }
        self.flush(&next)?;
        *items = next;
        Ok(())
    }

    /// Read a JSON-encoded value. A value that does not parse is reported as
    /// [`StoreError::Corrupt`] so callers can decide whether to discard it.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get_item(key)? {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StoreError::Corrupt {
                    key: key.to_string(),
                    reason: e.to_string(),
                }),
        }
    }

    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.set_item(key, &raw)
    }

    fn flush(&self, items: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };
        let text = serde_json::to_string_pretty(items)?;
        // Write a sibling file, then rename over the original.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, text).map_err(io_err)?;
        std::fs::rename(&tmp, path).map_err(io_err)?;
        debug!(path = %path.display(), keys = items.len(), "flushed local storage");
        Ok(())
    }
}
