//! Key-value persistence collaborator. The browser build uses localStorage;
//! tests and native callers use the in-memory store.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::config::REGISTRY_STORAGE_KEY;
use crate::error::StorageError;
use crate::model::DataRegistry;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::default();
        store.entries.borrow_mut().insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// `window.localStorage`.
pub struct BrowserStore {
    inner: web_sys::Storage,
}

impl BrowserStore {
    pub fn local() -> Result<Self, StorageError> {
        let win = web_sys::window().ok_or(StorageError::Unavailable)?;
        match win.local_storage() {
            Ok(Some(inner)) => Ok(Self { inner }),
            _ => Err(StorageError::Unavailable),
        }
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(key).map_err(|e| StorageError::Read {
            key: key.to_string(),
            message: format!("{e:?}"),
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set_item(key, value).map_err(|e| StorageError::Write {
            key: key.to_string(),
            message: format!("{e:?}"),
        })
    }
}

/// Raw persisted registry blob. A read failure counts as "no prior state".
pub fn load_snapshot_blob(store: &dyn KeyValueStore) -> Option<String> {
    match store.get(REGISTRY_STORAGE_KEY) {
        Ok(blob) => blob,
        Err(err) => {
            log::warn!("persisted registry unreadable, starting fresh: {err}");
            None
        }
    }
}

pub fn save_snapshot(
    store: &dyn KeyValueStore,
    registry: &DataRegistry,
) -> Result<(), StorageError> {
    let blob = serde_json::to_string(registry)?;
    store.set(REGISTRY_STORAGE_KEY, &blob)
}
