//! Browser LocalStorage
//!
//! LocalStorage only holds strings, so each entry is written as a tagged
//! JSON [`Entry`] to keep the int/float/string slots apart.

use super::{BackingStore, Entry};
use crate::{Error, Result};

/// LocalStorage-backed store
pub struct WebStorage {
    storage: web_sys::Storage,
}

impl WebStorage {
    /// Attach to the window's LocalStorage
    pub fn open() -> Result<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| Error::Storage("LocalStorage unavailable".into()))?;
        Ok(Self { storage })
    }

    fn entry(&self, key: &str) -> Option<Entry> {
        let json = self.storage.get_item(key).ok().flatten()?;
        serde_json::from_str(&json).ok()
    }

    fn put(&mut self, key: &str, entry: Entry) {
        match serde_json::to_string(&entry) {
            Ok(json) => {
                if self.storage.set_item(key, &json).is_err() {
                    log::warn!("LocalStorage rejected write for {key:?}");
                }
            }
            Err(e) => log::warn!("Failed to encode entry {key:?}: {e}"),
        }
    }
}

impl BackingStore for WebStorage {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        match self.entry(key) {
            Some(Entry::Int(value)) => value,
            _ => default,
        }
    }

    fn get_float(&self, key: &str, default: f32) -> f32 {
        match self.entry(key) {
            Some(Entry::Float(value)) => value,
            _ => default,
        }
    }

    fn get_string(&self, key: &str, default: &str) -> String {
        match self.entry(key) {
            Some(Entry::String(value)) => value,
            _ => default.to_string(),
        }
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.put(key, Entry::Int(value));
    }

    fn set_float(&mut self, key: &str, value: f32) {
        self.put(key, Entry::Float(value));
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.put(key, Entry::String(value.to_string()));
    }

    fn has_key(&self, key: &str) -> bool {
        matches!(self.storage.get_item(key), Ok(Some(_)))
    }

    fn delete_key(&mut self, key: &str) {
        let _ = self.storage.remove_item(key);
    }

    fn delete_all(&mut self) {
        let _ = self.storage.clear();
    }

    /// LocalStorage persists every write immediately
    fn save(&mut self) -> Result<()> {
        Ok(())
    }
}
