//! JSON file persistence
//!
//! Writes go to memory; `save` writes `<path>.tmp` then renames it over the
//! target so a crash mid-write never leaves a truncated file behind.

use std::fs;
use std::path::{Path, PathBuf};

use std::collections::BTreeMap;

use super::{BackingStore, Entry, MemoryStore};
use crate::Result;

/// [`MemoryStore`] flushed to a JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open the store at `path`, loading existing entries if the file exists
    ///
    /// A file that is not a JSON object is an error. Individual entries that
    /// do not decode are skipped with a warning.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let inner = if path.exists() {
            let json = fs::read_to_string(&path)?;
            let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(&json)?;
            let inner = load_entries(raw);
            log::info!("Loaded {} preferences from {}", inner.len(), path.display());
            inner
        } else {
            MemoryStore::new()
        };
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries not yet flushed are included
    pub fn memory(&self) -> &MemoryStore {
        &self.inner
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

fn load_entries(raw: BTreeMap<String, serde_json::Value>) -> MemoryStore {
    raw.into_iter()
        .filter_map(|(key, value)| match serde_json::from_value::<Entry>(value) {
            Ok(entry) => Some((key, entry)),
            Err(e) => {
                log::warn!("Skipping unreadable preference {key:?}: {e}");
                None
            }
        })
        .collect()
}

impl BackingStore for JsonFileStore {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.inner.get_int(key, default)
    }

    fn get_float(&self, key: &str, default: f32) -> f32 {
        self.inner.get_float(key, default)
    }

    fn get_string(&self, key: &str, default: &str) -> String {
        self.inner.get_string(key, default)
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.inner.set_int(key, value);
    }

    fn set_float(&mut self, key: &str, value: f32) {
        self.inner.set_float(key, value);
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.inner.set_string(key, value);
    }

    fn has_key(&self, key: &str) -> bool {
        self.inner.has_key(key)
    }

    fn delete_key(&mut self, key: &str) {
        self.inner.delete_key(key);
    }

    fn delete_all(&mut self) {
        self.inner.delete_all();
    }

    fn save(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.inner)?;
        let tmp = self.temp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::info!("Preferences saved ({} entries)", self.inner.len());
        Ok(())
    }
}
