//! In-memory typed slots

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::BackingStore;
use crate::Result;

/// A stored primitive, tagged with the slot it was written through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Entry {
    Int(i32),
    Float(#[serde(with = "float_slot")] f32),
    String(String),
}

/// JSON has no NaN or infinity, so non-finite floats are written as text
mod float_slot {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f32),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f32(*value)
        } else {
            serializer.serialize_str(&value.to_string())
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => text.parse().map_err(D::Error::custom),
        }
    }
}

/// Store that keeps every entry in memory
///
/// `save` is a no-op; [`super::JsonFileStore`] adds durability on top.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryStore {
    entries: BTreeMap<String, Entry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw entry under `key`, exactly as stored
    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// Stored keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Entry)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (String, Entry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl BackingStore for MemoryStore {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        match self.entries.get(key) {
            Some(Entry::Int(value)) => *value,
            _ => default,
        }
    }

    fn get_float(&self, key: &str, default: f32) -> f32 {
        match self.entries.get(key) {
            Some(Entry::Float(value)) => *value,
            _ => default,
        }
    }

    fn get_string(&self, key: &str, default: &str) -> String {
        match self.entries.get(key) {
            Some(Entry::String(value)) => value.clone(),
            _ => default.to_string(),
        }
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.entries.insert(key.to_string(), Entry::Int(value));
    }

    fn set_float(&mut self, key: &str, value: f32) {
        self.entries.insert(key.to_string(), Entry::Float(value));
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.entries
            .insert(key.to_string(), Entry::String(value.to_string()));
    }

    fn has_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn delete_key(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn delete_all(&mut self) {
        self.entries.clear();
    }

    fn save(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_slot_reads_default() {
        let mut store = MemoryStore::new();
        store.set_string("name", "ada");
        assert_eq!(store.get_int("name", 7), 7);
        assert_eq!(store.get_float("name", 1.5), 1.5);
        assert_eq!(store.get_string("name", ""), "ada");
    }

    #[test]
    fn test_set_replaces_slot() {
        let mut store = MemoryStore::new();
        store.set_int("volume", 3);
        store.set_float("volume", 0.5);
        assert_eq!(store.entry("volume"), Some(&Entry::Float(0.5)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete() {
        let mut store = MemoryStore::new();
        store.set_int("a", 1);
        store.set_int("b", 2);
        store.delete_key("a");
        assert!(!store.has_key("a"));
        assert!(store.has_key("b"));
        store.delete_all();
        assert!(store.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let mut store = MemoryStore::new();
        store.set_int("lives", 3);
        let json = serde_json::to_string(&store).unwrap();
        assert_eq!(json, r#"{"lives":{"type":"Int","value":3}}"#);
        let back: MemoryStore = serde_json::from_str(&json).unwrap();
        assert_eq!(back, store);
    }

    #[test]
    fn test_non_finite_floats_survive_json() {
        let mut store = MemoryStore::new();
        store.set_float("nan", f32::NAN);
        store.set_float("up", f32::INFINITY);
        store.set_float("down", f32::NEG_INFINITY);
        store.set_float("half", 0.5);

        let json = serde_json::to_string(&store).unwrap();
        assert!(json.contains(r#""up":{"type":"Float","value":"inf"}"#));
        assert!(json.contains(r#""half":{"type":"Float","value":0.5}"#));

        let back: MemoryStore = serde_json::from_str(&json).unwrap();
        assert!(back.get_float("nan", 0.0).is_nan());
        assert_eq!(back.get_float("up", 0.0), f32::INFINITY);
        assert_eq!(back.get_float("down", 0.0), f32::NEG_INFINITY);
        assert_eq!(back.get_float("half", 0.0), 0.5);
    }
}
