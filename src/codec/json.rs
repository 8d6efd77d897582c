//! Generic JSON codec
//!
//! Fallback for types without a dedicated codec. Deserialization failures
//! read as the default; a serialization failure is an error and writes
//! nothing.

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{Codec, DecodeError, decode_text};
use crate::access::KeyedStore;
use crate::{Encryption, Error, Result};

pub struct JsonCodec<T>(PhantomData<fn() -> T>);

impl<T> JsonCodec<T> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for JsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize + DeserializeOwned> Codec<T> for JsonCodec<T> {
    fn encode(&self, access: &mut KeyedStore<'_>, key: &str, value: &T, mode: Encryption) -> Result<()> {
        match serde_json::to_string(value) {
            Ok(json) => access.set_string(key, &json, mode),
            Err(e) => {
                if access.settings().enable_logging {
                    log::warn!("Preference {key:?}: JSON serialization failed: {e}");
                }
                Err(Error::Serialization(e.to_string()))
            }
        }
    }

    fn decode(&self, access: &mut KeyedStore<'_>, key: &str, default: T, mode: Encryption) -> Result<T> {
        decode_text(access, key, default, mode, |json| {
            serde_json::from_str(json).map_err(|e| DecodeError::Serialization(e.to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::store::{BackingStore, Entry, MemoryStore};
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Loadout {
        name: String,
        slots: Vec<u32>,
    }

    #[test]
    fn test_struct_round_trip() {
        let mut store = MemoryStore::new();
        let settings = Settings::default();
        let mut access = KeyedStore::new(&mut store, &settings);
        let loadout = Loadout {
            name: "sniper".into(),
            slots: vec![1, 4, 9],
        };
        JsonCodec::<Loadout>::new()
            .encode(&mut access, "loadout", &loadout, Encryption::Disabled)
            .unwrap();
        let empty = Loadout {
            name: String::new(),
            slots: vec![],
        };
        let back = JsonCodec::<Loadout>::new()
            .decode(&mut access, "loadout", empty, Encryption::Disabled)
            .unwrap();
        assert_eq!(back, loadout);
        assert_eq!(
            store.entry("loadout"),
            Some(&Entry::String(r#"{"name":"sniper","slots":[1,4,9]}"#.into()))
        );
    }

    #[test]
    fn test_bad_json_returns_default() {
        let mut store = MemoryStore::new();
        store.set_string("loadout", "{\"name\": 3}");
        let settings = Settings::default();
        let mut access = KeyedStore::new(&mut store, &settings);
        let default = Loadout {
            name: "default".into(),
            slots: vec![0],
        };
        let back = JsonCodec::<Loadout>::new()
            .decode(&mut access, "loadout", default.clone(), Encryption::Disabled)
            .unwrap();
        assert_eq!(back, default);
    }

    #[test]
    fn test_unserializable_value_is_an_error() {
        let mut store = MemoryStore::new();
        let settings = Settings::default();
        let mut access = KeyedStore::new(&mut store, &settings);
        // JSON object keys must be strings
        let mut map = HashMap::new();
        map.insert((1u8, 2u8), 3u8);
        let err = JsonCodec::<HashMap<(u8, u8), u8>>::new()
            .encode(&mut access, "grid", &map, Encryption::Disabled)
            .unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(store.is_empty());
    }
}
