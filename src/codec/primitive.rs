//! Primitive codecs
//!
//! Thin adapters over the keyed-access layer; `bool` rides in the int slot.

use super::Codec;
use crate::access::KeyedStore;
use crate::{Encryption, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct IntCodec;

#[derive(Debug, Clone, Copy, Default)]
pub struct FloatCodec;

/// `true` as 1, `false` as 0; any non-zero int reads as `true`
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolCodec;

#[derive(Debug, Clone, Copy, Default)]
pub struct StringCodec;

impl Codec<i32> for IntCodec {
    fn encode(&self, access: &mut KeyedStore<'_>, key: &str, value: &i32, mode: Encryption) -> Result<()> {
        access.set_int(key, *value, mode)
    }

    fn decode(&self, access: &mut KeyedStore<'_>, key: &str, default: i32, mode: Encryption) -> Result<i32> {
        access.get_int(key, default, mode)
    }
}

impl Codec<f32> for FloatCodec {
    fn encode(&self, access: &mut KeyedStore<'_>, key: &str, value: &f32, mode: Encryption) -> Result<()> {
        access.set_float(key, *value, mode)
    }

    fn decode(&self, access: &mut KeyedStore<'_>, key: &str, default: f32, mode: Encryption) -> Result<f32> {
        access.get_float(key, default, mode)
    }
}

impl Codec<bool> for BoolCodec {
    fn encode(&self, access: &mut KeyedStore<'_>, key: &str, value: &bool, mode: Encryption) -> Result<()> {
        access.set_int(key, i32::from(*value), mode)
    }

    fn decode(&self, access: &mut KeyedStore<'_>, key: &str, default: bool, mode: Encryption) -> Result<bool> {
        Ok(access.get_int(key, i32::from(default), mode)? != 0)
    }
}

impl Codec<String> for StringCodec {
    fn encode(&self, access: &mut KeyedStore<'_>, key: &str, value: &String, mode: Encryption) -> Result<()> {
        access.set_string(key, value, mode)
    }

    fn decode(&self, access: &mut KeyedStore<'_>, key: &str, default: String, mode: Encryption) -> Result<String> {
        Ok(access.get_string_opt(key, mode)?.unwrap_or(default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::store::{BackingStore, Entry, MemoryStore};

    #[test]
    fn test_bool_uses_int_slot() {
        let mut store = MemoryStore::new();
        let settings = Settings::default();
        let mut access = KeyedStore::new(&mut store, &settings);
        BoolCodec.encode(&mut access, "muted", &true, Encryption::Disabled).unwrap();
        assert!(BoolCodec.decode(&mut access, "muted", false, Encryption::Disabled).unwrap());
        assert!(!BoolCodec.decode(&mut access, "absent", false, Encryption::Disabled).unwrap());
        assert_eq!(store.entry("muted"), Some(&Entry::Int(1)));
    }

    #[test]
    fn test_bool_reads_any_nonzero_as_true() {
        let mut store = MemoryStore::new();
        store.set_int("flag", 42);
        let settings = Settings::default();
        let mut access = KeyedStore::new(&mut store, &settings);
        assert!(BoolCodec.decode(&mut access, "flag", false, Encryption::Disabled).unwrap());
    }

    #[test]
    fn test_string_round_trip_encrypted() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            encryption_hash: Some("salt".into()),
            ..Settings::encrypted()
        };
        let mut access = KeyedStore::new(&mut store, &settings);
        let name = "Ünïcødé ✓".to_string();
        StringCodec.encode(&mut access, "name", &name, Encryption::UseGlobalSettings).unwrap();
        let back = StringCodec
            .decode(&mut access, "name", String::new(), Encryption::UseGlobalSettings)
            .unwrap();
        assert_eq!(back, name);
        assert!(!store.has_key("name"));
    }
}
