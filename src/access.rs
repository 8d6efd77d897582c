//! Keyed access to the backing store
//!
//! Applies the obfuscation transform to keys and values according to the
//! per-call [`Encryption`] mode. Encrypted values always live in the string
//! slot; plain values use the store's native typed slot.

use std::borrow::Cow;
use std::str::FromStr;

use crate::codec::DecodeError;
use crate::obfuscate::{self, TransformError};
use crate::store::BackingStore;
use crate::{Encryption, Error, Result, Settings};

/// Primitive shape a stored entry appears to have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    String,
    Float,
    Int,
    /// Missing, or no probe could tell
    Invalid,
}

/// Backing store seen through the obfuscation settings
pub struct KeyedStore<'a> {
    store: &'a mut dyn BackingStore,
    settings: &'a Settings,
}

fn transform_error(err: TransformError) -> Error {
    match err {
        TransformError::EmptySecret => Error::DegenerateSecret,
        other => Error::Storage(other.to_string()),
    }
}

impl<'a> KeyedStore<'a> {
    pub fn new(store: &'a mut dyn BackingStore, settings: &'a Settings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> &Settings {
        self.settings
    }

    /// Key as written to the store under `mode`
    pub fn resolve_key<'k>(&self, key: &'k str, mode: Encryption) -> Result<Cow<'k, str>> {
        if mode.encrypts_key(self.settings) {
            let secret = obfuscate::secret(self.settings);
            let encoded = obfuscate::encode(key, secret).map_err(transform_error)?;
            Ok(Cow::Owned(encoded))
        } else {
            Ok(Cow::Borrowed(key))
        }
    }

    fn seal(&self, value: &str) -> Result<String> {
        let secret = obfuscate::secret(self.settings);
        obfuscate::encode(value, secret).map_err(transform_error)
    }

    pub fn has_key(&self, key: &str, mode: Encryption) -> Result<bool> {
        let key = self.resolve_key(key, mode)?;
        Ok(self.store.has_key(&key))
    }

    pub fn delete_key(&mut self, key: &str, mode: Encryption) -> Result<()> {
        let key = self.resolve_key(key, mode)?;
        self.store.delete_key(&key);
        Ok(())
    }

    /// String under `key`, or `None` when absent, held in another slot, or
    /// unreadable
    ///
    /// An encrypted value that fails to decode is reported through
    /// [`KeyedStore::recover`] before `None` is returned.
    pub fn get_string_opt(&mut self, key: &str, mode: Encryption) -> Result<Option<String>> {
        let stored_key = self.resolve_key(key, mode)?;
        // An int or float under the key is a slot mismatch, not a bad string
        if !self.store.has_key(&stored_key) || !self.probe_string(&stored_key) {
            return Ok(None);
        }
        let raw = self.store.get_string(&stored_key, "");
        if !mode.encrypts_value(self.settings) {
            return Ok(Some(raw));
        }

        let secret = obfuscate::secret(self.settings);
        match obfuscate::decode(&raw, secret) {
            Ok(text) => Ok(Some(text)),
            Err(TransformError::EmptySecret) => Err(Error::DegenerateSecret),
            Err(err) => {
                self.recover(key, mode, &DecodeError::Unreadable(err.to_string()))?;
                Ok(None)
            }
        }
    }

    pub fn get_string(&mut self, key: &str, default: &str, mode: Encryption) -> Result<String> {
        Ok(self
            .get_string_opt(key, mode)?
            .unwrap_or_else(|| default.to_string()))
    }

    pub fn set_string(&mut self, key: &str, value: &str, mode: Encryption) -> Result<()> {
        let stored_key = self.resolve_key(key, mode)?;
        if mode.encrypts_value(self.settings) {
            let sealed = self.seal(value)?;
            self.store.set_string(&stored_key, &sealed);
        } else {
            self.store.set_string(&stored_key, value);
        }
        Ok(())
    }

    pub fn get_int(&mut self, key: &str, default: i32, mode: Encryption) -> Result<i32> {
        if mode.encrypts_value(self.settings) {
            return self.get_parsed(key, default, mode);
        }
        let stored_key = self.resolve_key(key, mode)?;
        Ok(self.store.get_int(&stored_key, default))
    }

    pub fn set_int(&mut self, key: &str, value: i32, mode: Encryption) -> Result<()> {
        if mode.encrypts_value(self.settings) {
            return self.set_string(key, &value.to_string(), mode);
        }
        let stored_key = self.resolve_key(key, mode)?;
        self.store.set_int(&stored_key, value);
        Ok(())
    }

    pub fn get_float(&mut self, key: &str, default: f32, mode: Encryption) -> Result<f32> {
        if mode.encrypts_value(self.settings) {
            return self.get_parsed(key, default, mode);
        }
        let stored_key = self.resolve_key(key, mode)?;
        Ok(self.store.get_float(&stored_key, default))
    }

    pub fn set_float(&mut self, key: &str, value: f32, mode: Encryption) -> Result<()> {
        if mode.encrypts_value(self.settings) {
            return self.set_string(key, &value.to_string(), mode);
        }
        let stored_key = self.resolve_key(key, mode)?;
        self.store.set_float(&stored_key, value);
        Ok(())
    }

    fn get_parsed<T: FromStr>(&mut self, key: &str, default: T, mode: Encryption) -> Result<T> {
        let Some(text) = self.get_string_opt(key, mode)? else {
            return Ok(default);
        };
        match text.parse() {
            Ok(value) => Ok(value),
            Err(_) => {
                self.recover(key, mode, &DecodeError::Malformed { input: text })?;
                Ok(default)
            }
        }
    }

    /// Handle an entry that could not be decoded
    ///
    /// Logs a diagnostic when logging is enabled and deletes the entry when
    /// [`Settings::repair_malformed`] is set. Never fails on the entry itself.
    pub fn recover(&mut self, key: &str, mode: Encryption, err: &DecodeError) -> Result<()> {
        if self.settings.enable_logging {
            match err {
                DecodeError::TypeMismatch { .. } => log::error!("Preference {key:?}: {err}"),
                _ => log::warn!("Preference {key:?}: {err}"),
            }
        }
        if self.settings.repair_malformed {
            self.delete_key(key, mode)?;
        }
        Ok(())
    }

    /// Guess the primitive shape stored under `key`
    ///
    /// Probes each slot with two different defaults; a slot that echoes both
    /// back does not hold the entry. This is a heuristic: a store that
    /// coerces between slots, or a value equal to a probe default on a store
    /// that cannot tell "absent" from "equal", is misreported. Precedence is
    /// string, then float, then int.
    pub fn key_kind(&self, key: &str, mode: Encryption) -> Result<KeyKind> {
        let key = self.resolve_key(key, mode)?;
        if !self.store.has_key(&key) {
            return Ok(KeyKind::Invalid);
        }
        Ok(if self.probe_string(&key) {
            KeyKind::String
        } else if self.probe_float(&key) {
            KeyKind::Float
        } else if self.probe_int(&key) {
            KeyKind::Int
        } else {
            KeyKind::Invalid
        })
    }

    pub fn is_string(&self, key: &str, mode: Encryption) -> Result<bool> {
        let key = self.resolve_key(key, mode)?;
        Ok(self.store.has_key(&key) && self.probe_string(&key))
    }

    pub fn is_float(&self, key: &str, mode: Encryption) -> Result<bool> {
        let key = self.resolve_key(key, mode)?;
        Ok(self.store.has_key(&key) && self.probe_float(&key))
    }

    pub fn is_int(&self, key: &str, mode: Encryption) -> Result<bool> {
        let key = self.resolve_key(key, mode)?;
        Ok(self.store.has_key(&key) && self.probe_int(&key))
    }

    fn probe_string(&self, key: &str) -> bool {
        const PROBE: &str = "\u{0}";
        !(self.store.get_string(key, PROBE) == PROBE && self.store.get_string(key, "").is_empty())
    }

    fn probe_float(&self, key: &str) -> bool {
        let approx = |a: f32, b: f32| (a - b).abs() <= f32::EPSILON * a.abs().max(b.abs()).max(1.0);
        !(approx(self.store.get_float(key, -1.0), -1.0) && approx(self.store.get_float(key, 1.0), 1.0))
    }

    fn probe_int(&self, key: &str) -> bool {
        !(self.store.get_int(key, -1) == -1 && self.store.get_int(key, 1) == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Entry, MemoryStore};

    fn pepper() -> Settings {
        Settings {
            encryption_hash: Some("pepper".into()),
            ..Settings::default()
        }
    }

    #[test]
    fn test_plain_values_use_native_slots() {
        let mut store = MemoryStore::new();
        let settings = pepper();
        let mut access = KeyedStore::new(&mut store, &settings);
        access.set_int("lives", 3, Encryption::Disabled).unwrap();
        access.set_float("volume", 0.75, Encryption::Disabled).unwrap();

        assert_eq!(store.entry("lives"), Some(&Entry::Int(3)));
        assert_eq!(store.entry("volume"), Some(&Entry::Float(0.75)));
    }

    #[test]
    fn test_encrypted_values_use_string_slot() {
        let mut store = MemoryStore::new();
        let settings = pepper();
        let mut access = KeyedStore::new(&mut store, &settings);
        access.set_int("lives", 3, Encryption::ValueOnly).unwrap();
        assert_eq!(access.get_int("lives", 0, Encryption::ValueOnly).unwrap(), 3);
        access.set_float("volume", -0.125, Encryption::ValueOnly).unwrap();
        assert_eq!(access.get_float("volume", 0.0, Encryption::ValueOnly).unwrap(), -0.125);

        let expected = obfuscate::encode("3", "pepper").unwrap();
        assert_eq!(store.entry("lives"), Some(&Entry::String(expected)));
    }

    #[test]
    fn test_encrypted_key_hides_name() {
        let mut store = MemoryStore::new();
        let settings = pepper();
        let mut access = KeyedStore::new(&mut store, &settings);
        access.set_string("player", "ada", Encryption::KeyOnly).unwrap();
        assert!(access.has_key("player", Encryption::KeyOnly).unwrap());
        assert!(!access.has_key("player", Encryption::Disabled).unwrap());
        assert_eq!(
            access.get_string("player", "", Encryption::KeyOnly).unwrap(),
            "ada"
        );

        let key = obfuscate::encode("player", "pepper").unwrap();
        assert_eq!(store.entry(&key), Some(&Entry::String("ada".into())));
    }

    #[test]
    fn test_global_flags_read_per_call() {
        let mut store = MemoryStore::new();
        let mut settings = pepper();
        {
            let mut access = KeyedStore::new(&mut store, &settings);
            access.set_int("a", 1, Encryption::UseGlobalSettings).unwrap();
        }
        settings.encrypt_key = true;
        {
            let mut access = KeyedStore::new(&mut store, &settings);
            access.set_int("b", 2, Encryption::UseGlobalSettings).unwrap();
        }
        assert!(store.has_key("a"));
        assert!(!store.has_key("b"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_missing_key_returns_default_without_writing() {
        let mut store = MemoryStore::new();
        let settings = pepper();
        let mut access = KeyedStore::new(&mut store, &settings);
        assert_eq!(access.get_int("missing", 9, Encryption::Both).unwrap(), 9);
        assert_eq!(access.get_float("missing", 2.5, Encryption::Disabled).unwrap(), 2.5);
        assert_eq!(access.get_string("missing", "x", Encryption::Both).unwrap(), "x");
        assert!(store.is_empty());
    }

    #[test]
    fn test_unparseable_encrypted_number_returns_default() {
        let mut store = MemoryStore::new();
        store.set_string("lives", &obfuscate::encode("three", "pepper").unwrap());
        let settings = pepper();
        let mut access = KeyedStore::new(&mut store, &settings);
        assert_eq!(access.get_int("lives", 5, Encryption::ValueOnly).unwrap(), 5);
        assert!(store.has_key("lives"));
    }

    #[test]
    fn test_unreadable_ciphertext_returns_default() {
        let mut store = MemoryStore::new();
        store.set_string("name", "%%% not base64");
        let settings = pepper();
        let mut access = KeyedStore::new(&mut store, &settings);
        assert_eq!(
            access.get_string("name", "anon", Encryption::ValueOnly).unwrap(),
            "anon"
        );
    }

    #[test]
    fn test_repair_deletes_unreadable_entry() {
        let mut store = MemoryStore::new();
        store.set_string("lives", &obfuscate::encode("many", "pepper").unwrap());
        let settings = Settings {
            repair_malformed: true,
            ..pepper()
        };
        let mut access = KeyedStore::new(&mut store, &settings);
        assert_eq!(access.get_int("lives", 1, Encryption::ValueOnly).unwrap(), 1);
        assert!(!store.has_key("lives"));
    }

    #[test]
    fn test_string_read_of_numeric_slot_returns_default() {
        let mut store = MemoryStore::new();
        store.set_int("lives", 3);
        store.set_float("volume", 0.5);
        let settings = Settings {
            repair_malformed: true,
            ..pepper()
        };
        let mut access = KeyedStore::new(&mut store, &settings);
        assert_eq!(access.get_string("lives", "dflt", Encryption::Disabled).unwrap(), "dflt");
        assert_eq!(access.get_string("volume", "dflt", Encryption::ValueOnly).unwrap(), "dflt");
        assert_eq!(access.get_string_opt("lives", Encryption::Disabled).unwrap(), None);
        assert_eq!(store.entry("lives"), Some(&Entry::Int(3)));
        assert_eq!(store.entry("volume"), Some(&Entry::Float(0.5)));
    }

    #[test]
    fn test_key_kind_probes() {
        let mut store = MemoryStore::new();
        store.set_string("s", "text");
        store.set_string("empty", "");
        store.set_float("f", 1.0);
        store.set_int("i", -1);
        let settings = Settings::default();
        let access = KeyedStore::new(&mut store, &settings);

        assert_eq!(access.key_kind("s", Encryption::Disabled).unwrap(), KeyKind::String);
        assert_eq!(access.key_kind("empty", Encryption::Disabled).unwrap(), KeyKind::String);
        assert_eq!(access.key_kind("f", Encryption::Disabled).unwrap(), KeyKind::Float);
        assert_eq!(access.key_kind("i", Encryption::Disabled).unwrap(), KeyKind::Int);
        assert_eq!(access.key_kind("none", Encryption::Disabled).unwrap(), KeyKind::Invalid);
        assert!(access.is_int("i", Encryption::Disabled).unwrap());
        assert!(!access.is_float("i", Encryption::Disabled).unwrap());
        assert!(!access.is_string("none", Encryption::Disabled).unwrap());
    }

    #[test]
    fn test_key_kind_follows_key_encryption() {
        let mut store = MemoryStore::new();
        let settings = pepper();
        let mut access = KeyedStore::new(&mut store, &settings);
        access.set_float("volume", 0.5, Encryption::KeyOnly).unwrap();
        assert_eq!(access.key_kind("volume", Encryption::KeyOnly).unwrap(), KeyKind::Float);
        assert_eq!(access.key_kind("volume", Encryption::Disabled).unwrap(), KeyKind::Invalid);
    }
}
