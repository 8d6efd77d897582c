//! Generic binary codec
//!
//! The value is serialized with `bincode` (its serde schema is the
//! per-type contract) and wrapped in a small envelope before Base64 puts it
//! in the string slot:
//!
//! ```text
//! magic "TPB" | version u8 | payload length u32 LE | payload
//! ```
//!
//! Any envelope or payload problem reads as the default. A value that fails
//! to serialize is an error and nothing is written.

use std::marker::PhantomData;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{Codec, DecodeError, decode_text};
use crate::access::KeyedStore;
use crate::{Encryption, Error, Result};

const MAGIC: &[u8; 3] = b"TPB";
const VERSION: u8 = 1;
const HEADER_LEN: usize = MAGIC.len() + 1 + 4;

/// Wrap `payload` in the envelope
pub fn seal(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(MAGIC);
    out.push(VERSION);
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Payload inside an envelope, checking magic, version and length
pub fn open(envelope: &[u8]) -> std::result::Result<&[u8], DecodeError> {
    let bad = |why: &str| DecodeError::Serialization(format!("binary envelope: {why}"));

    if envelope.len() < HEADER_LEN {
        return Err(bad("truncated header"));
    }
    let (header, payload) = envelope.split_at(HEADER_LEN);
    if &header[..3] != MAGIC {
        return Err(bad("bad magic"));
    }
    if header[3] != VERSION {
        return Err(bad("unsupported version"));
    }
    let len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;
    if len != payload.len() {
        return Err(bad("length mismatch"));
    }
    Ok(payload)
}

pub struct BinaryCodec<T>(PhantomData<fn() -> T>);

impl<T> BinaryCodec<T> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for BinaryCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize + DeserializeOwned> Codec<T> for BinaryCodec<T> {
    fn encode(&self, access: &mut KeyedStore<'_>, key: &str, value: &T, mode: Encryption) -> Result<()> {
        match bincode::serialize(value) {
            Ok(payload) => access.set_string(key, &STANDARD.encode(seal(&payload)), mode),
            Err(e) => {
                if access.settings().enable_logging {
                    log::warn!("Preference {key:?}: binary serialization failed: {e}");
                }
                Err(Error::Serialization(e.to_string()))
            }
        }
    }

    fn decode(&self, access: &mut KeyedStore<'_>, key: &str, default: T, mode: Encryption) -> Result<T> {
        decode_text(access, key, default, mode, |text| {
            let envelope = STANDARD
                .decode(text)
                .map_err(|e| DecodeError::Serialization(e.to_string()))?;
            let payload = open(&envelope)?;
            bincode::deserialize(payload).map_err(|e| DecodeError::Serialization(e.to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::store::{BackingStore, MemoryStore};
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Save {
        wave: u32,
        score: u64,
        tags: Vec<String>,
    }

    fn sample() -> Save {
        Save {
            wave: 7,
            score: 12_345,
            tags: vec!["hard".into()],
        }
    }

    #[test]
    fn test_envelope_layout() {
        let sealed = seal(&[0xAA, 0xBB]);
        assert_eq!(sealed, vec![b'T', b'P', b'B', 1, 2, 0, 0, 0, 0xAA, 0xBB]);
        assert_eq!(open(&sealed).unwrap(), &[0xAA, 0xBB]);
    }

    #[test]
    fn test_envelope_rejects_damage() {
        let mut sealed = seal(&[1, 2, 3]);
        assert!(open(&sealed[..5]).is_err());
        assert!(open(&sealed[..sealed.len() - 1]).is_err());
        sealed[3] = 9;
        assert!(open(&sealed).is_err());
        sealed[3] = VERSION;
        sealed[0] = b'X';
        assert!(open(&sealed).is_err());
    }

    #[test]
    fn test_round_trip_encrypted() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            encryption_hash: Some("salt".into()),
            ..Settings::default()
        };
        let mut access = KeyedStore::new(&mut store, &settings);
        let codec = BinaryCodec::<Save>::new();
        codec.encode(&mut access, "save", &sample(), Encryption::Both).unwrap();
        let back = codec
            .decode(&mut access, "save", Save { wave: 0, score: 0, tags: vec![] }, Encryption::Both)
            .unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_garbage_returns_default() {
        let mut store = MemoryStore::new();
        store.set_string("save", "VFBCAQQAAAB4");
        let settings = Settings::default();
        let mut access = KeyedStore::new(&mut store, &settings);
        let back = BinaryCodec::<Save>::new()
            .decode(&mut access, "save", sample(), Encryption::Disabled)
            .unwrap();
        assert_eq!(back, sample());
    }

    /// Serializes to an error whatever the format
    #[derive(Debug, Deserialize)]
    struct Unwritable;

    impl Serialize for Unwritable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("cannot be written"))
        }
    }

    #[test]
    fn test_serialization_failure_is_an_error() {
        let mut store = MemoryStore::new();
        let settings = Settings::default();
        let mut access = KeyedStore::new(&mut store, &settings);
        let err = BinaryCodec::<Unwritable>::new()
            .encode(&mut access, "blob", &Unwritable, Encryption::Disabled)
            .unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(store.is_empty());
    }
}
