//! Codecs mapping typed values to the store's primitive slots
//!
//! - `primitive`: `i32`, `f32`, `bool`, `String`
//! - `vector`: glam vectors and quaternions as `"(a, b, ...)"`
//! - `color`: hex colors
//! - `resolution`: `"<w> x <h> @ <rate>Hz"`
//! - `enums`: `"<TypeName> <Variant>"`
//! - `typeref`: qualified type names
//! - `json`, `binary`: generic serde fallbacks

pub mod binary;
pub mod color;
pub mod enums;
pub mod json;
pub mod primitive;
pub mod resolution;
pub mod typeref;
pub mod vector;

pub use binary::BinaryCodec;
pub use color::HexColorCodec;
pub use enums::{EnumCodec, PrefEnum};
pub use json::JsonCodec;
pub use primitive::{BoolCodec, FloatCodec, IntCodec, StringCodec};
pub use resolution::ResolutionCodec;
pub use typeref::TypeRefCodec;
pub use vector::VectorCodec;

use thiserror::Error;

use crate::access::KeyedStore;
use crate::{Encryption, Result};

/// Encodes values of `T` into the store and decodes them back
///
/// `decode` never fails on the stored entry itself: anything unreadable is
/// reported through [`KeyedStore::recover`] and yields `default`. Errors are
/// reserved for configuration defects such as an empty secret.
pub trait Codec<T>: Send + Sync {
    fn encode(&self, access: &mut KeyedStore<'_>, key: &str, value: &T, mode: Encryption) -> Result<()>;

    fn decode(&self, access: &mut KeyedStore<'_>, key: &str, default: T, mode: Encryption) -> Result<T>;
}

/// Why a stored entry could not be decoded
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("value is incorrect {input:?}")]
    Malformed { input: String },

    #[error("contains another enum type ({expected} => {found})")]
    TypeMismatch { expected: &'static str, found: String },

    #[error("obfuscated value cannot be read: {0}")]
    Unreadable(String),

    #[error("deserialization failed: {0}")]
    Serialization(String),
}

impl DecodeError {
    pub(crate) fn malformed(input: &str) -> Self {
        DecodeError::Malformed {
            input: input.to_string(),
        }
    }
}

/// Read the string slot under `key` and parse it
///
/// Absent entries give `default` untouched; parse failures go through
/// [`KeyedStore::recover`] and also give `default`.
pub(crate) fn decode_text<T>(
    access: &mut KeyedStore<'_>,
    key: &str,
    default: T,
    mode: Encryption,
    parse: impl FnOnce(&str) -> std::result::Result<T, DecodeError>,
) -> Result<T> {
    let Some(text) = access.get_string_opt(key, mode)? else {
        return Ok(default);
    };
    match parse(&text) {
        Ok(value) => Ok(value),
        Err(err) => {
            access.recover(key, mode, &err)?;
            Ok(default)
        }
    }
}
