//! Typed preferences over a primitive key/value store
//!
//! Core modules:
//! - `store`: Backing stores with int, float and string slots
//! - `obfuscate`: Reversible key/value scrambling (XOR + Base64)
//! - `access`: Keyed reads and writes through the obfuscation settings
//! - `codec`: Text and binary encodings for typed values
//! - `registry`: Codec lookup by value type
//! - `prefs`: The `get`/`set` facade with fallback policy

pub mod access;
pub mod codec;
pub mod obfuscate;
pub mod prefs;
pub mod registry;
pub mod settings;
pub mod store;
pub mod types;

pub use access::{KeyKind, KeyedStore};
pub use codec::{Codec, DecodeError, EnumCodec, PrefEnum};
pub use prefs::{PrefValue, Prefs};
pub use registry::{Registry, TypeCatalog};
pub use settings::{Encryption, Fallback, Settings};
pub use store::{BackingStore, JsonFileStore, MemoryStore};
pub use types::{Color, Color32, RefreshRate, Resolution, TypeRef};

#[cfg(target_arch = "wasm32")]
pub use store::WebStorage;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No codec registered for the type and the fallback policy is `Throw`
    #[error("no codec registered for {0}")]
    Unregistered(&'static str),

    #[error("obfuscation secret is empty")]
    DegenerateSecret,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(String),

    /// A generic codec could not serialize the value; nothing was written
    #[error("serialization failed: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;
