//! Backing stores
//!
//! The preference layer only needs a flat string-keyed store with native
//! int, float and string slots. Reading a key through the wrong slot yields
//! the supplied default, the same way a native preference store behaves.
//!
//! - `memory`: in-process typed slots
//! - `file`: the in-memory store flushed to a JSON file on `save`
//! - `web`: browser LocalStorage (wasm32 only)

pub mod file;
pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use file::JsonFileStore;
pub use memory::{Entry, MemoryStore};
#[cfg(target_arch = "wasm32")]
pub use web::WebStorage;

use crate::Result;

/// Primitive key-value store the codecs write through
pub trait BackingStore {
    fn get_int(&self, key: &str, default: i32) -> i32;
    fn get_float(&self, key: &str, default: f32) -> f32;
    fn get_string(&self, key: &str, default: &str) -> String;

    fn set_int(&mut self, key: &str, value: i32);
    fn set_float(&mut self, key: &str, value: f32);
    fn set_string(&mut self, key: &str, value: &str);

    fn has_key(&self, key: &str) -> bool;
    fn delete_key(&mut self, key: &str);
    fn delete_all(&mut self);

    /// Flush pending writes
    fn save(&mut self) -> Result<()>;
}
