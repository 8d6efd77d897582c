//! Typed preference facade
//!
//! [`Prefs`] owns the backing store, the codec registry and the settings.
//! `get`/`set` pick the codec registered for the value type;
//! `get_or_fallback`/`set_or_fallback` fall back to the generic JSON or
//! binary codec when asked to.

use std::any::type_name;
use std::sync::Arc;

use glam::{IVec2, IVec3, Quat, Vec2, Vec3, Vec4};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::access::{KeyKind, KeyedStore};
use crate::codec::{
    BinaryCodec, BoolCodec, Codec, EnumCodec, FloatCodec, HexColorCodec, IntCodec, JsonCodec,
    PrefEnum, ResolutionCodec, StringCodec, TypeRefCodec, VectorCodec,
};
use crate::registry::Registry;
use crate::store::BackingStore;
use crate::types::{Color, Color32, Resolution, TypeRef};
use crate::{Encryption, Error, Fallback, Result, Settings};

/// Types the generic JSON and binary codecs can handle
///
/// Required by the fallback entry points only; `get`/`set` accept any type
/// with a registered codec.
pub trait PrefValue: Serialize + DeserializeOwned + 'static {}

impl<T: Serialize + DeserializeOwned + 'static> PrefValue for T {}

/// Typed preferences over a [`BackingStore`]
pub struct Prefs<S: BackingStore> {
    store: S,
    registry: Registry,
    settings: Settings,
}

impl<S: BackingStore> Prefs<S> {
    /// Preferences with the built-in codecs and default settings
    pub fn new(store: S) -> Self {
        Self::with_registry(store, Registry::with_builtins(), Settings::default())
    }

    pub fn with_settings(store: S, settings: Settings) -> Self {
        Self::with_registry(store, Registry::with_builtins(), settings)
    }

    pub fn with_registry(store: S, registry: Registry, settings: Settings) -> Self {
        Self {
            store,
            registry,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Changes apply from the next call on
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Raw backing store, bypassing codecs and obfuscation
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn access(&mut self) -> KeyedStore<'_> {
        KeyedStore::new(&mut self.store, &self.settings)
    }

    /// Register `codec` for `T`; a type keeps its first codec
    pub fn register<T: 'static>(&mut self, codec: impl Codec<T> + 'static) -> bool {
        self.registry.register::<T>(codec)
    }

    pub fn register_default<T: 'static, C: Codec<T> + Default + 'static>(&mut self) -> bool {
        self.registry.register_default::<T, C>()
    }

    /// Let stored type references to `T` resolve without a codec for `T`
    pub fn declare_type<T: ?Sized + 'static>(&self) {
        self.registry.declare_type::<T>();
    }

    fn registered<T: 'static>(&self) -> Result<Arc<dyn Codec<T>>> {
        self.registry
            .lookup::<T>()
            .ok_or(Error::Unregistered(type_name::<T>()))
    }

    fn resolve<T: PrefValue>(&self, fallback: Fallback) -> Result<Option<Arc<dyn Codec<T>>>> {
        if let Some(codec) = self.registry.lookup::<T>() {
            return Ok(Some(codec));
        }
        let codec: Arc<dyn Codec<T>> = match fallback {
            Fallback::Throw => return Err(Error::Unregistered(type_name::<T>())),
            Fallback::Ignore => return Ok(None),
            Fallback::TryJson => Arc::new(JsonCodec::<T>::new()),
            Fallback::TryBinary => Arc::new(BinaryCodec::<T>::new()),
        };
        Ok(Some(codec))
    }

    /// Read `key` as `T` through the codec registered for `T`
    ///
    /// Missing or unreadable entries give `default`. A type without a codec
    /// fails with [`Error::Unregistered`]; see [`Prefs::get_or_fallback`] for
    /// serde types.
    pub fn get<T: 'static>(&mut self, key: &str, default: T, mode: Encryption) -> Result<T> {
        let codec = self.registered::<T>()?;
        codec.decode(&mut self.access(), key, default, mode)
    }

    /// Write `value` under `key` through the codec registered for `T`
    pub fn set<T: 'static>(&mut self, key: &str, value: &T, mode: Encryption) -> Result<()> {
        let codec = self.registered::<T>()?;
        codec.encode(&mut self.access(), key, value, mode)
    }

    /// [`Prefs::get`] with a policy for types that have no codec
    ///
    /// [`Fallback::Throw`] fails with [`Error::Unregistered`],
    /// [`Fallback::Ignore`] returns `default` without touching the store and
    /// the `Try*` variants go through the generic JSON or binary codec.
    pub fn get_or_fallback<T: PrefValue>(
        &mut self,
        key: &str,
        default: T,
        mode: Encryption,
        fallback: Fallback,
    ) -> Result<T> {
        match self.resolve::<T>(fallback)? {
            Some(codec) => codec.decode(&mut self.access(), key, default, mode),
            None => Ok(default),
        }
    }

    /// [`Prefs::set`] with a policy for types that have no codec;
    /// [`Fallback::Ignore`] skips the write
    ///
    /// A value the generic codec cannot serialize fails with
    /// [`Error::Serialization`] and leaves the store untouched.
    pub fn set_or_fallback<T: PrefValue>(
        &mut self,
        key: &str,
        value: &T,
        mode: Encryption,
        fallback: Fallback,
    ) -> Result<()> {
        match self.resolve::<T>(fallback)? {
            Some(codec) => codec.encode(&mut self.access(), key, value, mode),
            None => Ok(()),
        }
    }

    fn decode_with<T>(&mut self, codec: &impl Codec<T>, key: &str, default: T, mode: Encryption) -> Result<T> {
        codec.decode(&mut self.access(), key, default, mode)
    }

    fn encode_with<T>(&mut self, codec: &impl Codec<T>, key: &str, value: &T, mode: Encryption) -> Result<()> {
        codec.encode(&mut self.access(), key, value, mode)
    }

    pub fn get_int(&mut self, key: &str, default: i32) -> Result<i32> {
        self.decode_with(&IntCodec, key, default, Encryption::UseGlobalSettings)
    }

    pub fn set_int(&mut self, key: &str, value: i32) -> Result<()> {
        self.encode_with(&IntCodec, key, &value, Encryption::UseGlobalSettings)
    }

    pub fn get_float(&mut self, key: &str, default: f32) -> Result<f32> {
        self.decode_with(&FloatCodec, key, default, Encryption::UseGlobalSettings)
    }

    pub fn set_float(&mut self, key: &str, value: f32) -> Result<()> {
        self.encode_with(&FloatCodec, key, &value, Encryption::UseGlobalSettings)
    }

    pub fn get_bool(&mut self, key: &str, default: bool) -> Result<bool> {
        self.decode_with(&BoolCodec, key, default, Encryption::UseGlobalSettings)
    }

    pub fn set_bool(&mut self, key: &str, value: bool) -> Result<()> {
        self.encode_with(&BoolCodec, key, &value, Encryption::UseGlobalSettings)
    }

    pub fn get_string(&mut self, key: &str, default: &str) -> Result<String> {
        self.decode_with(&StringCodec, key, default.to_string(), Encryption::UseGlobalSettings)
    }

    pub fn set_string(&mut self, key: &str, value: &str) -> Result<()> {
        self.access().set_string(key, value, Encryption::UseGlobalSettings)
    }

    pub fn get_vec2(&mut self, key: &str, default: Vec2) -> Result<Vec2> {
        self.decode_with(&VectorCodec, key, default, Encryption::UseGlobalSettings)
    }

    pub fn set_vec2(&mut self, key: &str, value: Vec2) -> Result<()> {
        self.encode_with(&VectorCodec, key, &value, Encryption::UseGlobalSettings)
    }

    pub fn get_ivec2(&mut self, key: &str, default: IVec2) -> Result<IVec2> {
        self.decode_with(&VectorCodec, key, default, Encryption::UseGlobalSettings)
    }

    pub fn set_ivec2(&mut self, key: &str, value: IVec2) -> Result<()> {
        self.encode_with(&VectorCodec, key, &value, Encryption::UseGlobalSettings)
    }

    pub fn get_vec3(&mut self, key: &str, default: Vec3) -> Result<Vec3> {
        self.decode_with(&VectorCodec, key, default, Encryption::UseGlobalSettings)
    }

    pub fn set_vec3(&mut self, key: &str, value: Vec3) -> Result<()> {
        self.encode_with(&VectorCodec, key, &value, Encryption::UseGlobalSettings)
    }

    pub fn get_ivec3(&mut self, key: &str, default: IVec3) -> Result<IVec3> {
        self.decode_with(&VectorCodec, key, default, Encryption::UseGlobalSettings)
    }

    pub fn set_ivec3(&mut self, key: &str, value: IVec3) -> Result<()> {
        self.encode_with(&VectorCodec, key, &value, Encryption::UseGlobalSettings)
    }

    pub fn get_vec4(&mut self, key: &str, default: Vec4) -> Result<Vec4> {
        self.decode_with(&VectorCodec, key, default, Encryption::UseGlobalSettings)
    }

    pub fn set_vec4(&mut self, key: &str, value: Vec4) -> Result<()> {
        self.encode_with(&VectorCodec, key, &value, Encryption::UseGlobalSettings)
    }

    pub fn get_quat(&mut self, key: &str, default: Quat) -> Result<Quat> {
        self.decode_with(&VectorCodec, key, default, Encryption::UseGlobalSettings)
    }

    pub fn set_quat(&mut self, key: &str, value: Quat) -> Result<()> {
        self.encode_with(&VectorCodec, key, &value, Encryption::UseGlobalSettings)
    }

    pub fn get_color(&mut self, key: &str, default: Color) -> Result<Color> {
        self.decode_with(&HexColorCodec::default(), key, default, Encryption::UseGlobalSettings)
    }

    /// Written as `#RRGGBBAA`
    pub fn set_color(&mut self, key: &str, value: Color) -> Result<()> {
        self.set_color_with_alpha(key, value, true)
    }

    pub fn set_color_with_alpha(&mut self, key: &str, value: Color, write_alpha: bool) -> Result<()> {
        self.encode_with(&HexColorCodec::new(write_alpha), key, &value, Encryption::UseGlobalSettings)
    }

    pub fn get_color32(&mut self, key: &str, default: Color32) -> Result<Color32> {
        self.decode_with(&HexColorCodec::default(), key, default, Encryption::UseGlobalSettings)
    }

    pub fn set_color32(&mut self, key: &str, value: Color32) -> Result<()> {
        self.set_color32_with_alpha(key, value, true)
    }

    pub fn set_color32_with_alpha(&mut self, key: &str, value: Color32, write_alpha: bool) -> Result<()> {
        self.encode_with(&HexColorCodec::new(write_alpha), key, &value, Encryption::UseGlobalSettings)
    }

    pub fn get_resolution(&mut self, key: &str, default: Resolution) -> Result<Resolution> {
        self.decode_with(&ResolutionCodec::default(), key, default, Encryption::UseGlobalSettings)
    }

    pub fn set_resolution(&mut self, key: &str, value: Resolution) -> Result<()> {
        self.encode_with(&ResolutionCodec::default(), key, &value, Encryption::UseGlobalSettings)
    }

    /// Works without registering an [`EnumCodec`] for `E`
    pub fn get_enum<E: PrefEnum>(&mut self, key: &str, default: E) -> Result<E> {
        self.decode_with(&EnumCodec::<E>::new(), key, default, Encryption::UseGlobalSettings)
    }

    pub fn set_enum<E: PrefEnum>(&mut self, key: &str, value: E) -> Result<()> {
        self.encode_with(&EnumCodec::<E>::new(), key, &value, Encryption::UseGlobalSettings)
    }

    /// Resolved against the registry's type catalog
    pub fn get_type(&mut self, key: &str, default: TypeRef) -> Result<TypeRef> {
        let codec = TypeRefCodec::new(self.registry.catalog().clone());
        self.decode_with(&codec, key, default, Encryption::UseGlobalSettings)
    }

    pub fn set_type(&mut self, key: &str, value: &TypeRef) -> Result<()> {
        let codec = TypeRefCodec::new(self.registry.catalog().clone());
        self.encode_with(&codec, key, value, Encryption::UseGlobalSettings)
    }

    pub fn get_json<T: PrefValue>(&mut self, key: &str, default: T, mode: Encryption) -> Result<T> {
        self.decode_with(&JsonCodec::<T>::new(), key, default, mode)
    }

    pub fn set_json<T: PrefValue>(&mut self, key: &str, value: &T, mode: Encryption) -> Result<()> {
        self.encode_with(&JsonCodec::<T>::new(), key, value, mode)
    }

    pub fn get_binary<T: PrefValue>(&mut self, key: &str, default: T, mode: Encryption) -> Result<T> {
        self.decode_with(&BinaryCodec::<T>::new(), key, default, mode)
    }

    pub fn set_binary<T: PrefValue>(&mut self, key: &str, value: &T, mode: Encryption) -> Result<()> {
        self.encode_with(&BinaryCodec::<T>::new(), key, value, mode)
    }

    /// Binary blob that is never obfuscated, whatever the settings say
    pub fn get_object<T: PrefValue>(&mut self, key: &str, default: T) -> Result<T> {
        self.get_binary(key, default, Encryption::Disabled)
    }

    pub fn set_object<T: PrefValue>(&mut self, key: &str, value: &T) -> Result<()> {
        self.set_binary(key, value, Encryption::Disabled)
    }

    /// Guess the primitive shape stored under the raw `key`; see
    /// [`KeyedStore::key_kind`] for the limits of the heuristic
    pub fn key_kind(&mut self, key: &str) -> Result<KeyKind> {
        self.access().key_kind(key, Encryption::Disabled)
    }

    pub fn is_string(&mut self, key: &str) -> Result<bool> {
        self.access().is_string(key, Encryption::Disabled)
    }

    pub fn is_float(&mut self, key: &str) -> Result<bool> {
        self.access().is_float(key, Encryption::Disabled)
    }

    pub fn is_int(&mut self, key: &str) -> Result<bool> {
        self.access().is_int(key, Encryption::Disabled)
    }

    /// Presence of the raw `key`
    pub fn has_key(&self, key: &str) -> bool {
        self.store.has_key(key)
    }

    /// Presence of `key` after the key transform for `mode`
    pub fn contains(&mut self, key: &str, mode: Encryption) -> Result<bool> {
        self.access().has_key(key, mode)
    }

    pub fn delete_key(&mut self, key: &str) {
        self.store.delete_key(key);
    }

    /// Delete `key` after the key transform for `mode`
    pub fn remove(&mut self, key: &str, mode: Encryption) -> Result<()> {
        self.access().delete_key(key, mode)
    }

    pub fn delete_all(&mut self) {
        self.store.delete_all();
    }

    pub fn save(&mut self) -> Result<()> {
        self.store.save()
    }
}
