//! Type-keyed codec registry
//!
//! Maps a value type's [`TypeId`] to its [`Codec`]. The first registration
//! for a type wins and later ones are ignored, so installing the built-ins
//! twice is harmless.

use std::any::{Any, TypeId, type_name};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use glam::{IVec2, IVec3, Quat, Vec2, Vec3, Vec4};
use parking_lot::RwLock;

use crate::codec::{
    BoolCodec, Codec, FloatCodec, HexColorCodec, IntCodec, ResolutionCodec, StringCodec,
    TypeRefCodec, VectorCodec,
};
use crate::types::{Color, Color32, Resolution, TypeRef};

/// Qualified type names the registry has seen
///
/// Shared between the registry and [`TypeRefCodec`] so types registered
/// after the codec still resolve.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    names: Arc<RwLock<HashSet<String>>>,
}

impl TypeCatalog {
    pub fn declare<T: ?Sized + 'static>(&self) {
        self.names.write().insert(TypeRef::of::<T>().name().to_string());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.read().contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.read().is_empty()
    }
}

/// Codec lookup by value type
#[derive(Default)]
pub struct Registry {
    /// Each value is an `Arc<dyn Codec<T>>` for the `T` of its key
    codecs: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    catalog: TypeCatalog,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("codecs", &self.codecs.len())
            .field("catalog", &self.catalog.len())
            .finish()
    }
}

impl Registry {
    /// Empty registry, no built-ins
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in codec set installed
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_builtins();
        registry
    }

    /// Install the built-in codecs; types that already have one keep it
    pub fn register_builtins(&mut self) {
        self.register::<String>(StringCodec);
        self.register::<i32>(IntCodec);
        self.register::<f32>(FloatCodec);
        self.register::<bool>(BoolCodec);

        self.register::<Color>(HexColorCodec::new(true));
        self.register::<Color32>(HexColorCodec::new(true));

        self.register::<Vec2>(VectorCodec);
        self.register::<IVec2>(VectorCodec);
        self.register::<Vec3>(VectorCodec);
        self.register::<IVec3>(VectorCodec);
        self.register::<Vec4>(VectorCodec);
        self.register::<Quat>(VectorCodec);

        self.register::<Resolution>(ResolutionCodec::default());
        self.register::<TypeRef>(TypeRefCodec::new(self.catalog.clone()));
    }

    /// Register `codec` for `T`
    ///
    /// Returns `false` and leaves the existing codec in place if `T` already
    /// has one.
    pub fn register<T: 'static>(&mut self, codec: impl Codec<T> + 'static) -> bool {
        self.register_arc::<T>(Arc::new(codec))
    }

    /// Register a default-constructed `C` for `T`
    pub fn register_default<T: 'static, C: Codec<T> + Default + 'static>(&mut self) -> bool {
        self.register::<T>(C::default())
    }

    pub fn register_arc<T: 'static>(&mut self, codec: Arc<dyn Codec<T>>) -> bool {
        self.catalog.declare::<T>();
        let id = TypeId::of::<T>();
        if self.codecs.contains_key(&id) {
            log::debug!("Codec for {} already registered, keeping the first", type_name::<T>());
            return false;
        }
        self.codecs.insert(id, Box::new(codec));
        true
    }

    pub fn lookup<T: 'static>(&self) -> Option<Arc<dyn Codec<T>>> {
        self.codecs
            .get(&TypeId::of::<T>())
            .and_then(|codec| codec.downcast_ref::<Arc<dyn Codec<T>>>())
            .cloned()
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.codecs.contains_key(&TypeId::of::<T>())
    }

    /// Make `T`'s name resolvable by the type reference codec without
    /// registering a codec for it
    pub fn declare_type<T: ?Sized + 'static>(&self) {
        self.catalog.declare::<T>();
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Number of registered codecs
    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}
