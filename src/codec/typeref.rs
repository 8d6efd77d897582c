//! Type reference codec
//!
//! Stores the qualified type name. A name resolves only if the catalog knows
//! it; anything else (renamed types, another crate release) reads as the
//! default.

use super::{Codec, DecodeError, decode_text};
use crate::access::KeyedStore;
use crate::registry::TypeCatalog;
use crate::types::TypeRef;
use crate::{Encryption, Result};

/// Codec for [`TypeRef`], resolving names against a shared [`TypeCatalog`]
#[derive(Debug, Clone)]
pub struct TypeRefCodec {
    catalog: TypeCatalog,
}

impl TypeRefCodec {
    pub fn new(catalog: TypeCatalog) -> Self {
        Self { catalog }
    }
}

impl Codec<TypeRef> for TypeRefCodec {
    fn encode(&self, access: &mut KeyedStore<'_>, key: &str, value: &TypeRef, mode: Encryption) -> Result<()> {
        access.set_string(key, value.name(), mode)
    }

    fn decode(&self, access: &mut KeyedStore<'_>, key: &str, default: TypeRef, mode: Encryption) -> Result<TypeRef> {
        decode_text(access, key, default, mode, |name| {
            if self.catalog.contains(name) {
                Ok(TypeRef::from_name(name))
            } else {
                Err(DecodeError::malformed(name))
            }
        })
    }
}
