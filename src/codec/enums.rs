//! Enum codec
//!
//! Stored as `"<TypeName> <Variant>"`. The type name guards against a key
//! being reused for a different enum: a mismatch reads as the default rather
//! than being coerced into the requested type.

use std::marker::PhantomData;
use std::sync::LazyLock;

use regex::Regex;

use super::{Codec, DecodeError, decode_text};
use crate::access::KeyedStore;
use crate::{Encryption, Result};

static GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z][\w]*)\s+([\w]+)$").expect("valid enum grammar")
});

/// A fieldless enum that can be stored by variant name
///
/// Usually implemented with [`crate::pref_enum!`].
pub trait PrefEnum: Sized + Send + Sync + 'static {
    /// Name written in front of the variant
    const TYPE_NAME: &'static str;

    fn variant_name(&self) -> &'static str;

    /// Case-insensitive variant lookup
    fn from_variant_name(name: &str) -> Option<Self>;
}

/// Implement [`PrefEnum`] for a fieldless enum
///
/// ```
/// use typed_prefs::{PrefEnum, pref_enum};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Difficulty {
///     Easy,
///     Hard,
/// }
///
/// pref_enum!(Difficulty { Easy, Hard });
///
/// assert_eq!(Difficulty::Hard.variant_name(), "Hard");
/// assert_eq!(Difficulty::from_variant_name("easy"), Some(Difficulty::Easy));
/// ```
#[macro_export]
macro_rules! pref_enum {
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::PrefEnum for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);

            fn variant_name(&self) -> &'static str {
                match self {
                    $($ty::$variant => stringify!($variant),)+
                }
            }

            fn from_variant_name(name: &str) -> Option<Self> {
                $(
                    if name.eq_ignore_ascii_case(stringify!($variant)) {
                        return Some($ty::$variant);
                    }
                )+
                None
            }
        }
    };
}

pub fn format_enum<E: PrefEnum>(value: &E) -> String {
    format!("{} {}", E::TYPE_NAME, value.variant_name())
}

pub fn parse_enum<E: PrefEnum>(text: &str) -> std::result::Result<E, DecodeError> {
    let caps = GRAMMAR
        .captures(text)
        .ok_or_else(|| DecodeError::malformed(text))?;
    if &caps[1] != E::TYPE_NAME {
        return Err(DecodeError::TypeMismatch {
            expected: E::TYPE_NAME,
            found: caps[1].to_string(),
        });
    }
    E::from_variant_name(&caps[2]).ok_or_else(|| DecodeError::malformed(text))
}

/// Codec for one [`PrefEnum`] type
pub struct EnumCodec<E>(PhantomData<fn() -> E>);

impl<E> EnumCodec<E> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E> Default for EnumCodec<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: PrefEnum> Codec<E> for EnumCodec<E> {
    fn encode(&self, access: &mut KeyedStore<'_>, key: &str, value: &E, mode: Encryption) -> Result<()> {
        access.set_string(key, &format_enum(value), mode)
    }

    fn decode(&self, access: &mut KeyedStore<'_>, key: &str, default: E, mode: Encryption) -> Result<E> {
        decode_text(access, key, default, mode, parse_enum::<E>)
    }
}
