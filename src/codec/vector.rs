//! Vector and quaternion codecs
//!
//! Stored as `"(a, b, ...)"`. Float components are written with three
//! decimals, so precision beyond 1e-3 does not survive a round trip.

use std::str::FromStr;
use std::sync::LazyLock;

use glam::{IVec2, IVec3, Quat, Vec2, Vec3, Vec4};
use regex::Regex;

use super::{Codec, DecodeError, decode_text};
use crate::access::KeyedStore;
use crate::{Encryption, Result};

const DECIMAL: &str = r"(-?[0-9]+(?:\.[0-9]+)?)";
const INTEGER: &str = r"(-?[0-9]+)";

fn tuple_grammar(component: &str, arity: usize) -> Regex {
    let body = vec![component; arity].join(r",\s?");
    Regex::new(&format!(r"^\({body}\)$")).expect("valid tuple grammar")
}

static FLOAT2: LazyLock<Regex> = LazyLock::new(|| tuple_grammar(DECIMAL, 2));
static FLOAT3: LazyLock<Regex> = LazyLock::new(|| tuple_grammar(DECIMAL, 3));
static FLOAT4: LazyLock<Regex> = LazyLock::new(|| tuple_grammar(DECIMAL, 4));
static INT2: LazyLock<Regex> = LazyLock::new(|| tuple_grammar(INTEGER, 2));
static INT3: LazyLock<Regex> = LazyLock::new(|| tuple_grammar(INTEGER, 3));

/// Components captured by `grammar`, or `None` if it does not match all of `text`
fn components<T: FromStr, const N: usize>(grammar: &Regex, text: &str) -> Option<[T; N]> {
    let caps = grammar.captures(text)?;
    let parsed = (1..=N)
        .map(|i| caps.get(i)?.as_str().parse().ok())
        .collect::<Option<Vec<T>>>()?;
    parsed.try_into().ok()
}

/// A value with a parenthesised tuple text form
pub trait TupleText: Sized {
    fn to_text(&self) -> String;
    fn from_text(text: &str) -> Option<Self>;
}

impl TupleText for Vec2 {
    fn to_text(&self) -> String {
        format!("({:.3}, {:.3})", self.x, self.y)
    }

    fn from_text(text: &str) -> Option<Self> {
        components(&FLOAT2, text).map(Vec2::from_array)
    }
}

impl TupleText for Vec3 {
    fn to_text(&self) -> String {
        format!("({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }

    fn from_text(text: &str) -> Option<Self> {
        components(&FLOAT3, text).map(Vec3::from_array)
    }
}

impl TupleText for Vec4 {
    fn to_text(&self) -> String {
        format!("({:.3}, {:.3}, {:.3}, {:.3})", self.x, self.y, self.z, self.w)
    }

    fn from_text(text: &str) -> Option<Self> {
        components(&FLOAT4, text).map(Vec4::from_array)
    }
}

impl TupleText for IVec2 {
    fn to_text(&self) -> String {
        format!("({}, {})", self.x, self.y)
    }

    fn from_text(text: &str) -> Option<Self> {
        components(&INT2, text).map(IVec2::from_array)
    }
}

impl TupleText for IVec3 {
    fn to_text(&self) -> String {
        format!("({}, {}, {})", self.x, self.y, self.z)
    }

    fn from_text(text: &str) -> Option<Self> {
        components(&INT3, text).map(IVec3::from_array)
    }
}

/// Components in `x, y, z, w` order, same grammar as [`Vec4`]
impl TupleText for Quat {
    fn to_text(&self) -> String {
        format!("({:.3}, {:.3}, {:.3}, {:.3})", self.x, self.y, self.z, self.w)
    }

    fn from_text(text: &str) -> Option<Self> {
        components(&FLOAT4, text).map(Quat::from_array)
    }
}

/// Codec for every [`TupleText`] type
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorCodec;

impl<V: TupleText> Codec<V> for VectorCodec {
    fn encode(&self, access: &mut KeyedStore<'_>, key: &str, value: &V, mode: Encryption) -> Result<()> {
        access.set_string(key, &value.to_text(), mode)
    }

    fn decode(&self, access: &mut KeyedStore<'_>, key: &str, default: V, mode: Encryption) -> Result<V> {
        decode_text(access, key, default, mode, |text| {
            V::from_text(text).ok_or_else(|| DecodeError::malformed(text))
        })
    }
}
