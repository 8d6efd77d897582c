//! Value types with built-in codecs that glam does not provide

use std::any::type_name;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Largest denominator tried when converting a decimal rate to a ratio
pub const MAX_DENOMINATOR: u32 = 1_000_000;

/// Ratio search stops once the error drops below this
pub const RATIO_TOLERANCE: f64 = 1e-9;

/// Linear RGBA color with `f32` channels in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }
}

/// RGBA color with 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color32 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

fn channel_to_u8(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl From<Color> for Color32 {
    fn from(c: Color) -> Self {
        Self::new(
            channel_to_u8(c.r),
            channel_to_u8(c.g),
            channel_to_u8(c.b),
            channel_to_u8(c.a),
        )
    }
}

impl From<Color32> for Color {
    fn from(c: Color32) -> Self {
        Self::new(
            f32::from(c.r) / 255.0,
            f32::from(c.g) / 255.0,
            f32::from(c.b) / 255.0,
            f32::from(c.a) / 255.0,
        )
    }
}

/// Exact refresh rate as `numerator / denominator` Hz
///
/// Compared by value: `120/2` equals `60/1`. Parsing always yields lowest
/// terms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RefreshRate {
    pub numerator: u32,
    pub denominator: u32,
}

impl Default for RefreshRate {
    fn default() -> Self {
        Self::from_int(0)
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl PartialEq for RefreshRate {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.reduced(), other.reduced());
        a.numerator == b.numerator && a.denominator == b.denominator
    }
}

impl Eq for RefreshRate {}

impl Hash for RefreshRate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let reduced = self.reduced();
        reduced.numerator.hash(state);
        reduced.denominator.hash(state);
    }
}

impl RefreshRate {
    /// `numerator / denominator` in lowest terms
    pub fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
        .reduced()
    }

    /// Same rate in lowest terms; a zero denominator is left alone
    pub fn reduced(&self) -> Self {
        match gcd(self.numerator, self.denominator) {
            0 | 1 => *self,
            divisor => Self {
                numerator: self.numerator / divisor,
                denominator: self.denominator / divisor,
            },
        }
    }

    pub const fn from_int(hz: u32) -> Self {
        Self {
            numerator: hz,
            denominator: 1,
        }
    }

    /// Closest ratio to `hz` with a denominator up to [`MAX_DENOMINATOR`]
    ///
    /// Tries every denominator in turn, keeps the best nearest numerator and
    /// stops early once the error is below [`RATIO_TOLERANCE`]. The result is
    /// in lowest terms because smaller denominators are tried first.
    pub fn from_hz(hz: f64) -> Self {
        let mut best = Self::from_int(0);
        let mut best_error = f64::MAX;

        for denominator in 1..=MAX_DENOMINATOR {
            let numerator = (hz * f64::from(denominator)).round() as u32;
            let error = (f64::from(numerator) / f64::from(denominator) - hz).abs();
            if error < best_error {
                best_error = error;
                best = Self {
                    numerator,
                    denominator,
                };
                if error < RATIO_TOLERANCE {
                    break;
                }
            }
        }
        best
    }

    pub fn hz(&self) -> f64 {
        if self.denominator == 0 {
            return 0.0;
        }
        f64::from(self.numerator) / f64::from(self.denominator)
    }

    pub fn is_integral(&self) -> bool {
        self.reduced().denominator == 1
    }
}

impl fmt::Display for RefreshRate {
    /// Integral rates print without decimals, others with the shortest
    /// representation that parses back to the same `f64`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integral() {
            write!(f, "{}", self.reduced().numerator)
        } else {
            write!(f, "{}", self.hz())
        }
    }
}

/// Display mode: pixel size plus refresh rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
    pub refresh_rate: RefreshRate,
}

impl Resolution {
    pub const fn new(width: u32, height: u32, refresh_rate: RefreshRate) -> Self {
        Self {
            width,
            height,
            refresh_rate,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {} @ {}Hz", self.width, self.height, self.refresh_rate)
    }
}

/// Persistable reference to a Rust type
///
/// The name is the full type path plus a `typed-prefs/<version>` qualifier,
/// so names written by another release of this crate do not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    name: String,
}

impl TypeRef {
    pub const QUALIFIER: &'static str = concat!("typed-prefs/", env!("CARGO_PKG_VERSION"));

    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            name: format!("{}, {}", type_name::<T>(), Self::QUALIFIER),
        }
    }

    pub(crate) fn from_name(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Qualified name as stored
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        *self == Self::of::<T>()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
