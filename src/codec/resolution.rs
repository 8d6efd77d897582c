//! Resolution codec
//!
//! Written as `"<w> x <h> @ <rate>Hz"`. On read the spaces around `x` and
//! `@` are optional and so is the `Hz` suffix.

use std::sync::LazyLock;

use regex::Regex;

use super::{Codec, DecodeError, decode_text};
use crate::access::KeyedStore;
use crate::types::{RefreshRate, Resolution};
use crate::{Encryption, Result};

static INTEGRAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)\s?x\s?([0-9]+)\s?@\s?([0-9]+)(?:[Hh][Zz])?$")
        .expect("valid resolution grammar")
});

static FRACTIONAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)\s?x\s?([0-9]+)\s?@\s?([0-9]+(?:\.[0-9]+)?)(?:[Hh][Zz])?$")
        .expect("valid resolution grammar")
});

/// Codec for [`Resolution`]
///
/// The default fractional mode keeps rates such as 59.94 Hz exact by turning
/// the decimal back into a ratio. Integer mode rounds rates to whole hertz
/// and only accepts whole numbers on read.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionCodec {
    fractional: bool,
}

impl Default for ResolutionCodec {
    fn default() -> Self {
        Self::fractional()
    }
}

impl ResolutionCodec {
    pub const fn fractional() -> Self {
        Self { fractional: true }
    }

    pub const fn integral() -> Self {
        Self { fractional: false }
    }

    pub fn format(&self, value: &Resolution) -> String {
        if self.fractional {
            value.to_string()
        } else {
            let rate = RefreshRate::from_int(value.refresh_rate.hz().round() as u32);
            Resolution { refresh_rate: rate, ..*value }.to_string()
        }
    }

    pub fn parse(&self, text: &str) -> Option<Resolution> {
        let grammar = if self.fractional { &FRACTIONAL } else { &INTEGRAL };
        let caps = grammar.captures(text)?;
        let width = caps[1].parse().ok()?;
        let height = caps[2].parse().ok()?;
        let refresh_rate = if self.fractional {
            RefreshRate::from_hz(caps[3].parse().ok()?)
        } else {
            RefreshRate::from_int(caps[3].parse().ok()?)
        };
        Some(Resolution::new(width, height, refresh_rate))
    }
}

impl Codec<Resolution> for ResolutionCodec {
    fn encode(&self, access: &mut KeyedStore<'_>, key: &str, value: &Resolution, mode: Encryption) -> Result<()> {
        access.set_string(key, &self.format(value), mode)
    }

    fn decode(&self, access: &mut KeyedStore<'_>, key: &str, default: Resolution, mode: Encryption) -> Result<Resolution> {
        decode_text(access, key, default, mode, |text| {
            self.parse(text).ok_or_else(|| DecodeError::malformed(text))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::store::{BackingStore, MemoryStore};

    #[test]
    fn test_parse_variants() {
        let codec = ResolutionCodec::fractional();
        let expected = Resolution::new(1920, 1080, RefreshRate::from_int(60));
        assert_eq!(codec.parse("1920 x 1080 @ 60Hz"), Some(expected));
        assert_eq!(codec.parse("1920x1080@60"), Some(expected));
        assert_eq!(codec.parse("1920 x 1080 @ 60hz"), Some(expected));
        assert_eq!(codec.parse("1920 x 1080"), None);
        assert_eq!(codec.parse("garbage"), None);
    }

    #[test]
    fn test_single_digit_rate() {
        let codec = ResolutionCodec::fractional();
        let res = codec.parse("640x480@5Hz").unwrap();
        assert_eq!(res.refresh_rate, RefreshRate::from_int(5));
    }

    #[test]
    fn test_fractional_rate_round_trip() {
        let codec = ResolutionCodec::fractional();
        let res = Resolution::new(
            3840,
            2160,
            RefreshRate {
                numerator: 60000,
                denominator: 1001,
            },
        );
        assert_eq!(codec.parse(&codec.format(&res)), Some(res));
    }

    #[test]
    fn test_unreduced_rate_round_trip() {
        let codec = ResolutionCodec::fractional();
        let res = Resolution::new(
            1920,
            1080,
            RefreshRate {
                numerator: 120,
                denominator: 2,
            },
        );
        assert_eq!(codec.format(&res), "1920 x 1080 @ 60Hz");
        assert_eq!(codec.parse(&codec.format(&res)), Some(res));
    }

    #[test]
    fn test_integral_mode_rounds() {
        let codec = ResolutionCodec::integral();
        let res = Resolution::new(1280, 720, RefreshRate::from_hz(59.94));
        assert_eq!(codec.format(&res), "1280 x 720 @ 60Hz");
        assert_eq!(codec.parse("1280 x 720 @ 59.94Hz"), None);
    }

    #[test]
    fn test_malformed_keeps_entry_by_default() {
        let mut store = MemoryStore::new();
        store.set_string("display", "garbage");
        let settings = Settings::default();
        let mut access = KeyedStore::new(&mut store, &settings);
        let default = Resolution::new(800, 600, RefreshRate::from_int(60));
        let value = ResolutionCodec::default()
            .decode(&mut access, "display", default, Encryption::Disabled)
            .unwrap();
        assert_eq!(value, default);
        assert!(store.has_key("display"));
    }
}
