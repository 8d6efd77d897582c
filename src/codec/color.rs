//! Hex color codec
//!
//! Written as `#RRGGBB` or `#RRGGBBAA`. Reads accept 3, 4, 6 or 8 hex digits
//! with or without the leading `#`; short forms repeat each digit.

use super::{Codec, DecodeError, decode_text};
use crate::access::KeyedStore;
use crate::types::{Color, Color32};
use crate::{Encryption, Result};

/// Codec for [`Color`] and [`Color32`]
#[derive(Debug, Clone, Copy)]
pub struct HexColorCodec {
    write_alpha: bool,
}

impl Default for HexColorCodec {
    fn default() -> Self {
        Self::new(true)
    }
}

impl HexColorCodec {
    pub const fn new(write_alpha: bool) -> Self {
        Self { write_alpha }
    }

    pub fn write_alpha(&self) -> bool {
        self.write_alpha
    }

    pub fn format(&self, c: Color32) -> String {
        if self.write_alpha {
            format!("#{:02X}{:02X}{:02X}{:02X}", c.r, c.g, c.b, c.a)
        } else {
            format!("#{:02X}{:02X}{:02X}", c.r, c.g, c.b)
        }
    }
}

/// Parse an HTML-style hex color; a missing `#` is tolerated
pub fn parse_hex(text: &str) -> Option<Color32> {
    let hex = text.strip_prefix('#').unwrap_or(text);
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|n| n * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Color32::new(nibble(0)?, nibble(1)?, nibble(2)?, 255)),
        4 => Some(Color32::new(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Some(Color32::new(byte(0)?, byte(2)?, byte(4)?, 255)),
        8 => Some(Color32::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

impl Codec<Color32> for HexColorCodec {
    fn encode(&self, access: &mut KeyedStore<'_>, key: &str, value: &Color32, mode: Encryption) -> Result<()> {
        access.set_string(key, &self.format(*value), mode)
    }

    fn decode(&self, access: &mut KeyedStore<'_>, key: &str, default: Color32, mode: Encryption) -> Result<Color32> {
        decode_text(access, key, default, mode, |text| {
            parse_hex(text).ok_or_else(|| DecodeError::malformed(text))
        })
    }
}

/// Channels are quantised to 8 bits on write
impl Codec<Color> for HexColorCodec {
    fn encode(&self, access: &mut KeyedStore<'_>, key: &str, value: &Color, mode: Encryption) -> Result<()> {
        access.set_string(key, &self.format(Color32::from(*value)), mode)
    }

    fn decode(&self, access: &mut KeyedStore<'_>, key: &str, default: Color, mode: Encryption) -> Result<Color> {
        decode_text(access, key, default, mode, |text| {
            parse_hex(text)
                .map(Color::from)
                .ok_or_else(|| DecodeError::malformed(text))
        })
    }
}
