//! Preference layer settings
//!
//! Owned by [`crate::Prefs`] and read fresh on every call, so toggling a
//! switch at runtime affects the very next read or write.

use serde::{Deserialize, Serialize};

/// Which parts of an entry get obfuscated before reaching the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Encryption {
    /// Follow [`Settings::encrypt_key`] and [`Settings::encrypt_value`]
    #[default]
    UseGlobalSettings,
    /// Neither key nor value
    Disabled,
    /// Key and value
    Both,
    KeyOnly,
    ValueOnly,
}

impl Encryption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Encryption::UseGlobalSettings => "UseGlobalSettings",
            Encryption::Disabled => "Disabled",
            Encryption::Both => "Both",
            Encryption::KeyOnly => "KeyOnly",
            Encryption::ValueOnly => "ValueOnly",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "useglobalsettings" | "global" => Some(Encryption::UseGlobalSettings),
            "disabled" | "none" => Some(Encryption::Disabled),
            "both" => Some(Encryption::Both),
            "keyonly" | "key" => Some(Encryption::KeyOnly),
            "valueonly" | "value" => Some(Encryption::ValueOnly),
            _ => None,
        }
    }

    /// Whether keys are obfuscated under this mode
    pub fn encrypts_key(&self, settings: &Settings) -> bool {
        match self {
            Encryption::UseGlobalSettings => settings.encrypt_key,
            Encryption::Both | Encryption::KeyOnly => true,
            Encryption::Disabled | Encryption::ValueOnly => false,
        }
    }

    /// Whether values are obfuscated under this mode
    pub fn encrypts_value(&self, settings: &Settings) -> bool {
        match self {
            Encryption::UseGlobalSettings => settings.encrypt_value,
            Encryption::Both | Encryption::ValueOnly => true,
            Encryption::Disabled | Encryption::KeyOnly => false,
        }
    }
}

/// What `get`/`set` do when no codec is registered for the requested type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Fallback {
    /// Report [`crate::Error::Unregistered`]
    #[default]
    Throw,
    /// Return the default on read, skip the write
    Ignore,
    /// Use the JSON codec
    TryJson,
    /// Use the binary codec
    TryBinary,
}

impl Fallback {
    pub fn as_str(&self) -> &'static str {
        match self {
            Fallback::Throw => "Throw",
            Fallback::Ignore => "Ignore",
            Fallback::TryJson => "TryJson",
            Fallback::TryBinary => "TryBinary",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "throw" | "error" => Some(Fallback::Throw),
            "ignore" => Some(Fallback::Ignore),
            "tryjson" | "json" => Some(Fallback::TryJson),
            "trybinary" | "binary" => Some(Fallback::TryBinary),
            _ => None,
        }
    }
}

/// Runtime switches for the preference layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Log a diagnostic whenever a stored value cannot be decoded
    pub enable_logging: bool,
    /// Obfuscate keys when a call uses [`Encryption::UseGlobalSettings`]
    pub encrypt_key: bool,
    /// Obfuscate values when a call uses [`Encryption::UseGlobalSettings`]
    pub encrypt_value: bool,
    /// Obfuscation secret. `None` (or empty) selects the machine identifier.
    #[serde(default)]
    pub encryption_hash: Option<String>,
    /// Delete entries that fail to decode instead of leaving them in place
    #[serde(default)]
    pub repair_malformed: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_logging: true,
            encrypt_key: false,
            encrypt_value: false,
            encryption_hash: None,
            repair_malformed: false,
        }
    }
}

impl Settings {
    /// Settings that obfuscate keys and values by default
    pub fn encrypted() -> Self {
        Self {
            encrypt_key: true,
            encrypt_value: true,
            ..Self::default()
        }
    }

    /// Explicit secret override, ignoring an empty string
    pub fn secret_override(&self) -> Option<&str> {
        self.encryption_hash.as_deref().filter(|hash| !hash.is_empty())
    }
}
