//! Reversible key/value obfuscation
//!
//! XORs the UTF-8 bytes of the input against the secret, repeated
//! cyclically, and packs the result as standard Base64. This only keeps
//! entries from being readable at a glance; anyone holding the secret (or a
//! few known plaintexts) recovers everything. It is not encryption.

use std::sync::OnceLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::Settings;

/// Used when the host exposes no machine identifier
const FALLBACK_MACHINE_ID: &str = "062e8911666e07d331ceb351d8d31faa";

const MACHINE_ID_FILES: [&str; 2] = ["/etc/machine-id", "/var/lib/dbus/machine-id"];

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("obfuscation secret is empty")]
    EmptySecret,

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded bytes are not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

fn xor_cycle(input: &[u8], secret: &[u8]) -> Result<Vec<u8>, TransformError> {
    if secret.is_empty() {
        return Err(TransformError::EmptySecret);
    }
    Ok(input
        .iter()
        .zip(secret.iter().cycle())
        .map(|(byte, key)| byte ^ key)
        .collect())
}

/// Obfuscate `plaintext` with `secret`
pub fn encode(plaintext: &str, secret: &str) -> Result<String, TransformError> {
    let bytes = xor_cycle(plaintext.as_bytes(), secret.as_bytes())?;
    Ok(STANDARD.encode(bytes))
}

/// Invert [`encode`]
pub fn decode(ciphertext: &str, secret: &str) -> Result<String, TransformError> {
    if secret.is_empty() {
        return Err(TransformError::EmptySecret);
    }
    let bytes = STANDARD.decode(ciphertext)?;
    let plain = xor_cycle(&bytes, secret.as_bytes())?;
    Ok(String::from_utf8(plain)?)
}

/// Secret in effect for `settings`: the override, else the machine identifier
pub fn secret(settings: &Settings) -> &str {
    settings.secret_override().unwrap_or_else(|| machine_secret())
}

/// Stable per-machine identifier, computed once per process
pub fn machine_secret() -> &'static str {
    static SECRET: OnceLock<String> = OnceLock::new();
    SECRET.get_or_init(|| {
        let id = machine_id().unwrap_or_else(|| FALLBACK_MACHINE_ID.to_string());
        let digest = hex::encode(Sha256::digest(id.as_bytes()));
        digest[..32].to_string()
    })
}

fn machine_id() -> Option<String> {
    MACHINE_ID_FILES
        .iter()
        .filter_map(|path| std::fs::read_to_string(path).ok())
        .map(|id| id.trim().to_string())
        .chain(
            ["HOSTNAME", "COMPUTERNAME"]
                .iter()
                .filter_map(|var| std::env::var(var).ok()),
        )
        .find(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_vector() {
        // 'a' ^ 'k' = 0x0a, 'b' ^ 'k' = 0x09
        assert_eq!(encode("ab", "k").unwrap(), "Cgk=");
        assert_eq!(decode("Cgk=", "k").unwrap(), "ab");
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        assert!(matches!(encode("abc", ""), Err(TransformError::EmptySecret)));
        assert!(matches!(decode("Cgk=", ""), Err(TransformError::EmptySecret)));
    }

    #[test]
    fn test_empty_plaintext() {
        assert_eq!(encode("", "k").unwrap(), "");
        assert_eq!(decode("", "k").unwrap(), "");
    }

    #[test]
    fn test_invalid_base64() {
        assert!(matches!(decode("***", "k"), Err(TransformError::Base64(_))));
    }

    #[test]
    fn test_wrong_secret_does_not_recover_text() {
        let encoded = encode("(1.000, 2.000, 3.000)", "alpha").unwrap();
        match decode(&encoded, "omega") {
            Ok(text) => assert_ne!(text, "(1.000, 2.000, 3.000)"),
            Err(e) => assert!(matches!(e, TransformError::Utf8(_))),
        }
    }

    #[test]
    fn test_secret_prefers_override() {
        let mut settings = Settings::default();
        assert_eq!(secret(&settings), machine_secret());
        settings.encryption_hash = Some("pepper".into());
        assert_eq!(secret(&settings), "pepper");
    }

    #[test]
    fn test_machine_secret_is_stable() {
        let first = machine_secret();
        assert_eq!(first.len(), 32);
        assert_eq!(first, machine_secret());
    }

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(text in ".*", secret in ".+") {
            let encoded = encode(&text, &secret).unwrap();
            prop_assert_eq!(decode(&encoded, &secret).unwrap(), text);
        }
    }
}
