//! # Content Digest
//!
//! SHA-256 digests over [`CanonicalBytes`]. The function signatures accept
//! only canonical bytes, so every digest in the system is computed over the
//! same serialization regardless of the key order a document arrived in.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;
use crate::error::CryptoError;

/// A 32-byte SHA-256 content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Wrap raw digest bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse a 64-character hex digest. Upper-case input is accepted.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let hex = hex.trim();
        if !hex.is_ascii() || hex.len() != 64 {
            return Err(CryptoError::InvalidHex(format!(
                "digest hex must be 64 chars, got {}",
                hex.len()
            )));
        }
        let mut bytes = [0u8; 32];
        for (i, slot) in bytes.iter_mut().enumerate() {
            *slot = u8::from_str_radix(&hex[2 * i..2 * i + 2], 16)
                .map_err(|e| CryptoError::InvalidHex(format!("position {}: {e}", 2 * i)))?;
        }
        Ok(Self { bytes })
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

/// Compute a SHA-256 content digest from canonical bytes.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest::new(bytes)
}

/// Compute a lowercase SHA-256 hex string from canonical bytes.
pub fn sha256_hex(data: &CanonicalBytes) -> String {
    sha256_digest(data).to_hex()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_sha256_vector() {
        let cb = CanonicalBytes::new(&serde_json::json!({})).unwrap();
        assert_eq!(
            sha256_hex(&cb),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn hex_is_lowercase_and_64_chars() {
        let cb = CanonicalBytes::new(&serde_json::json!({"key": "value"})).unwrap();
        let hex = sha256_hex(&cb);
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn display_is_algorithm_prefixed() {
        let cb = CanonicalBytes::new(&serde_json::json!({"a": 1})).unwrap();
        let s = sha256_digest(&cb).to_string();
        assert!(s.starts_with("sha256:"));
        assert_eq!(s.len(), 7 + 64);
    }

    #[test]
    fn different_inputs_different_digests() {
        let a = CanonicalBytes::new(&serde_json::json!({"a": 1})).unwrap();
        let b = CanonicalBytes::new(&serde_json::json!({"a": 2})).unwrap();
        assert_ne!(sha256_digest(&a), sha256_digest(&b));
    }

    #[test]
    fn from_hex_accepts_own_output() {
        let cb = CanonicalBytes::new(&serde_json::json!({"n": "x"})).unwrap();
        let digest = sha256_digest(&cb);
        assert_eq!(ContentDigest::from_hex(&digest.to_hex()).unwrap(), digest);
        assert_eq!(
            ContentDigest::from_hex(&digest.to_hex().to_uppercase()).unwrap(),
            digest
        );
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(ContentDigest::from_hex("abcd").is_err());
        assert!(ContentDigest::from_hex(&"zz".repeat(32)).is_err());
    }
}
