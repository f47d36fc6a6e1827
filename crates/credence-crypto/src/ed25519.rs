//! # Ed25519 Signing and Verification
//!
//! ## Security Invariant
//!
//! - Signing input MUST be `&CanonicalBytes`; raw byte slices cannot be
//!   signed. Issuer, holder and verifier therefore agree on the exact bytes.
//! - `Ed25519KeyPair` does not implement `Serialize`. The seed leaves the
//!   type only through [`Ed25519KeyPair::seed`], wrapped in `Zeroizing`.
//!
//! ## Serde
//!
//! Public keys and signatures serialize as lowercase hex strings.

use credence_core::{CanonicalBytes, CryptoError};
use ed25519_dalek::{Signer, Verifier};
use rand_core::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroizing;

/// An Ed25519 public key (32 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey([u8; 32]);

/// An Ed25519 signature (64 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519Signature([u8; 64]);

/// An Ed25519 key pair for signing operations.
pub struct Ed25519KeyPair {
    signing_key: ed25519_dalek::SigningKey,
}

// ---------------------------------------------------------------------------
// Ed25519PublicKey
// ---------------------------------------------------------------------------

impl Ed25519PublicKey {
    /// Create a public key from raw 32 bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Return the raw 32-byte public key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the public key as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        to_hex(&self.0)
    }

    /// Parse a public key from a 64-character hex string.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let bytes = decode_fixed::<32>(hex)
            .map_err(|e| CryptoError::KeyError(format!("public key: {e}")))?;
        Ok(Self(bytes))
    }

    /// Convert to an `ed25519_dalek::VerifyingKey`.
    ///
    /// Fails for byte strings that are not a valid curve point.
    pub fn to_verifying_key(&self) -> Result<ed25519_dalek::VerifyingKey, CryptoError> {
        ed25519_dalek::VerifyingKey::from_bytes(&self.0)
            .map_err(|e| CryptoError::KeyError(format!("invalid public key: {e}")))
    }
}

impl Serialize for Ed25519PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Ed25519PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519PublicKey({}...)", to_hex(&self.0[..4]))
    }
}

impl std::fmt::Display for Ed25519PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Ed25519Signature
// ---------------------------------------------------------------------------

impl Ed25519Signature {
    /// Create a signature from raw 64 bytes.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Return the raw 64-byte signature.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Render the signature as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        to_hex(&self.0)
    }

    /// Parse a signature from a 128-character hex string.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let bytes = decode_fixed::<64>(hex)
            .map_err(|e| CryptoError::VerificationFailed(format!("signature: {e}")))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Ed25519Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Ed25519Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519Signature({}...)", to_hex(&self.0[..4]))
    }
}

impl std::fmt::Display for Ed25519Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Ed25519KeyPair
// ---------------------------------------------------------------------------

impl Ed25519KeyPair {
    /// Generate a new random key pair from the OS CSPRNG.
    pub fn generate() -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::generate(&mut OsRng),
        }
    }

    /// Create a key pair from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::from_bytes(seed),
        }
    }

    /// Create a key pair from a 64-character hex seed.
    pub fn from_seed_hex(hex: &str) -> Result<Self, CryptoError> {
        let seed = Zeroizing::new(
            decode_fixed::<32>(hex).map_err(|e| CryptoError::KeyError(format!("seed: {e}")))?,
        );
        Ok(Self::from_seed(&seed))
    }

    /// Export the 32-byte seed. The buffer is wiped when dropped.
    pub fn seed(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.signing_key.to_bytes())
    }

    /// Export the seed as hex, wiped when dropped.
    pub fn seed_hex(&self) -> Zeroizing<String> {
        let seed = self.seed();
        Zeroizing::new(to_hex(&seed[..]))
    }

    /// The public half of this key pair.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign canonical bytes.
    pub fn sign(&self, data: &CanonicalBytes) -> Ed25519Signature {
        Ed25519Signature(self.signing_key.sign(data.as_bytes()).to_bytes())
    }
}

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519KeyPair(<private>)")
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verify an Ed25519 signature over canonical bytes.
pub fn verify(
    data: &CanonicalBytes,
    signature: &Ed25519Signature,
    verifying_key: &ed25519_dalek::VerifyingKey,
) -> Result<(), CryptoError> {
    let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    verifying_key
        .verify(data.as_bytes(), &sig)
        .map_err(|e| CryptoError::VerificationFailed(format!("Ed25519 verification failed: {e}")))
}

/// Parse the public key into a verifying key and delegate to [`verify()`].
pub fn verify_with_public_key(
    data: &CanonicalBytes,
    signature: &Ed25519Signature,
    public_key: &Ed25519PublicKey,
) -> Result<(), CryptoError> {
    let vk = public_key.to_verifying_key()?;
    verify(data, signature, &vk)
}

// ---------------------------------------------------------------------------
// Hex utilities
// ---------------------------------------------------------------------------

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn decode_fixed<const N: usize>(hex: &str) -> Result<[u8; N], String> {
    let hex = hex.trim();
    if !hex.is_ascii() || hex.len() != N * 2 {
        return Err(format!("expected {} hex chars, got {}", N * 2, hex.len()));
    }
    let mut out = [0u8; N];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = u8::from_str_radix(&hex[2 * i..2 * i + 2], 16)
            .map_err(|e| format!("invalid hex at position {}: {e}", 2 * i))?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(value: serde_json::Value) -> CanonicalBytes {
        CanonicalBytes::new(&value).unwrap()
    }

    #[test]
    fn sign_and_verify() {
        let kp = Ed25519KeyPair::generate();
        let data = canonical(serde_json::json!({"message": "hello", "nonce": 42}));
        let sig = kp.sign(&data);
        verify_with_public_key(&data, &sig, &kp.public_key()).expect("valid signature");
    }

    #[test]
    fn wrong_key_fails() {
        let kp1 = Ed25519KeyPair::generate();
        let kp2 = Ed25519KeyPair::generate();
        let data = canonical(serde_json::json!({"test": true}));
        let sig = kp1.sign(&data);
        assert!(verify_with_public_key(&data, &sig, &kp2.public_key()).is_err());
    }

    #[test]
    fn wrong_message_fails() {
        let kp = Ed25519KeyPair::generate();
        let sig = kp.sign(&canonical(serde_json::json!({"msg": "original"})));
        let tampered = canonical(serde_json::json!({"msg": "tampered"}));
        assert!(verify_with_public_key(&tampered, &sig, &kp.public_key()).is_err());
    }

    #[test]
    fn seed_is_deterministic() {
        let kp1 = Ed25519KeyPair::from_seed(&[42u8; 32]);
        let kp2 = Ed25519KeyPair::from_seed_hex(&"2a".repeat(32)).unwrap();
        assert_eq!(kp1.public_key(), kp2.public_key());
        assert_eq!(kp1.seed_hex().as_str(), "2a".repeat(32));

        let data = canonical(serde_json::json!({"test": "deterministic"}));
        assert_eq!(kp1.sign(&data), kp2.sign(&data));
    }

    #[test]
    fn public_key_serde_is_hex_string() {
        let pk = Ed25519KeyPair::generate().public_key();
        let json = serde_json::to_string(&pk).unwrap();
        assert_eq!(json.len(), 64 + 2);
        let back: Ed25519PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(pk, back);
    }

    #[test]
    fn signature_hex_parses_back() {
        let kp = Ed25519KeyPair::generate();
        let sig = kp.sign(&canonical(serde_json::json!({"x": 1})));
        assert_eq!(sig.to_hex().len(), 128);
        assert_eq!(Ed25519Signature::from_hex(&sig.to_hex()).unwrap(), sig);
    }

    #[test]
    fn invalid_hex_is_rejected() {
        assert!(Ed25519PublicKey::from_hex("not-hex").is_err());
        assert!(Ed25519PublicKey::from_hex(&"zz".repeat(32)).is_err());
        assert!(Ed25519Signature::from_hex("aabb").is_err());
        assert!(Ed25519KeyPair::from_seed_hex("00").is_err());
    }

    #[test]
    fn debug_output_hides_private_key() {
        let kp = Ed25519KeyPair::generate();
        assert_eq!(format!("{kp:?}"), "Ed25519KeyPair(<private>)");
        let pk_debug = format!("{:?}", kp.public_key());
        assert!(pk_debug.starts_with("Ed25519PublicKey("));
        assert!(pk_debug.ends_with("...)"));
    }
}
