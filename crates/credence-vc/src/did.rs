//! # Verification Method Resolution
//!
//! Maps a proof's `verificationMethod` URL to the Ed25519 public key that
//! must have produced the signature.
//!
//! The built-in method is self-certifying: `did:credence:<hex public key>`
//! with fragment `#key-1`, so verification needs no network lookup. A
//! [`StaticKeyResolver`] covers deployments that pin keys for other DIDs.

use std::collections::HashMap;

use credence_core::CryptoError;
use credence_crypto::Ed25519PublicKey;

/// DID method prefix for self-certifying identifiers.
pub const DID_METHOD_PREFIX: &str = "did:credence:";

/// Fragment naming the single key of a `did:credence` identifier.
pub const KEY_FRAGMENT: &str = "#key-1";

/// Resolves verification methods to public keys.
pub trait KeyResolver: Send + Sync {
    /// The public key behind `verification_method`.
    fn resolve(&self, verification_method: &str) -> Result<Ed25519PublicKey, CryptoError>;
}

/// The DID for a public key.
pub fn did_for_key(public_key: &Ed25519PublicKey) -> String {
    format!("{DID_METHOD_PREFIX}{}", public_key.to_hex())
}

/// The verification method URL for a public key.
pub fn verification_method_for_key(public_key: &Ed25519PublicKey) -> String {
    format!("{}{KEY_FRAGMENT}", did_for_key(public_key))
}

/// Resolves `did:credence:<hex>#key-1` by decoding the key from the DID.
#[derive(Debug, Clone, Copy, Default)]
pub struct DidKeyResolver;

impl KeyResolver for DidKeyResolver {
    fn resolve(&self, verification_method: &str) -> Result<Ed25519PublicKey, CryptoError> {
        let did = verification_method
            .strip_suffix(KEY_FRAGMENT)
            .ok_or_else(|| CryptoError::KeyError(format!("expected fragment {KEY_FRAGMENT}")))?;
        let hex = did
            .strip_prefix(DID_METHOD_PREFIX)
            .ok_or_else(|| CryptoError::KeyError(format!("unsupported DID method: {did}")))?;
        Ed25519PublicKey::from_hex(hex)
    }
}

/// A fixed verification-method to key table.
#[derive(Debug, Clone, Default)]
pub struct StaticKeyResolver {
    keys: HashMap<String, Ed25519PublicKey>,
}

impl StaticKeyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `public_key` for `verification_method`.
    pub fn with_key(mut self, verification_method: impl Into<String>, public_key: Ed25519PublicKey) -> Self {
        self.keys.insert(verification_method.into(), public_key);
        self
    }
}

impl KeyResolver for StaticKeyResolver {
    fn resolve(&self, verification_method: &str) -> Result<Ed25519PublicKey, CryptoError> {
        self.keys
            .get(verification_method)
            .copied()
            .ok_or_else(|| CryptoError::KeyError(format!("no key pinned for {verification_method}")))
    }
}
