//! # credence-crypto: Cryptographic Primitives
//!
//! Ed25519 signing and verification for credential and presentation proofs.
//!
//! - Signing input is always [`CanonicalBytes`](credence_core::CanonicalBytes).
//! - Public keys and signatures serialize as lowercase hex strings.
//! - Private key material never appears in `Debug` output and is only
//!   exported through a zeroizing buffer.
//!
//! ## Crate Policy
//!
//! - Depends only on `credence-core` internally.
//! - No mocking of cryptographic operations in tests.

pub mod ed25519;

pub use ed25519::{
    verify, verify_with_public_key, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature,
};
