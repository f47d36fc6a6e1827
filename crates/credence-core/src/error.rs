//! # Error Types
//!
//! Leaf error types shared by every crate in the workspace. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Higher layers wrap these in their own enums (`VcError`, `SuiteError`,
//! `RevocationError`) rather than growing a single workspace-wide error.

use thiserror::Error;

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// The value could not be converted into a JSON tree or written out
    /// in canonical form.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    /// Canonicalization of a document requires a JSON object at the root.
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// Error in cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Signature verification failed.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// Key generation or parsing failed.
    #[error("key error: {0}")]
    KeyError(String),

    /// A hex-encoded value could not be decoded.
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

/// Error parsing or constructing a [`Timestamp`](crate::Timestamp).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    /// The string is not a recognised ISO-8601 form.
    #[error("invalid ISO-8601 timestamp {value:?}: {reason}")]
    Invalid {
        /// The rejected input.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// The timestamp used a non-UTC offset where UTC was required.
    #[error("timestamp must use Z suffix (UTC only), got: {0:?}")]
    NotUtc(String),

    /// Epoch seconds out of the representable range.
    #[error("invalid unix timestamp: {0}")]
    OutOfRange(i64),
}
