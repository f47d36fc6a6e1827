//! # Verification Error Taxonomy
//!
//! Every finding of the pipeline is one of these variants. Findings are
//! rendered into `VerificationResult::errors` as strings and never returned
//! as `Err` past the pipeline boundary.

use thiserror::Error;

/// A verification finding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// A required member is missing or malformed.
    #[error("structure: {0}")]
    Structural(String),

    /// The subject has been revoked.
    #[error("revocation: {subject} has been revoked ({reason})")]
    Revoked { subject: String, reason: String },

    /// Revocation status could not be established.
    #[error("revocation: status of {subject} undetermined: {reason}")]
    RevocationUndetermined { subject: String, reason: String },

    /// The recomputed content hash differs from the embedded one.
    #[error("integrity: {subject} hash mismatch (expected {expected}, computed {actual})")]
    Integrity {
        subject: String,
        expected: String,
        actual: String,
    },

    /// Cryptographic or proof-shape failure.
    #[error("signature: {subject}: {reason}")]
    Signature { subject: String, reason: String },

    /// The subject has expired or its expiration date is unreadable.
    #[error("expiration: {subject}: {reason}")]
    Expiration { subject: String, reason: String },

    /// The proof's challenge or domain does not match what was expected.
    #[error("challenge: {0}")]
    ChallengeMismatch(String),
}

impl VerificationError {
    /// Short class name, stable for log filtering.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Structural(_) => "structural",
            Self::Revoked { .. } | Self::RevocationUndetermined { .. } => "revocation",
            Self::Integrity { .. } => "integrity",
            Self::Signature { .. } => "signature",
            Self::Expiration { .. } => "expiration",
            Self::ChallengeMismatch(_) => "challenge",
        }
    }
}

/// Unexpected failure inside the pipeline itself.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] credence_core::CanonicalizationError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Document(#[from] credence_vc::VcError),

    /// A collaborator panicked; the payload message is kept.
    #[error("panic: {0}")]
    Panic(String),
}
