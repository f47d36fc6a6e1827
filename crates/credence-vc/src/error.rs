//! # Error Types
//!
//! Errors raised by the document-level building blocks. These are programmer
//! or caller errors surfaced synchronously to the direct caller; verification
//! never raises them (it reports into a `VerificationResult` instead).

use thiserror::Error;

/// Errors from issuance, presentation building and document conversion.
#[derive(Error, Debug)]
pub enum VcError {
    /// Canonicalization of the document body failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] credence_core::CanonicalizationError),

    /// The signing suite refused to sign.
    #[error("signing suite error: {0}")]
    Suite(#[from] SuiteError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A member required for this operation is absent or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// `type` does not include the required marker type.
    #[error("type must include {0:?}")]
    MissingBaseType(&'static str),

    /// A presentation must carry at least one credential.
    #[error("presentation must contain at least one credential")]
    EmptyPresentation,

    /// A credential lacks the derivation members of a derived credential.
    #[error("credential {0:?} is not a derived credential")]
    NotDerived(String),
}

/// Errors from selective-disclosure derivation.
#[derive(Error, Debug)]
pub enum DisclosureError {
    /// The source credential has no `credentialSubject`.
    #[error("credential {credential_id:?} has no credentialSubject")]
    MissingSubject {
        /// Source credential id, or `"<unidentified>"`.
        credential_id: String,
    },

    /// The source credential has no `id` to derive from.
    #[error("credential has no id; derived credentials must reference their origin")]
    MissingId,

    /// A pointer map entry does not point into `credentialSubject`.
    #[error("pointer {pointer:?} for field {name:?} must start with /credentialSubject/")]
    InvalidPointer {
        /// Semantic field name.
        name: String,
        /// Offending pointer.
        pointer: String,
    },

    /// Recomputing the integrity hash of the derived document failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] credence_core::CanonicalizationError),

    /// The derived document could not be rebuilt from JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the signing/verification suite.
#[derive(Error, Debug)]
pub enum SuiteError {
    /// The suite was built for verification only.
    #[error("suite has no signing key")]
    NoSigningKey,

    /// The document has no proof to verify.
    #[error("document has no proof")]
    MissingProof,

    /// The proof carries no `proofValue`.
    #[error("proof has no proofValue")]
    MissingProofValue,

    /// `proof.type` is absent or names a scheme this suite cannot check.
    #[error("unsupported proof type: {0}")]
    UnsupportedProofType(String),

    /// The verification method could not be resolved to a key.
    #[error("cannot resolve verification method {method:?}: {reason}")]
    UnresolvableMethod {
        /// The verification method URL.
        method: String,
        /// Resolver diagnostic.
        reason: String,
    },

    /// Key parsing or signature verification failed.
    #[error(transparent)]
    Crypto(#[from] credence_core::CryptoError),

    /// The signing input could not be canonicalized.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] credence_core::CanonicalizationError),

    /// The document or proof could not be converted to or from JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
