//! # Proof Envelope
//!
//! The proof object attached to credentials and presentations. Every member
//! is optional at the type level: a document with a malformed proof must
//! still parse so that verification can report *what* is wrong rather than
//! rejecting the request outright.
//!
//! Members this crate does not know about are preserved in `extra`, so
//! re-serializing a parsed proof yields the same canonical bytes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The signature scheme named by `proof.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofType {
    /// Ed25519 signature over the JCS-canonicalized document.
    Ed25519Signature2020,
}

impl ProofType {
    /// The JSON string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ed25519Signature2020 => "Ed25519Signature2020",
        }
    }
}

impl std::fmt::Display for ProofType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The purpose of a proof, per the W3C proof purpose vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProofPurpose {
    /// The issuer asserts the credential claims are true.
    AssertionMethod,
    /// The holder authenticates a presentation.
    Authentication,
    /// A holder-side derivation; the document is not independently signed.
    SelectiveDisclosure,
}

impl ProofPurpose {
    /// The JSON string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssertionMethod => "assertionMethod",
            Self::Authentication => "authentication",
            Self::SelectiveDisclosure => "selectiveDisclosure",
        }
    }
}

impl std::fmt::Display for ProofPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proof envelope.
///
/// `data_hash` is the non-cryptographic integrity tag embedded at issuance
/// (see [`IntegrityHasher`](crate::IntegrityHasher)); `proof_value` is the
/// signature produced by the signing suite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Proof {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub proof_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    #[serde(
        rename = "verificationMethod",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub verification_method: Option<String>,

    #[serde(rename = "proofPurpose", default, skip_serializing_if = "Option::is_none")]
    pub proof_purpose: Option<String>,

    #[serde(rename = "proofValue", default, skip_serializing_if = "Option::is_none")]
    pub proof_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(rename = "dataHash", default, skip_serializing_if = "Option::is_none")]
    pub data_hash: Option<String>,

    /// Members not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Proof {
    /// Whether `proofPurpose` equals `purpose`.
    pub fn has_purpose(&self, purpose: ProofPurpose) -> bool {
        self.proof_purpose.as_deref() == Some(purpose.as_str())
    }

    /// This proof with `proofValue` removed: the form that is covered by
    /// the signature itself.
    pub fn without_value(&self) -> Self {
        Self {
            proof_value: None,
            ..self.clone()
        }
    }
}
