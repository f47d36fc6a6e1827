//! # Signing Suite
//!
//! The cryptographic collaborator behind issuance, presentation and the
//! SIGNATURE step of verification. The rest of the workspace only talks to
//! the [`SigningSuite`] trait, so a deployment can swap in a different
//! scheme without touching the pipeline.
//!
//! ## Signing Input
//!
//! For [`Ed25519Suite`] the signed bytes are the JCS canonical form of the
//! whole document, with `proof` replaced by the proof object minus
//! `proofValue`. Challenge, domain, `created` and `dataHash` are therefore
//! covered by the signature.

use std::sync::Arc;

use serde_json::Value;

use credence_core::{CanonicalBytes, CanonicalizationError, Timestamp};
use credence_crypto::{verify_with_public_key, Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};

use crate::did::{verification_method_for_key, DidKeyResolver, KeyResolver};
use crate::error::SuiteError;
use crate::proof::{Proof, ProofPurpose, ProofType};

/// Parameters of a proof to be created.
#[derive(Debug, Clone)]
pub struct ProofOptions {
    pub purpose: ProofPurpose,
    pub created: Timestamp,
    pub challenge: Option<String>,
    pub domain: Option<String>,
    /// Integrity hash to embed alongside the signature.
    pub data_hash: Option<String>,
}

impl ProofOptions {
    /// Options for `purpose`, created now, with no challenge or domain.
    pub fn new(purpose: ProofPurpose) -> Self {
        Self {
            purpose,
            created: Timestamp::now(),
            challenge: None,
            domain: None,
            data_hash: None,
        }
    }
}

/// Outcome of a signature check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteVerification {
    pub verified: bool,
    pub error: Option<String>,
}

impl SuiteVerification {
    pub fn ok() -> Self {
        Self {
            verified: true,
            error: None,
        }
    }

    pub fn failed(error: impl std::fmt::Display) -> Self {
        Self {
            verified: false,
            error: Some(error.to_string()),
        }
    }
}

/// A signing and verification scheme for JSON documents.
pub trait SigningSuite: Send + Sync {
    /// Produce a proof for `document`. Any proof already attached to the
    /// document is ignored.
    fn sign(&self, document: &Value, options: &ProofOptions) -> Result<Proof, SuiteError>;

    /// Check the proof attached to `document`. Never fails; problems are
    /// reported in the returned value.
    fn verify(&self, document: &Value) -> SuiteVerification;
}

/// Canonical bytes covered by `proof` when attached to `document`.
pub fn signing_input(document: &Value, proof: &Proof) -> Result<CanonicalBytes, SuiteError> {
    let Value::Object(map) = document else {
        return Err(CanonicalizationError::NotAnObject("document").into());
    };
    let mut body = map.clone();
    body.insert("proof".to_string(), serde_json::to_value(proof.without_value())?);
    Ok(CanonicalBytes::from_value(&Value::Object(body))?)
}

struct Signer {
    key_pair: Ed25519KeyPair,
    verification_method: String,
}

/// Ed25519 over JCS-canonicalized JSON.
pub struct Ed25519Suite {
    signer: Option<Signer>,
    resolver: Arc<dyn KeyResolver>,
}

impl Ed25519Suite {
    /// A suite that signs with `key_pair` under its `did:credence` method and
    /// verifies `did:credence` proofs.
    pub fn new(key_pair: Ed25519KeyPair) -> Self {
        let verification_method = verification_method_for_key(&key_pair.public_key());
        Self {
            signer: Some(Signer {
                key_pair,
                verification_method,
            }),
            resolver: Arc::new(DidKeyResolver),
        }
    }

    /// A verify-only suite for `did:credence` proofs.
    pub fn verifier() -> Self {
        Self {
            signer: None,
            resolver: Arc::new(DidKeyResolver),
        }
    }

    /// Replace the key resolver used by `verify`.
    pub fn with_resolver(mut self, resolver: Arc<dyn KeyResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Sign under a verification method other than the default one.
    pub fn with_verification_method(mut self, verification_method: impl Into<String>) -> Self {
        if let Some(signer) = self.signer.as_mut() {
            signer.verification_method = verification_method.into();
        }
        self
    }

    /// The signing verification method, if this suite can sign.
    pub fn verification_method(&self) -> Option<&str> {
        self.signer.as_ref().map(|s| s.verification_method.as_str())
    }

    /// The signing public key, if this suite can sign.
    pub fn public_key(&self) -> Option<Ed25519PublicKey> {
        self.signer.as_ref().map(|s| s.key_pair.public_key())
    }

    fn try_verify(&self, document: &Value) -> Result<(), SuiteError> {
        let raw_proof = document.get("proof").ok_or(SuiteError::MissingProof)?;
        let proof: Proof = serde_json::from_value(raw_proof.clone())?;

        let proof_type = proof.proof_type.as_deref().unwrap_or_default();
        if proof_type != ProofType::Ed25519Signature2020.as_str() {
            return Err(SuiteError::UnsupportedProofType(proof_type.to_string()));
        }
        let proof_value = proof
            .proof_value
            .as_deref()
            .ok_or(SuiteError::MissingProofValue)?;
        let method = proof.verification_method.as_deref().unwrap_or_default();
        let public_key =
            self.resolver
                .resolve(method)
                .map_err(|e| SuiteError::UnresolvableMethod {
                    method: method.to_string(),
                    reason: e.to_string(),
                })?;

        let signature = Ed25519Signature::from_hex(proof_value)?;
        let input = signing_input(document, &proof)?;
        verify_with_public_key(&input, &signature, &public_key)?;
        Ok(())
    }
}

impl std::fmt::Debug for Ed25519Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519Suite")
            .field("verification_method", &self.verification_method())
            .finish_non_exhaustive()
    }
}

impl SigningSuite for Ed25519Suite {
    fn sign(&self, document: &Value, options: &ProofOptions) -> Result<Proof, SuiteError> {
        let signer = self.signer.as_ref().ok_or(SuiteError::NoSigningKey)?;
        let mut proof = Proof {
            proof_type: Some(ProofType::Ed25519Signature2020.to_string()),
            created: Some(options.created.to_iso8601()),
            verification_method: Some(signer.verification_method.clone()),
            proof_purpose: Some(options.purpose.to_string()),
            challenge: options.challenge.clone(),
            domain: options.domain.clone(),
            data_hash: options.data_hash.clone(),
            ..Default::default()
        };
        let input = signing_input(document, &proof)?;
        proof.proof_value = Some(signer.key_pair.sign(&input).to_hex());
        Ok(proof)
    }

    fn verify(&self, document: &Value) -> SuiteVerification {
        match self.try_verify(document) {
            Ok(()) => SuiteVerification::ok(),
            Err(e) => SuiteVerification::failed(e),
        }
    }
}
