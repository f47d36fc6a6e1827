//! Credential issuance: fill defaults, embed the integrity hash, sign.

use std::sync::Arc;

use credence_core::Timestamp;

use crate::credential::{Credential, TypeValue, BASE_CREDENTIAL_TYPE};
use crate::error::VcError;
use crate::integrity::IntegrityHasher;
use crate::proof::ProofPurpose;
use crate::suite::{ProofOptions, SigningSuite};

/// Signs credentials on behalf of one issuer identity.
#[derive(Clone)]
pub struct Issuer {
    suite: Arc<dyn SigningSuite>,
    did: String,
}

impl Issuer {
    pub fn new(suite: Arc<dyn SigningSuite>, did: impl Into<String>) -> Self {
        Self {
            suite,
            did: did.into(),
        }
    }

    pub fn did(&self) -> &str {
        &self.did
    }

    /// Issue `credential`, signed now.
    pub fn issue(&self, credential: Credential) -> Result<Credential, VcError> {
        self.issue_at(credential, Timestamp::now())
    }

    /// Issue `credential` with `now` as issuance and proof time.
    ///
    /// Missing `issuer`, `id`, `type` and `issuanceDate` are filled in. A
    /// credential without claims, or whose explicit `type` lacks the base
    /// marker, is rejected.
    pub fn issue_at(&self, mut credential: Credential, now: Timestamp) -> Result<Credential, VcError> {
        if credential.credential_subject.is_none() {
            return Err(VcError::MissingField("credentialSubject"));
        }
        let types = credential
            .types
            .get_or_insert_with(|| TypeValue::of(&[BASE_CREDENTIAL_TYPE]));
        if !types.contains(BASE_CREDENTIAL_TYPE) {
            return Err(VcError::MissingBaseType(BASE_CREDENTIAL_TYPE));
        }
        if credential.issuer.as_deref().map_or(true, str::is_empty) {
            credential.issuer = Some(self.did.clone());
        }
        if credential.id.as_deref().map_or(true, str::is_empty) {
            credential.id = Some(format!("urn:uuid:{}", uuid::Uuid::new_v4()));
        }
        if credential.issuance_date.as_deref().map_or(true, str::is_empty) {
            credential.issuance_date = Some(now.to_iso8601());
        }
        credential.proof = None;

        let data_hash = IntegrityHasher::hash(&credential)?;
        let options = ProofOptions {
            data_hash: Some(data_hash),
            created: now,
            ..ProofOptions::new(ProofPurpose::AssertionMethod)
        };
        let proof = self.suite.sign(&credential.to_value()?, &options)?;
        credential.proof = Some(proof);

        tracing::info!(
            credential = credential.display_id(),
            issuer = %self.did,
            "issued credential"
        );
        Ok(credential)
    }
}

impl std::fmt::Debug for Issuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Issuer").field("did", &self.did).finish_non_exhaustive()
    }
}
