//! Holder-side operations: derive reduced-claim copies and wrap credentials
//! into signed presentations.

use std::sync::Arc;

use credence_core::Timestamp;

use crate::credential::{Credential, DerivedCredential};
use crate::disclosure::SelectiveDisclosureDeriver;
use crate::error::{DisclosureError, VcError};
use crate::integrity::IntegrityHasher;
use crate::presentation::Presentation;
use crate::proof::ProofPurpose;
use crate::suite::{ProofOptions, SigningSuite};

/// Options for [`Holder::present`].
#[derive(Debug, Clone, Default)]
pub struct PresentOptions {
    /// Presentation id; a fresh `urn:uuid:` when absent.
    pub id: Option<String>,
    /// Verifier-supplied nonce.
    pub challenge: Option<String>,
    /// Verifier domain the presentation is bound to.
    pub domain: Option<String>,
    pub expiration_date: Option<String>,
}

/// A credential holder with a signing identity.
#[derive(Clone)]
pub struct Holder {
    suite: Arc<dyn SigningSuite>,
    did: String,
    deriver: SelectiveDisclosureDeriver,
}

impl Holder {
    pub fn new(suite: Arc<dyn SigningSuite>, did: impl Into<String>) -> Self {
        Self {
            suite,
            did: did.into(),
            deriver: SelectiveDisclosureDeriver::default(),
        }
    }

    /// Use a custom disclosure vocabulary.
    pub fn with_deriver(mut self, deriver: SelectiveDisclosureDeriver) -> Self {
        self.deriver = deriver;
        self
    }

    pub fn did(&self) -> &str {
        &self.did
    }

    /// Derive a copy of `credential` without the claims named in `hide`.
    pub fn derive<S: AsRef<str>>(
        &self,
        credential: &Credential,
        hide: &[S],
    ) -> Result<DerivedCredential, DisclosureError> {
        self.deriver.derive(credential, hide)
    }

    pub fn present(
        &self,
        credentials: Vec<Credential>,
        options: PresentOptions,
    ) -> Result<Presentation, VcError> {
        self.present_at(credentials, options, Timestamp::now())
    }

    /// Wrap `credentials` into a presentation signed for authentication.
    pub fn present_at(
        &self,
        credentials: Vec<Credential>,
        options: PresentOptions,
        now: Timestamp,
    ) -> Result<Presentation, VcError> {
        if credentials.is_empty() {
            return Err(VcError::EmptyPresentation);
        }
        let id = options
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("urn:uuid:{}", uuid::Uuid::new_v4()));
        let mut presentation = Presentation::new(id, self.did.clone(), credentials);
        presentation.expiration_date = options.expiration_date;

        let proof_options = ProofOptions {
            created: now,
            challenge: options.challenge,
            domain: options.domain,
            data_hash: Some(IntegrityHasher::hash(&presentation)?),
            ..ProofOptions::new(ProofPurpose::Authentication)
        };
        let proof = self.suite.sign(&presentation.to_value()?, &proof_options)?;
        presentation.proof = Some(proof);

        tracing::debug!(
            presentation = presentation.display_id(),
            credentials = presentation.credentials().len(),
            "built presentation"
        );
        Ok(presentation)
    }
}

impl std::fmt::Debug for Holder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Holder").field("did", &self.did).finish_non_exhaustive()
    }
}
