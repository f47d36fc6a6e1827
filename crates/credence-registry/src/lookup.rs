//! # Issuer Revocation Lookup
//!
//! Per-credential revocation status as consulted by the presentation
//! verifier. Unlike [`RevocationStore::is_revoked`], a lookup can fail to
//! reach an answer, and that outcome is kept distinct from "not revoked" so
//! callers can fail closed.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::revocation::{RevocationStatus, RevocationStore};

/// Outcome of a revocation status query.
#[derive(Debug, Clone, PartialEq)]
pub enum RevocationLookup {
    /// The status is known.
    Determined(RevocationStatus),
    /// The status could not be established; the reason is diagnostic text.
    Undetermined(String),
}

impl RevocationLookup {
    /// Whether the status is known and revoked.
    pub fn is_revoked(&self) -> bool {
        matches!(self, Self::Determined(status) if status.revoked)
    }
}

/// Source of per-credential revocation status.
pub trait IssuerRevocationLookup: Send + Sync {
    /// Status of `credential_id` as issued by `issuer`.
    fn check_revocation_status(&self, credential_id: &str, issuer: Option<&str>) -> RevocationLookup;
}

/// Answers from a local [`RevocationStore`].
///
/// With a known-issuer set configured, credentials from any other issuer are
/// `Undetermined`: this registry is not authoritative for them.
#[derive(Clone)]
pub struct RegistryRevocationLookup {
    store: Arc<dyn RevocationStore>,
    known_issuers: Option<BTreeSet<String>>,
}

impl RegistryRevocationLookup {
    /// A lookup authoritative for every issuer.
    pub fn new(store: Arc<dyn RevocationStore>) -> Self {
        Self {
            store,
            known_issuers: None,
        }
    }

    /// Restrict authority to `issuers`.
    pub fn with_known_issuers<I, S>(mut self, issuers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_issuers = Some(issuers.into_iter().map(Into::into).collect());
        self
    }
}

impl std::fmt::Debug for RegistryRevocationLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryRevocationLookup")
            .field("known_issuers", &self.known_issuers)
            .finish_non_exhaustive()
    }
}

impl IssuerRevocationLookup for RegistryRevocationLookup {
    fn check_revocation_status(&self, credential_id: &str, issuer: Option<&str>) -> RevocationLookup {
        if credential_id.trim().is_empty() {
            return RevocationLookup::Undetermined("credential has no id".to_string());
        }
        if let Some(known) = &self.known_issuers {
            match issuer {
                Some(issuer) if known.contains(issuer) => {}
                Some(issuer) => {
                    return RevocationLookup::Undetermined(format!("unknown issuer {issuer}"))
                }
                None => return RevocationLookup::Undetermined("credential has no issuer".to_string()),
            }
        }
        RevocationLookup::Determined(self.store.status_of(credential_id))
    }
}
