//! # Presentation Verifier
//!
//! Policy layer over [`VerificationPipeline`] for selective-disclosure
//! workflows:
//!
//! 1. Run the pipeline.
//! 2. Consult the issuer revocation lookup for every embedded credential,
//!    and for the origin of every derived credential. An `Undetermined`
//!    answer fails the presentation; status is never assumed active.
//! 3. Attach a disclosure analysis, which never changes the verdict.
//! 4. Append the report to the verification history.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use credence_registry::{IssuerRevocationLookup, RevocationLookup, RevocationRecord};
use credence_vc::{Credential, Presentation, SelectivePointerMap};

use crate::config::VerifyOptions;
use crate::disclosure::{analyze_disclosure, DisclosureReport};
use crate::error::VerificationError;
use crate::history::VerificationHistory;
use crate::pipeline::{panic_message, VerificationPipeline};
use crate::result::VerificationResult;

/// A credential found revoked by the lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokedCredential {
    pub credential_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<RevocationRecord>,
}

/// A credential whose status the lookup could not establish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndeterminedRevocation {
    pub credential_id: String,
    pub reason: String,
}

/// Why the policy layer failed a presentation, independent of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyFailure {
    /// At least one embedded credential is revoked.
    CredentialRevoked { revoked: Vec<RevokedCredential> },
    /// Revocation status of at least one credential is unknown.
    RevocationUndetermined {
        undetermined: Vec<UndeterminedRevocation>,
    },
}

/// Everything the verifier concluded about one presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationReport {
    /// History key.
    pub id: Uuid,
    pub result: VerificationResult,
    pub disclosure: DisclosureReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_failure: Option<PolicyFailure>,
}

/// Pipeline plus per-credential revocation policy and audit history.
#[derive(Clone)]
pub struct PresentationVerifier {
    pipeline: VerificationPipeline,
    lookup: Arc<dyn IssuerRevocationLookup>,
    pointers: SelectivePointerMap,
    history: Arc<VerificationHistory>,
}

impl PresentationVerifier {
    pub fn new(pipeline: VerificationPipeline, lookup: Arc<dyn IssuerRevocationLookup>) -> Self {
        Self {
            pipeline,
            lookup,
            pointers: SelectivePointerMap::default(),
            history: Arc::new(VerificationHistory::new()),
        }
    }

    /// Use a custom disclosure vocabulary for the analysis.
    pub fn with_pointers(mut self, pointers: SelectivePointerMap) -> Self {
        self.pointers = pointers;
        self
    }

    /// Record into a shared history.
    pub fn with_history(mut self, history: Arc<VerificationHistory>) -> Self {
        self.history = history;
        self
    }

    pub fn history(&self) -> &Arc<VerificationHistory> {
        &self.history
    }

    pub fn pipeline(&self) -> &VerificationPipeline {
        &self.pipeline
    }

    /// Verify an untyped presentation. Input that does not parse is
    /// reported by the pipeline and still recorded.
    pub fn verify_json(&self, value: &Value, options: &VerifyOptions) -> PresentationReport {
        match Presentation::from_value(value.clone()) {
            Ok(presentation) if !value.is_null() => self.verify(&presentation, options),
            _ => {
                let result = self.pipeline.verify_json(value, options);
                self.record(result, analyze_disclosure(&[], &self.pointers), None)
            }
        }
    }

    /// Verify `presentation` and record the report.
    pub fn verify(&self, presentation: &Presentation, options: &VerifyOptions) -> PresentationReport {
        let mut result = self.pipeline.verify(presentation, options);
        let policy_failure = self.consult_revocation(presentation.credentials(), &mut result);
        result.aggregate();
        if let Some(failure) = &policy_failure {
            tracing::warn!(
                presentation = presentation.display_id(),
                failure = ?failure,
                "presentation failed revocation policy"
            );
        }
        let disclosure = analyze_disclosure(presentation.credentials(), &self.pointers);
        self.record(result, disclosure, policy_failure)
    }

    fn record(
        &self,
        result: VerificationResult,
        disclosure: DisclosureReport,
        policy_failure: Option<PolicyFailure>,
    ) -> PresentationReport {
        let report = PresentationReport {
            id: Uuid::new_v4(),
            result,
            disclosure,
            policy_failure,
        };
        self.history.append(report.clone());
        report
    }

    fn consult_revocation(
        &self,
        credentials: &[Credential],
        result: &mut VerificationResult,
    ) -> Option<PolicyFailure> {
        let mut revoked = Vec::new();
        let mut undetermined = Vec::new();

        for credential in credentials {
            let own_id = credential.id.clone().unwrap_or_default();
            let subjects = std::iter::once(own_id).chain(credential.origin_id().map(str::to_string));
            for subject in subjects {
                match self.lookup_status(&subject, credential.issuer.as_deref()) {
                    RevocationLookup::Determined(status) if status.revoked => {
                        result.error(VerificationError::Revoked {
                            subject: subject.clone(),
                            reason: status
                                .record
                                .as_ref()
                                .map(|r| r.reason.clone())
                                .unwrap_or_else(|| "no reason recorded".to_string()),
                        });
                        revoked.push(RevokedCredential {
                            credential_id: subject,
                            record: status.record,
                        });
                    }
                    RevocationLookup::Determined(_) => {}
                    RevocationLookup::Undetermined(reason) => {
                        let label = if subject.is_empty() {
                            "<unidentified credential>".to_string()
                        } else {
                            subject
                        };
                        result.error(VerificationError::RevocationUndetermined {
                            subject: label.clone(),
                            reason: reason.clone(),
                        });
                        undetermined.push(UndeterminedRevocation {
                            credential_id: label,
                            reason,
                        });
                    }
                }
            }
        }

        if !revoked.is_empty() {
            result.revoked = true;
            result.checks.revocation = false;
            return Some(PolicyFailure::CredentialRevoked { revoked });
        }
        if !undetermined.is_empty() {
            result.checks.revocation = false;
            return Some(PolicyFailure::RevocationUndetermined { undetermined });
        }
        None
    }

    fn lookup_status(&self, credential_id: &str, issuer: Option<&str>) -> RevocationLookup {
        panic::catch_unwind(AssertUnwindSafe(|| {
            self.lookup.check_revocation_status(credential_id, issuer)
        }))
        .unwrap_or_else(|payload| {
            let message = panic_message(payload.as_ref());
            tracing::error!(credential = credential_id, error = %message, "revocation lookup panicked");
            RevocationLookup::Undetermined(format!("revocation lookup failed: {message}"))
        })
    }
}

impl std::fmt::Debug for PresentationVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentationVerifier")
            .field("pipeline", &self.pipeline)
            .field("history_len", &self.history.len())
            .finish_non_exhaustive()
    }
}
