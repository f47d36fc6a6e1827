//! # Verification Pipeline
//!
//! Runs one presentation through a fixed sequence of checks:
//!
//! ```text
//! STRUCTURE -> REVOCATION -> (revoked: stop) -> CHALLENGE -> SIGNATURE/INTEGRITY
//!           -> CREDENTIALS -> EXPIRATION -> AGGREGATE
//! ```
//!
//! Each check sets its flag in [`Checks`](crate::Checks) only when it passes.
//! A structural failure does not stop later checks; they run on whatever
//! data is present and fail on their own when something they need is
//! missing. The only early exit is a revoked presentation.
//!
//! ## Failure Containment
//!
//! [`VerificationPipeline::verify`] never returns an error and never
//! unwinds. Internal errors and collaborator panics become a single
//! `verification failed: internal error: …` entry with `verified = false`.
//! Findings recorded by earlier checks in that run are dropped; the result
//! carries the internal error alone.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;

use credence_core::Timestamp;
use credence_registry::RevocationStore;
use credence_vc::{
    Credential, IntegrityHasher, Presentation, ProofPurpose, SigningSuite, BASE_CREDENTIAL_TYPE,
    PRESENTATION_TYPE,
};

use crate::config::{PipelineConfig, VerifyOptions};
use crate::error::{InternalError, VerificationError};
use crate::result::VerificationResult;

/// The ordered verification pipeline.
#[derive(Clone)]
pub struct VerificationPipeline {
    registry: Arc<dyn RevocationStore>,
    suite: Arc<dyn SigningSuite>,
    config: PipelineConfig,
}

impl VerificationPipeline {
    pub fn new(registry: Arc<dyn RevocationStore>, suite: Arc<dyn SigningSuite>) -> Self {
        Self {
            registry,
            suite,
            config: PipelineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Verify an untyped presentation. `null` and documents that do not
    /// parse as a presentation fail STRUCTURE and every other check.
    pub fn verify_json(&self, value: &Value, options: &VerifyOptions) -> VerificationResult {
        let now = options.now.unwrap_or_else(Timestamp::now);
        let failure = match value {
            Value::Null => "presentation is required".to_string(),
            _ => match Presentation::from_value(value.clone()) {
                Ok(presentation) => return self.verify(&presentation, options),
                Err(e) => format!("presentation is malformed: {e}"),
            },
        };
        let id = value.get("id").and_then(Value::as_str).map(str::to_string);
        let mut result = VerificationResult::new(id, now);
        result.error(VerificationError::Structural(failure));
        result.aggregate();
        result
    }

    /// Verify `presentation`.
    pub fn verify(&self, presentation: &Presentation, options: &VerifyOptions) -> VerificationResult {
        let now = options.now.unwrap_or_else(Timestamp::now);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run(presentation, options, now)));
        let fault = match outcome {
            Ok(Ok(result)) => {
                tracing::info!(
                    presentation = presentation.display_id(),
                    verified = result.verified,
                    revoked = result.revoked,
                    errors = result.errors.len(),
                    warnings = result.warnings.len(),
                    "presentation verified"
                );
                return result;
            }
            Ok(Err(e)) => e,
            Err(payload) => InternalError::Panic(panic_message(payload.as_ref())),
        };
        tracing::error!(
            presentation = presentation.display_id(),
            error = %fault,
            "verification aborted by internal error"
        );
        VerificationResult::internal_failure(presentation.id.clone(), now, &fault.to_string())
    }

    fn run(
        &self,
        presentation: &Presentation,
        options: &VerifyOptions,
        now: Timestamp,
    ) -> Result<VerificationResult, InternalError> {
        let mut result = VerificationResult::new(presentation.id.clone(), now);

        result.checks.structure = self.check_structure(presentation, &mut result);

        result.checks.revocation = self.check_revocation(presentation, &mut result);
        if result.revoked {
            result.aggregate();
            return Ok(result);
        }

        result.checks.challenge = self.check_challenge(presentation, options, &mut result);
        result.checks.signature = self.check_signature(presentation, now, &mut result)?;
        let (credentials_ok, credentials_expired) =
            self.check_credentials(presentation, now, &mut result);
        result.checks.credentials = credentials_ok;
        result.checks.expiration =
            self.check_expiration(presentation, now, &mut result) && !credentials_expired;

        result.aggregate();
        Ok(result)
    }

    fn check_structure(&self, presentation: &Presentation, result: &mut VerificationResult) -> bool {
        let mut ok = true;
        let mut fail = |result: &mut VerificationResult, message: String| {
            ok = false;
            result.error(VerificationError::Structural(message));
        };
        if !presentation.has_type(PRESENTATION_TYPE) {
            fail(result, format!("presentation type must include {PRESENTATION_TYPE}"));
        }
        if presentation.credentials().is_empty() {
            fail(result, "presentation must contain at least one credential".to_string());
        }
        if presentation.holder.as_deref().map_or(true, str::is_empty) {
            fail(result, "presentation holder is required".to_string());
        }
        if presentation.proof.is_none() {
            fail(result, "presentation proof is required".to_string());
        }
        ok
    }

    fn check_revocation(&self, presentation: &Presentation, result: &mut VerificationResult) -> bool {
        let Some(id) = presentation.id.as_deref().filter(|id| !id.is_empty()) else {
            result.error(VerificationError::RevocationUndetermined {
                subject: "presentation".to_string(),
                reason: "presentation has no id".to_string(),
            });
            return false;
        };
        let status = self.registry.status_of(id);
        if !status.revoked {
            return true;
        }
        result.revoked = true;
        result.error(VerificationError::Revoked {
            subject: id.to_string(),
            reason: status
                .record
                .map(|r| r.reason)
                .unwrap_or_else(|| "no reason recorded".to_string()),
        });
        false
    }

    fn check_challenge(
        &self,
        presentation: &Presentation,
        options: &VerifyOptions,
        result: &mut VerificationResult,
    ) -> bool {
        let Some(proof) = presentation.proof.as_ref() else {
            result.error(VerificationError::ChallengeMismatch(
                "presentation has no proof to carry a challenge".to_string(),
            ));
            return false;
        };
        let Some(challenge) = proof.challenge.as_deref().filter(|c| !c.is_empty()) else {
            result.error(VerificationError::ChallengeMismatch(
                "proof carries no challenge".to_string(),
            ));
            return false;
        };
        let mut ok = true;
        if let Some(expected) = options.expected_challenge.as_deref() {
            if challenge != expected {
                ok = false;
                result.error(VerificationError::ChallengeMismatch(format!(
                    "expected challenge {expected:?}, got {challenge:?}"
                )));
            }
        }
        if let Some(expected) = options.expected_domain.as_deref() {
            let domain = proof.domain.as_deref();
            if domain != Some(expected) {
                ok = false;
                result.error(VerificationError::ChallengeMismatch(format!(
                    "expected domain {expected:?}, got {:?}",
                    domain.unwrap_or_default()
                )));
            }
        }
        ok
    }

    fn check_signature(
        &self,
        presentation: &Presentation,
        now: Timestamp,
        result: &mut VerificationResult,
    ) -> Result<bool, InternalError> {
        let subject = presentation.display_id().to_string();
        let signature_error = |reason: String| VerificationError::Signature {
            subject: subject.clone(),
            reason,
        };
        let Some(proof) = presentation.proof.as_ref() else {
            result.error(signature_error("presentation has no proof".to_string()));
            return Ok(false);
        };

        let mut ok = true;
        if proof.proof_type.as_deref().map_or(true, str::is_empty) {
            ok = false;
            result.error(signature_error("proof type is missing".to_string()));
        }
        if proof.verification_method.as_deref().map_or(true, str::is_empty) {
            ok = false;
            result.error(signature_error("proof verificationMethod is missing".to_string()));
        }
        if !proof.has_purpose(ProofPurpose::Authentication) {
            ok = false;
            result.error(signature_error(format!(
                "proof purpose must be {}, got {:?}",
                ProofPurpose::Authentication,
                proof.proof_purpose.as_deref().unwrap_or_default()
            )));
        }
        match proof.created.as_deref().map(Timestamp::parse_lenient) {
            None => {
                ok = false;
                result.error(signature_error("proof created timestamp is missing".to_string()));
            }
            Some(Err(e)) => {
                ok = false;
                result.error(signature_error(format!("proof created timestamp: {e}")));
            }
            Some(Ok(created)) => {
                if let Some(reason) = self.skew_violation(created, now) {
                    ok = false;
                    result.error(signature_error(reason));
                }
            }
        }

        let integrity = IntegrityHasher::check(presentation)?;
        if !integrity.valid {
            ok = false;
            result.error(integrity_error(&subject, integrity));
        }
        for credential in presentation.credentials() {
            let integrity = IntegrityHasher::check(credential)?;
            if !integrity.valid {
                ok = false;
                result.error(integrity_error(credential.display_id(), integrity));
            }
        }

        let verification = self.suite.verify(&presentation.to_value()?);
        if !verification.verified {
            ok = false;
            result.error(signature_error(
                verification
                    .error
                    .unwrap_or_else(|| "signature rejected".to_string()),
            ));
        }

        for credential in presentation.credentials() {
            ok &= self.check_credential_signature(credential, result)?;
        }
        Ok(ok)
    }

    fn check_credential_signature(
        &self,
        credential: &Credential,
        result: &mut VerificationResult,
    ) -> Result<bool, InternalError> {
        let id = credential.display_id();
        if credential.is_selective_disclosure() {
            result.warn(format!(
                "credential {id} is a selective disclosure derivation and is not independently signed"
            ));
            return Ok(true);
        }
        let signed = credential
            .proof
            .as_ref()
            .is_some_and(|p| p.proof_value.as_deref().is_some_and(|v| !v.is_empty()));
        if !signed {
            // A missing proof is reported by the CREDENTIALS check.
            if credential.proof.is_none() {
                return Ok(true);
            }
            result.error(VerificationError::Signature {
                subject: id.to_string(),
                reason: "proof carries no proofValue".to_string(),
            });
            return Ok(false);
        }
        let verification = self.suite.verify(&credential.to_value()?);
        if verification.verified {
            return Ok(true);
        }
        result.error(VerificationError::Signature {
            subject: id.to_string(),
            reason: verification
                .error
                .unwrap_or_else(|| "signature rejected".to_string()),
        });
        Ok(false)
    }

    fn skew_violation(&self, created: Timestamp, now: Timestamp) -> Option<String> {
        let created = *created.as_datetime();
        let now = *now.as_datetime();
        let skew = self.config.proof_skew;
        if now.signed_duration_since(created) > skew {
            return Some(format!(
                "proof created at {} is older than the {}s window",
                created.format("%Y-%m-%dT%H:%M:%SZ"),
                skew.num_seconds()
            ));
        }
        if created.signed_duration_since(now) > skew {
            return Some(format!(
                "proof created at {} is in the future",
                created.format("%Y-%m-%dT%H:%M:%SZ")
            ));
        }
        None
    }

    /// Returns `(well_formed_and_unexpired, any_expired)`.
    fn check_credentials(
        &self,
        presentation: &Presentation,
        now: Timestamp,
        result: &mut VerificationResult,
    ) -> (bool, bool) {
        let credentials = presentation.credentials();
        if credentials.is_empty() {
            result.error(VerificationError::Structural(
                "no credentials to verify".to_string(),
            ));
            return (false, false);
        }
        let mut ok = true;
        let mut expired = false;
        for (index, credential) in credentials.iter().enumerate() {
            let label = match credential.id.as_deref() {
                Some(id) if !id.is_empty() => id.to_string(),
                _ => format!("credential[{index}]"),
            };
            let mut missing = |what: &str, result: &mut VerificationResult| {
                ok = false;
                result.error(VerificationError::Structural(format!("{label}: {what}")));
            };
            if !credential.has_type(BASE_CREDENTIAL_TYPE) {
                missing(&format!("type must include {BASE_CREDENTIAL_TYPE}"), result);
            }
            if credential.issuer.as_deref().map_or(true, str::is_empty) {
                missing("issuer is required", result);
            }
            match credential.issuance() {
                Ok(Some(_)) => {}
                Ok(None) => missing("issuanceDate is required", result),
                Err(e) => missing(&format!("issuanceDate unreadable: {e}"), result),
            }
            if credential.proof.is_none() {
                missing("proof is required", result);
            }

            match credential.expiration() {
                Ok(None) => result.warn(format!("credential {label} has no expiration date")),
                Ok(Some(expiration)) => {
                    let remaining = expiration.as_datetime().signed_duration_since(*now.as_datetime());
                    if expiration < now {
                        ok = false;
                        expired = true;
                        result.error(VerificationError::Expiration {
                            subject: label.clone(),
                            reason: format!("expired at {expiration}"),
                        });
                    } else if remaining <= self.config.expiry_warning {
                        result.warn(format!(
                            "credential {label} expires soon ({expiration}, in {} days)",
                            remaining.num_days()
                        ));
                    }
                }
                Err(e) => {
                    ok = false;
                    expired = true;
                    result.error(VerificationError::Expiration {
                        subject: label.clone(),
                        reason: format!("unreadable expirationDate: {e}"),
                    });
                }
            }
        }
        (ok, expired)
    }

    fn check_expiration(
        &self,
        presentation: &Presentation,
        now: Timestamp,
        result: &mut VerificationResult,
    ) -> bool {
        let subject = presentation.display_id().to_string();
        match presentation.expiration() {
            Ok(None) => true,
            Ok(Some(expiration)) if expiration < now => {
                result.error(VerificationError::Expiration {
                    subject,
                    reason: format!("presentation expired at {expiration}"),
                });
                false
            }
            Ok(Some(_)) => true,
            Err(e) => {
                result.error(VerificationError::Expiration {
                    subject,
                    reason: format!("unreadable expirationDate: {e}"),
                });
                false
            }
        }
    }
}

impl std::fmt::Debug for VerificationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn integrity_error(subject: &str, check: credence_vc::IntegrityCheck) -> VerificationError {
    VerificationError::Integrity {
        subject: subject.to_string(),
        expected: check.expected_hash.unwrap_or_default(),
        actual: check.actual_hash.unwrap_or_default(),
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credence_registry::{InMemoryRevocationRegistry, RevocationRequest};
    use credence_vc::{Proof, ProofOptions, SuiteError, SuiteVerification};
    use proptest::prelude::*;
    use serde_json::json;

    struct AcceptAll;

    impl SigningSuite for AcceptAll {
        fn sign(&self, _: &Value, _: &ProofOptions) -> Result<Proof, SuiteError> {
            Err(SuiteError::NoSigningKey)
        }

        fn verify(&self, _: &Value) -> SuiteVerification {
            SuiteVerification::ok()
        }
    }

    struct Panicking;

    impl SigningSuite for Panicking {
        fn sign(&self, _: &Value, _: &ProofOptions) -> Result<Proof, SuiteError> {
            Err(SuiteError::NoSigningKey)
        }

        fn verify(&self, _: &Value) -> SuiteVerification {
            panic!("suite exploded")
        }
    }

    fn now() -> Timestamp {
        Timestamp::parse("2024-06-01T12:00:00Z").unwrap()
    }

    fn pipeline(suite: Arc<dyn SigningSuite>) -> VerificationPipeline {
        VerificationPipeline::new(Arc::new(InMemoryRevocationRegistry::new()), suite)
    }

    fn presentation(created: &str) -> Presentation {
        Presentation::from_value(json!({
            "id": "vp-1",
            "type": ["VerifiablePresentation"],
            "holder": "h1",
            "verifiableCredential": [{
                "id": "cred-1",
                "type": ["VerifiableCredential"],
                "issuer": "iss",
                "issuanceDate": "2024-01-01T00:00:00Z",
                "expirationDate": "2025-01-01T00:00:00Z",
                "credentialSubject": {"id": "sub-1"},
                "proof": {"type": "Ed25519Signature2020", "proofValue": "ab"}
            }],
            "proof": {
                "type": "Ed25519Signature2020",
                "created": created,
                "verificationMethod": "did:example:h1#key-1",
                "proofPurpose": "authentication",
                "challenge": "abc"
            }
        }))
        .unwrap()
    }

    #[test]
    fn well_formed_presentation_passes_with_accepting_suite() {
        let result = pipeline(Arc::new(AcceptAll))
            .verify(&presentation("2024-06-01T11:30:00Z"), &VerifyOptions::default().at(now()));
        assert!(result.verified, "errors: {:?}", result.errors);
        assert!(result.checks.all());
        assert!(result.warnings.is_empty(), "warnings: {:?}", result.warnings);
    }

    #[test]
    fn credential_proof_without_value_fails_signature() {
        let mut vp = presentation("2024-06-01T12:00:00Z");
        vp.verifiable_credential.as_mut().unwrap()[0]
            .proof
            .as_mut()
            .unwrap()
            .proof_value = None;
        let result = pipeline(Arc::new(AcceptAll)).verify(&vp, &VerifyOptions::default().at(now()));
        assert!(!result.verified);
        assert!(!result.checks.signature);
        assert!(result
            .errors
            .contains(&"signature: cred-1: proof carries no proofValue".to_string()));
    }

    #[test]
    fn missing_challenge_fails_even_without_expectation() {
        let mut vp = presentation("2024-06-01T12:00:00Z");
        vp.proof.as_mut().unwrap().challenge = None;
        let result = pipeline(Arc::new(AcceptAll)).verify(&vp, &VerifyOptions::default().at(now()));
        assert!(!result.checks.challenge);
        assert!(!result.verified);
        assert!(result
            .errors
            .contains(&"challenge: proof carries no challenge".to_string()));
    }

    #[test]
    fn credential_without_expiration_only_warns() {
        let mut vp = presentation("2024-06-01T12:00:00Z");
        vp.verifiable_credential.as_mut().unwrap()[0].expiration_date = None;
        let result = pipeline(Arc::new(AcceptAll)).verify(&vp, &VerifyOptions::default().at(now()));
        assert!(result.verified, "errors: {:?}", result.errors);
        assert!(result.checks.credentials);
        assert!(result.checks.expiration);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("cred-1") && w.contains("has no expiration date")));
    }

    #[test]
    fn unreadable_credential_expiration_fails_credentials_and_expiration() {
        let mut vp = presentation("2024-06-01T12:00:00Z");
        vp.verifiable_credential.as_mut().unwrap()[0].expiration_date = Some("not-a-date".to_string());
        let result = pipeline(Arc::new(AcceptAll)).verify(&vp, &VerifyOptions::default().at(now()));
        assert!(!result.verified);
        assert!(!result.checks.credentials);
        assert!(!result.checks.expiration);
        assert!(result.checks.signature);
        assert!(result.errors.iter().any(|e| e.contains("unreadable expirationDate")));
    }

    #[test]
    fn presentation_without_id_has_undetermined_revocation() {
        let mut vp = presentation("2024-06-01T12:00:00Z");
        vp.id = None;
        let result = pipeline(Arc::new(AcceptAll)).verify(&vp, &VerifyOptions::default().at(now()));
        assert!(!result.checks.revocation);
        assert!(!result.revoked);
        assert!(!result.verified);
        assert!(result
            .errors
            .contains(&"revocation: status of presentation undetermined: presentation has no id".to_string()));
    }

    #[test]
    fn stale_and_future_proofs_fail_signature() {
        let p = pipeline(Arc::new(AcceptAll));
        let options = VerifyOptions::default().at(now());
        let stale = p.verify(&presentation("2024-06-01T10:59:59Z"), &options);
        assert!(!stale.checks.signature);
        assert!(stale.errors.iter().any(|e| e.contains("older than the 3600s window")));

        let future = p.verify(&presentation("2024-06-01T13:00:01Z"), &options);
        assert!(!future.checks.signature);
        assert!(future.errors.iter().any(|e| e.contains("in the future")));

        let edge = p.verify(&presentation("2024-06-01T11:00:00Z"), &options);
        assert!(edge.checks.signature);
    }

    #[test]
    fn wrong_purpose_fails_signature_only() {
        let mut vp = presentation("2024-06-01T12:00:00Z");
        vp.proof.as_mut().unwrap().proof_purpose = Some("assertionMethod".to_string());
        let result = pipeline(Arc::new(AcceptAll)).verify(&vp, &VerifyOptions::default().at(now()));
        assert!(!result.checks.signature);
        assert!(result.checks.structure);
        assert!(result.checks.challenge);
    }

    #[test]
    fn structural_failures_do_not_stop_later_checks() {
        let mut vp = presentation("2024-06-01T12:00:00Z");
        vp.holder = None;
        vp.types = None;
        let result = pipeline(Arc::new(AcceptAll)).verify(&vp, &VerifyOptions::default().at(now()));
        assert!(!result.checks.structure);
        assert!(result.checks.revocation);
        assert!(result.checks.challenge);
        assert!(result.checks.credentials);
        assert_eq!(
            result.errors.iter().filter(|e| e.starts_with("structure:")).count(),
            2
        );
    }

    #[test]
    fn missing_proof_fails_every_dependent_check() {
        let mut vp = presentation("2024-06-01T12:00:00Z");
        vp.proof = None;
        let result = pipeline(Arc::new(AcceptAll)).verify(&vp, &VerifyOptions::default().at(now()));
        assert!(!result.checks.structure);
        assert!(!result.checks.challenge);
        assert!(!result.checks.signature);
        assert!(!result.verified);
    }

    #[test]
    fn domain_mismatch_fails_challenge() {
        let options = VerifyOptions::default().with_domain("verifier.example").at(now());
        let result = pipeline(Arc::new(AcceptAll)).verify(&presentation("2024-06-01T12:00:00Z"), &options);
        assert!(!result.checks.challenge);
        assert!(result.errors.iter().any(|e| e.contains("expected domain")));
    }

    #[test]
    fn presentation_expiration_is_error_only() {
        let mut vp = presentation("2024-06-01T12:00:00Z");
        vp.expiration_date = Some("2024-06-02T00:00:00Z".to_string());
        let result = pipeline(Arc::new(AcceptAll)).verify(&vp, &VerifyOptions::default().at(now()));
        assert!(result.checks.expiration);
        assert!(!result.warnings.iter().any(|w| w.contains("vp-1")));

        vp.expiration_date = Some("2024-05-31T00:00:00Z".to_string());
        let result = pipeline(Arc::new(AcceptAll)).verify(&vp, &VerifyOptions::default().at(now()));
        assert!(!result.checks.expiration);
        assert!(result.checks.credentials);
    }

    #[test]
    fn panicking_suite_is_contained() {
        let result = pipeline(Arc::new(Panicking))
            .verify(&presentation("2024-06-01T12:00:00Z"), &VerifyOptions::default().at(now()));
        assert!(!result.verified);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("verification failed: internal error: "));
        assert!(result.errors[0].contains("suite exploded"));
        assert_eq!(result.presentation_id.as_deref(), Some("vp-1"));
    }

    #[test]
    fn verify_json_handles_null_and_garbage() {
        let p = pipeline(Arc::new(AcceptAll));
        let options = VerifyOptions::default().at(now());

        let null = p.verify_json(&Value::Null, &options);
        assert!(!null.verified);
        assert!(!null.checks.structure);
        assert_eq!(null.errors, vec!["structure: presentation is required"]);

        let garbage = p.verify_json(&json!({"id": "vp-9", "holder": 7}), &options);
        assert!(!garbage.verified);
        assert_eq!(garbage.presentation_id.as_deref(), Some("vp-9"));
        assert!(garbage.errors[0].contains("malformed"));
    }

    proptest! {
        #[test]
        fn revoked_presentation_is_never_verified(
            id in "vp-[a-z0-9]{1,8}",
            holder in proptest::option::of("[a-z]{0,6}"),
            challenge in proptest::option::of("[a-z]{0,6}"),
            typed in any::<bool>(),
            with_credential in any::<bool>(),
            with_proof in any::<bool>(),
        ) {
            let mut value = json!({"id": id});
            if let Some(holder) = holder {
                value["holder"] = json!(holder);
            }
            if typed {
                value["type"] = json!(["VerifiablePresentation"]);
            }
            if with_credential {
                value["verifiableCredential"] = json!([{"id": "cred-1", "type": ["VerifiableCredential"]}]);
            }
            if with_proof {
                value["proof"] = json!({"type": "Ed25519Signature2020", "challenge": challenge});
            }
            let vp = Presentation::from_value(value).unwrap();

            let registry = Arc::new(InMemoryRevocationRegistry::new());
            registry.revoke(RevocationRequest::new(id.clone()).reason("withdrawn")).unwrap();
            let result = VerificationPipeline::new(registry, Arc::new(AcceptAll))
                .verify(&vp, &VerifyOptions::default().at(now()));

            prop_assert!(!result.verified);
            prop_assert!(result.revoked);
            prop_assert!(!result.checks.revocation);
            let expected = format!("revocation: {id} has been revoked (withdrawn)");
            prop_assert!(result.errors.contains(&expected));
        }
    }
}
