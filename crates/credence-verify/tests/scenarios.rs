//! End-to-end verification scenarios with the real Ed25519 suite: issue,
//! derive, present, revoke, verify.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::{json, Map, Value};

use credence_core::Timestamp;
use credence_crypto::Ed25519KeyPair;
use credence_registry::{
    InMemoryRevocationRegistry, RegistryRevocationLookup, RevocationRequest, RevocationStore,
};
use credence_vc::{
    did_for_key, Credential, Ed25519Suite, Holder, Issuer, IntegrityHasher, PresentOptions,
    Presentation,
};
use credence_verify::{PresentationVerifier, VerificationPipeline, VerifyOptions};

struct World {
    registry: Arc<InMemoryRevocationRegistry>,
    issuer: Issuer,
    holder: Holder,
    verifier: PresentationVerifier,
    now: Timestamp,
}

fn world() -> World {
    let registry = Arc::new(InMemoryRevocationRegistry::new());
    let issuer_key = Ed25519KeyPair::from_seed(&[11u8; 32]);
    let issuer_did = did_for_key(&issuer_key.public_key());
    let holder_key = Ed25519KeyPair::from_seed(&[22u8; 32]);
    let holder_did = did_for_key(&holder_key.public_key());

    let pipeline = VerificationPipeline::new(registry.clone(), Arc::new(Ed25519Suite::verifier()));
    let verifier = PresentationVerifier::new(
        pipeline,
        Arc::new(RegistryRevocationLookup::new(registry.clone())),
    );
    World {
        registry,
        issuer: Issuer::new(Arc::new(Ed25519Suite::new(issuer_key)), issuer_did),
        holder: Holder::new(Arc::new(Ed25519Suite::new(holder_key)), holder_did),
        verifier,
        now: Timestamp::now(),
    }
}

fn subject() -> Map<String, Value> {
    json!({"id": "sub-1", "name": "Ann", "gpa": "18"})
        .as_object()
        .cloned()
        .unwrap()
}

fn cred_1(world: &World, expiration: Option<Timestamp>) -> Credential {
    let mut cred = Credential::new("cred-1", &["X"], subject());
    cred.issuer = Some("iss".to_string());
    cred.issuance_date = Some("2024-01-01T00:00:00Z".to_string());
    cred.expiration_date = expiration.map(|t| t.to_iso8601());
    world.issuer.issue_at(cred, world.now).unwrap()
}

fn vp_1(world: &World, credentials: Vec<Credential>) -> Presentation {
    world
        .holder
        .present_at(
            credentials,
            PresentOptions {
                id: Some("vp-1".to_string()),
                challenge: Some("abc".to_string()),
                ..Default::default()
            },
            world.now,
        )
        .unwrap()
}

fn days(n: i64) -> Timestamp {
    Timestamp::from_utc(Utc::now() + Duration::days(n))
}

#[test]
fn issued_presentation_verifies() {
    let w = world();
    let vp = vp_1(&w, vec![cred_1(&w, Some(days(365)))]);
    let report = w.verifier.verify(&vp, &VerifyOptions::default().with_challenge("abc").at(w.now));
    assert!(report.result.verified, "errors: {:?}", report.result.errors);
    assert!(report.result.checks.all());
    assert!(!report.result.revoked);
}

#[test]
fn derive_hides_gpa() {
    let w = world();
    let derived = w.holder.derive(&cred_1(&w, None), &["gpa"]).unwrap();
    let subject = derived.credential().credential_subject.as_ref().unwrap();
    assert_eq!(subject.get("name"), Some(&json!("Ann")));
    assert!(!subject.contains_key("gpa"));
    assert_eq!(derived.hidden_fields(), ["gpa".to_string()]);
}

#[test]
fn derived_presentation_verifies_with_warning() {
    let w = world();
    let derived = w.holder.derive(&cred_1(&w, Some(days(365))), &["gpa"]).unwrap();
    let vp = vp_1(&w, vec![derived.into_credential()]);
    let report = w.verifier.verify(&vp, &VerifyOptions::default().with_challenge("abc").at(w.now));
    assert!(report.result.verified, "errors: {:?}", report.result.errors);
    assert!(report
        .result
        .warnings
        .iter()
        .any(|w| w.contains("not independently signed")));
    assert_eq!(report.disclosure.hidden_fields, ["gpa"]);
}

#[test]
fn challenge_must_match() {
    let w = world();
    let vp = vp_1(&w, vec![cred_1(&w, None)]);

    let ok = w.verifier.verify(&vp, &VerifyOptions::default().with_challenge("abc").at(w.now));
    assert!(ok.result.checks.challenge);

    let bad = w.verifier.verify(&vp, &VerifyOptions::default().with_challenge("zzz").at(w.now));
    assert!(!bad.result.checks.challenge);
    assert!(!bad.result.verified);
}

#[test]
fn unsigned_presentation_literal_passes_challenge_only_checks() {
    let w = world();
    let vp = Presentation::from_value(json!({
        "id": "vp-1",
        "type": ["VerifiablePresentation"],
        "holder": "h1",
        "verifiableCredential": [{
            "id": "cred-1",
            "type": ["VerifiableCredential", "X"],
            "issuer": "iss",
            "issuanceDate": "2024-01-01T00:00:00Z",
            "credentialSubject": {"id": "sub-1", "name": "Ann", "gpa": "18"}
        }],
        "proof": {"challenge": "abc", "created": w.now.to_iso8601()}
    }))
    .unwrap();

    let ok = w.verifier.verify(&vp, &VerifyOptions::default().with_challenge("abc").at(w.now));
    assert!(ok.result.checks.challenge);
    assert!(ok.result.checks.structure);
    assert!(!ok.result.checks.signature);

    let bad = w.verifier.verify(&vp, &VerifyOptions::default().with_challenge("zzz").at(w.now));
    assert!(!bad.result.checks.challenge);
    assert!(!bad.result.verified);
}

#[test]
fn revoked_presentation_short_circuits() {
    let w = world();
    let vp = vp_1(&w, vec![cred_1(&w, None)]);
    w.registry
        .revoke(RevocationRequest::new("vp-1").reason("superseded"))
        .unwrap();

    let result = w
        .verifier
        .pipeline()
        .verify(&vp, &VerifyOptions::default().with_challenge("abc").at(w.now));
    assert!(!result.verified);
    assert!(result.revoked);
    assert!(result.errors.iter().any(|e| e.contains("revoked (superseded)")));
    assert!(result.checks.structure);
    assert!(!result.checks.challenge);
    assert!(!result.checks.signature);
    assert!(!result.checks.credentials);
    assert!(!result.checks.expiration);
    assert_eq!(result.errors.len(), 1);
    assert!(result.warnings.is_empty());
}

#[test]
fn revoked_credential_fails_policy() {
    let w = world();
    let vp = vp_1(&w, vec![cred_1(&w, None)]);
    w.registry
        .revoke(RevocationRequest::new("cred-1").reason("key compromise"))
        .unwrap();
    let report = w.verifier.verify(&vp, &VerifyOptions::default().with_challenge("abc").at(w.now));
    assert!(!report.result.verified);
    assert!(report.result.revoked);
    assert!(report.policy_failure.is_some());
}

#[test]
fn expiring_soon_is_a_warning() {
    let w = world();
    let vp = vp_1(&w, vec![cred_1(&w, Some(days(10)))]);
    let report = w.verifier.verify(&vp, &VerifyOptions::default().with_challenge("abc").at(w.now));
    assert!(report.result.checks.expiration);
    assert!(report.result.warnings.iter().any(|w| w.contains("expires soon")));
}

#[test]
fn expired_credential_fails_expiration() {
    let w = world();
    let vp = vp_1(&w, vec![cred_1(&w, Some(days(-10)))]);
    let report = w.verifier.verify(&vp, &VerifyOptions::default().with_challenge("abc").at(w.now));
    assert!(!report.result.checks.expiration);
    assert!(!report.result.checks.credentials);
    assert!(!report.result.verified);
}

#[test]
fn tampered_claim_fails_integrity_but_not_structure() {
    let w = world();
    let mut vp = vp_1(&w, vec![cred_1(&w, None)]);
    vp.verifiable_credential.as_mut().unwrap()[0]
        .credential_subject
        .as_mut()
        .unwrap()
        .insert("gpa".to_string(), json!("20"));

    let report = w.verifier.verify(&vp, &VerifyOptions::default().with_challenge("abc").at(w.now));
    assert!(report.result.checks.structure);
    assert!(!report.result.checks.signature);
    assert!(report.result.errors.iter().any(|e| e.starts_with("integrity: cred-1")));
    assert!(!report.result.verified);
}

/// Raise the gpa claim and re-embed the integrity hash so only the
/// credential signature can catch the change.
fn forge_gpa(credential: &mut Credential) {
    credential
        .credential_subject
        .as_mut()
        .unwrap()
        .insert("gpa".to_string(), json!("20"));
    IntegrityHasher::embed(credential).unwrap();
}

#[test]
fn forged_claim_with_stripped_proof_value_fails_signature() {
    let w = world();
    let mut cred = cred_1(&w, Some(days(365)));
    forge_gpa(&mut cred);
    cred.proof.as_mut().unwrap().proof_value = None;
    let vp = vp_1(&w, vec![cred]);

    let report = w.verifier.verify(&vp, &VerifyOptions::default().with_challenge("abc").at(w.now));
    assert!(!report.result.verified);
    assert!(!report.result.checks.signature);
    assert!(!report.result.errors.iter().any(|e| e.starts_with("integrity:")));
    assert!(report
        .result
        .errors
        .iter()
        .any(|e| e == "signature: cred-1: proof carries no proofValue"));
}

#[test]
fn derived_from_marker_alone_does_not_skip_signature() {
    let w = world();
    let mut cred = cred_1(&w, Some(days(365)));
    forge_gpa(&mut cred);
    cred.derived_from = Some("cred-0".to_string());
    IntegrityHasher::embed(&mut cred).unwrap();
    let vp = vp_1(&w, vec![cred]);

    let report = w.verifier.verify(&vp, &VerifyOptions::default().with_challenge("abc").at(w.now));
    assert!(!report.result.verified);
    assert!(!report.result.checks.signature);
    assert!(report.result.errors.iter().any(|e| e.starts_with("signature: cred-1")));
    assert!(!report
        .result
        .warnings
        .iter()
        .any(|w| w.contains("selective disclosure derivation")));
}

#[test]
fn history_lists_every_verification() {
    let w = world();
    let vp = vp_1(&w, vec![cred_1(&w, None)]);
    let options = VerifyOptions::default().with_challenge("abc").at(w.now);
    let first = w.verifier.verify(&vp, &options);
    let second = w.verifier.verify(&vp, &options);
    assert_ne!(first.id, second.id);
    let results = w.verifier.history().results();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0], first.result);
}
