//! # Integrity Hasher
//!
//! A content hash over the canonical form of a document with its `proof`
//! member removed. Issuers embed it as `proof.dataHash`; verifiers recompute
//! it to detect tampering independently of the digital signature.
//!
//! The embedded hash is not a cryptographic commitment: anyone able to edit
//! the document can also edit `dataHash`. A missing `dataHash` is treated as
//! "no integrity claim" and checks valid.

use serde::Serialize;
use serde_json::Value;

use credence_core::{sha256_hex, CanonicalBytes, CanonicalizationError};

use crate::credential::Credential;
use crate::presentation::Presentation;
use crate::proof::Proof;

/// A document that can carry a proof envelope.
pub trait Document: Serialize {
    /// The attached proof, if any.
    fn attached_proof(&self) -> Option<&Proof>;

    /// The document id, if any.
    fn document_id(&self) -> Option<&str>;
}

impl Document for Credential {
    fn attached_proof(&self) -> Option<&Proof> {
        self.proof.as_ref()
    }

    fn document_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Document for Presentation {
    fn attached_proof(&self) -> Option<&Proof> {
        self.proof.as_ref()
    }

    fn document_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Outcome of comparing the embedded hash with the recomputed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityCheck {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_hash: Option<String>,
}

/// Stateless hasher; see the module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegrityHasher;

impl IntegrityHasher {
    /// Canonical bytes of an arbitrary JSON value: keys sorted at every
    /// level, array order preserved.
    pub fn canonicalize(value: &Value) -> Result<CanonicalBytes, CanonicalizationError> {
        CanonicalBytes::from_value(value)
    }

    /// Lower-case hex SHA-256 of `document` with `proof` removed.
    pub fn hash<D: Document>(document: &D) -> Result<String, CanonicalizationError> {
        let value = serde_json::to_value(document)?;
        Self::hash_value(&value)
    }

    /// As [`hash`](Self::hash), for an untyped JSON object.
    pub fn hash_value(value: &Value) -> Result<String, CanonicalizationError> {
        let mut body = match value {
            Value::Object(map) => map.clone(),
            _ => return Err(CanonicalizationError::NotAnObject("document")),
        };
        body.remove("proof");
        let canonical = CanonicalBytes::from_value(&Value::Object(body))?;
        Ok(sha256_hex(&canonical))
    }

    /// The hash embedded by the issuer, if any. An empty string counts as
    /// absent.
    pub fn expected_hash(proof: Option<&Proof>) -> Option<&str> {
        proof
            .and_then(|p| p.data_hash.as_deref())
            .filter(|h| !h.is_empty())
    }

    /// Compare the embedded hash with the recomputed hash.
    pub fn check<D: Document>(document: &D) -> Result<IntegrityCheck, CanonicalizationError> {
        let Some(expected) = Self::expected_hash(document.attached_proof()) else {
            return Ok(IntegrityCheck {
                valid: true,
                expected_hash: None,
                actual_hash: None,
            });
        };
        let actual = Self::hash(document)?;
        Ok(IntegrityCheck {
            valid: expected.eq_ignore_ascii_case(&actual),
            expected_hash: Some(expected.to_string()),
            actual_hash: Some(actual),
        })
    }

    /// Compute the hash and store it in the proof, creating an empty proof
    /// when none is attached.
    pub fn embed(credential: &mut Credential) -> Result<String, CanonicalizationError> {
        let hash = Self::hash(&*credential)?;
        credential.proof.get_or_insert_with(Proof::default).data_hash = Some(hash.clone());
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn cred_1() -> Credential {
        Credential::from_value(json!({
            "id": "cred-1",
            "type": ["VerifiableCredential", "X"],
            "issuer": "iss",
            "issuanceDate": "2024-01-01T00:00:00Z",
            "credentialSubject": {"id": "sub-1", "name": "Ann", "gpa": "18"}
        }))
        .unwrap()
    }

    const CRED_1_HASH: &str = "f461d4223138c90a333cee75319bc5ced728323eb74895d5a969f91f8099355c";

    #[test]
    fn hash_matches_known_vector() {
        assert_eq!(IntegrityHasher::hash(&cred_1()).unwrap(), CRED_1_HASH);
    }

    #[test]
    fn hash_ignores_proof() {
        let mut cred = cred_1();
        cred.proof = Some(Proof {
            proof_value: Some("ab".repeat(64)),
            ..Default::default()
        });
        assert_eq!(IntegrityHasher::hash(&cred).unwrap(), CRED_1_HASH);
    }

    #[test]
    fn missing_data_hash_is_valid() {
        let check = IntegrityHasher::check(&cred_1()).unwrap();
        assert!(check.valid);
        assert!(check.expected_hash.is_none());
        assert!(check.actual_hash.is_none());
    }

    #[test]
    fn embedded_hash_verifies_and_detects_tampering() {
        let mut cred = cred_1();
        IntegrityHasher::embed(&mut cred).unwrap();
        assert!(IntegrityHasher::check(&cred).unwrap().valid);

        cred.credential_subject
            .as_mut()
            .unwrap()
            .insert("gpa".to_string(), json!("20"));
        let check = IntegrityHasher::check(&cred).unwrap();
        assert!(!check.valid);
        assert_eq!(check.expected_hash.as_deref(), Some(CRED_1_HASH));
        assert_ne!(check.actual_hash.as_deref(), Some(CRED_1_HASH));
    }

    #[test]
    fn hash_value_rejects_non_objects() {
        assert!(matches!(
            IntegrityHasher::hash_value(&json!([1])),
            Err(CanonicalizationError::NotAnObject(_))
        ));
    }

    #[test]
    fn expected_hash_treats_empty_as_absent() {
        let proof = Proof {
            data_hash: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(IntegrityHasher::expected_hash(Some(&proof)), None);
        assert_eq!(IntegrityHasher::expected_hash(None), None);
    }

    fn claim_map() -> impl Strategy<Value = Vec<(String, String)>> {
        prop::collection::btree_map("[a-z]{1,8}", "[ -~]{0,12}", 0..8)
            .prop_map(|m| m.into_iter().collect())
    }

    /// JSON object text with members written in the given order.
    fn object_text<'a>(members: impl Iterator<Item = &'a (String, String)>) -> String {
        let members: Vec<String> = members
            .map(|(k, v)| {
                format!(
                    "{}:{}",
                    serde_json::to_string(k).unwrap(),
                    serde_json::to_string(v).unwrap()
                )
            })
            .collect();
        format!("{{{}}}", members.join(","))
    }

    proptest! {
        #[test]
        fn hash_is_invariant_under_key_order(claims in claim_map()) {
            let forward = object_text(claims.iter());
            let backward = object_text(claims.iter().rev());
            if claims.len() > 1 {
                prop_assert_ne!(&forward, &backward);
            }

            let text_a = format!(r#"{{"id":"c","credentialSubject":{forward},"issuer":"i"}}"#);
            let text_b = format!(r#"{{"issuer":"i","credentialSubject":{backward},"id":"c"}}"#);
            let doc_a: Value = serde_json::from_str(&text_a).unwrap();
            let doc_b: Value = serde_json::from_str(&text_b).unwrap();
            prop_assert_eq!(
                IntegrityHasher::hash_value(&doc_a).unwrap(),
                IntegrityHasher::hash_value(&doc_b).unwrap()
            );
        }
    }
}
