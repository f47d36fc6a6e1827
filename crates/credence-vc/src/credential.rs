//! # Verifiable Credential
//!
//! The W3C credential envelope as a typed record. Required members are
//! still `Option` here: the parser is the trust boundary for JSON *shape*,
//! while missing members are reported by verification as structural errors.
//!
//! ## Field Naming
//!
//! Serde renames map snake_case fields to the W3C member names
//! (`@context`, `type`, `issuanceDate`, `credentialSubject`, …). Derivation
//! provenance uses the underscore-prefixed members `_derivedFrom`,
//! `_hiddenFields` and `_derivationType`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use credence_core::{parse_optional_date, Timestamp, TimestampError};

use crate::error::VcError;
use crate::proof::{Proof, ProofPurpose};

/// Marker type every credential must carry.
pub const BASE_CREDENTIAL_TYPE: &str = "VerifiableCredential";

/// `_derivationType` value written by the selective-disclosure deriver.
pub const SELECTIVE_DISCLOSURE_DERIVATION: &str = "SelectiveDisclosure";

/// The default JSON-LD context for credentials and presentations.
pub const W3C_CREDENTIALS_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";

/// A `type` member: a single string or an ordered array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeValue {
    /// Single type string.
    Single(String),
    /// Array of type strings.
    Array(Vec<String>),
}

impl TypeValue {
    /// Build an array-form type list.
    pub fn of(types: &[&str]) -> Self {
        Self::Array(types.iter().map(|t| t.to_string()).collect())
    }

    /// Whether `marker` is one of the types.
    pub fn contains(&self, marker: &str) -> bool {
        match self {
            Self::Single(s) => s == marker,
            Self::Array(arr) => arr.iter().any(|s| s == marker),
        }
    }

    /// The types in declaration order.
    pub fn as_list(&self) -> Vec<&str> {
        match self {
            Self::Single(s) => vec![s.as_str()],
            Self::Array(arr) => arr.iter().map(String::as_str).collect(),
        }
    }
}

/// A verifiable credential, or a derived (reduced-claim) copy of one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(rename = "@context", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub types: Option<TypeValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    #[serde(rename = "issuanceDate", default, skip_serializing_if = "Option::is_none")]
    pub issuance_date: Option<String>,

    /// ISO-8601, or empty for "never expires".
    #[serde(
        rename = "expirationDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration_date: Option<String>,

    /// Claim name to value; the `id` claim identifies the subject.
    #[serde(
        rename = "credentialSubject",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub credential_subject: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,

    #[serde(rename = "_derivedFrom", default, skip_serializing_if = "Option::is_none")]
    pub derived_from: Option<String>,

    #[serde(rename = "_hiddenFields", default, skip_serializing_if = "Option::is_none")]
    pub hidden_fields: Option<Vec<String>>,

    #[serde(
        rename = "_derivationType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub derivation_type: Option<String>,

    /// Members not modelled above (`credentialSchema`, `credentialStatus`, …).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Credential {
    /// Start a credential with the default context, the base type plus
    /// `extra_types`, and the given subject claims.
    pub fn new(id: impl Into<String>, extra_types: &[&str], subject: Map<String, Value>) -> Self {
        let mut types = vec![BASE_CREDENTIAL_TYPE.to_string()];
        types.extend(extra_types.iter().map(|t| t.to_string()));
        Self {
            context: Some(Value::Array(vec![Value::String(
                W3C_CREDENTIALS_CONTEXT.to_string(),
            )])),
            id: Some(id.into()),
            types: Some(TypeValue::Array(types)),
            credential_subject: Some(subject),
            ..Default::default()
        }
    }

    /// Parse a credential from a JSON tree.
    pub fn from_value(value: Value) -> Result<Self, VcError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Serialize to a JSON tree.
    pub fn to_value(&self) -> Result<Value, VcError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Whether `type` includes `marker`.
    pub fn has_type(&self, marker: &str) -> bool {
        self.types.as_ref().is_some_and(|t| t.contains(marker))
    }

    /// The credential id, or `"<unidentified>"` for diagnostics.
    pub fn display_id(&self) -> &str {
        self.id.as_deref().filter(|s| !s.is_empty()).unwrap_or("<unidentified>")
    }

    /// The `credentialSubject.id` claim, if it is a string.
    pub fn subject_id(&self) -> Option<&str> {
        self.credential_subject
            .as_ref()
            .and_then(|s| s.get("id"))
            .and_then(Value::as_str)
    }

    /// Whether this credential carries derivation provenance.
    pub fn is_derived(&self) -> bool {
        self.derived_from.is_some()
    }

    /// Whether this credential claims to be a selective disclosure
    /// derivation: provenance, derivation type and proof purpose all agree.
    /// Every one of these markers is set by whoever holds the document.
    pub fn is_selective_disclosure(&self) -> bool {
        self.derived_from.is_some()
            && self.derivation_type.as_deref() == Some(SELECTIVE_DISCLOSURE_DERIVATION)
            && self
                .proof
                .as_ref()
                .is_some_and(|p| p.has_purpose(ProofPurpose::SelectiveDisclosure))
    }

    /// The id revocation should be checked against besides this credential's
    /// own id: the origin credential for derived copies.
    pub fn origin_id(&self) -> Option<&str> {
        self.derived_from.as_deref()
    }

    /// Parsed `expirationDate`; `None` when absent or empty.
    pub fn expiration(&self) -> Result<Option<Timestamp>, TimestampError> {
        parse_optional_date(self.expiration_date.as_deref())
    }

    /// Parsed `issuanceDate`; `None` when absent or empty.
    pub fn issuance(&self) -> Result<Option<Timestamp>, TimestampError> {
        parse_optional_date(self.issuance_date.as_deref())
    }
}

/// A credential produced by selective disclosure.
///
/// # Invariants
///
/// `_derivedFrom`, `_hiddenFields` and `_derivationType` are always present.
/// The only constructors are the deriver and [`TryFrom<Credential>`], which
/// checks those members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Credential", into = "Credential")]
pub struct DerivedCredential(Credential);

impl DerivedCredential {
    pub(crate) fn new_unchecked(credential: Credential) -> Self {
        Self(credential)
    }

    /// The origin credential id.
    pub fn derived_from(&self) -> &str {
        self.0.derived_from.as_deref().unwrap_or_default()
    }

    /// Claim names removed from the origin, sorted.
    pub fn hidden_fields(&self) -> &[String] {
        self.0.hidden_fields.as_deref().unwrap_or_default()
    }

    /// The derivation marker.
    pub fn derivation_type(&self) -> &str {
        self.0.derivation_type.as_deref().unwrap_or_default()
    }

    /// Borrow the underlying credential.
    pub fn credential(&self) -> &Credential {
        &self.0
    }

    /// Unwrap into a plain credential, e.g. to place it in a presentation.
    pub fn into_credential(self) -> Credential {
        self.0
    }
}

impl TryFrom<Credential> for DerivedCredential {
    type Error = VcError;

    fn try_from(credential: Credential) -> Result<Self, Self::Error> {
        if credential.derived_from.is_none()
            || credential.hidden_fields.is_none()
            || credential.derivation_type.is_none()
        {
            return Err(VcError::NotDerived(credential.display_id().to_string()));
        }
        Ok(Self(credential))
    }
}

impl From<DerivedCredential> for Credential {
    fn from(derived: DerivedCredential) -> Self {
        derived.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "@context": ["https://www.w3.org/2018/credentials/v1"],
            "id": "cred-1",
            "type": ["VerifiableCredential", "UniversityDegreeCredential"],
            "issuer": "did:example:uni",
            "issuanceDate": "2024-01-01T00:00:00Z",
            "expirationDate": "",
            "credentialSubject": {"id": "sub-1", "name": "Ann", "gpa": "18"},
            "credentialSchema": {"id": "https://example.org/schema", "type": "JsonSchema"}
        })
    }

    #[test]
    fn parses_w3c_member_names() {
        let cred = Credential::from_value(sample()).unwrap();
        assert_eq!(cred.id.as_deref(), Some("cred-1"));
        assert!(cred.has_type(BASE_CREDENTIAL_TYPE));
        assert!(cred.has_type("UniversityDegreeCredential"));
        assert_eq!(cred.subject_id(), Some("sub-1"));
        assert!(cred.extra.contains_key("credentialSchema"));
    }

    #[test]
    fn reserialization_preserves_document() {
        let raw = sample();
        let cred = Credential::from_value(raw.clone()).unwrap();
        assert_eq!(cred.to_value().unwrap(), raw);
    }

    #[test]
    fn empty_expiration_means_never() {
        let cred = Credential::from_value(sample()).unwrap();
        assert_eq!(cred.expiration().unwrap(), None);
        assert!(cred.issuance().unwrap().is_some());
    }

    #[test]
    fn single_string_type_is_accepted() {
        let cred = Credential::from_value(json!({"type": "VerifiableCredential"})).unwrap();
        assert!(cred.has_type(BASE_CREDENTIAL_TYPE));
        assert_eq!(cred.types.unwrap().as_list(), vec!["VerifiableCredential"]);
    }

    #[test]
    fn missing_members_still_parse() {
        let cred = Credential::from_value(json!({})).unwrap();
        assert!(cred.id.is_none());
        assert!(!cred.has_type(BASE_CREDENTIAL_TYPE));
        assert_eq!(cred.display_id(), "<unidentified>");
    }

    #[test]
    fn wrongly_typed_member_is_rejected() {
        assert!(Credential::from_value(json!({"issuer": 42})).is_err());
    }

    #[test]
    fn derived_credential_requires_provenance() {
        let plain = Credential::from_value(sample()).unwrap();
        assert!(matches!(
            DerivedCredential::try_from(plain.clone()),
            Err(VcError::NotDerived(id)) if id == "cred-1"
        ));

        let mut derived = plain;
        derived.derived_from = Some("cred-1".to_string());
        derived.hidden_fields = Some(vec!["gpa".to_string()]);
        derived.derivation_type = Some(SELECTIVE_DISCLOSURE_DERIVATION.to_string());
        let derived = DerivedCredential::try_from(derived).unwrap();
        assert_eq!(derived.derived_from(), "cred-1");
        assert_eq!(derived.hidden_fields(), ["gpa".to_string()]);
    }

    #[test]
    fn selective_disclosure_needs_every_marker() {
        let mut cred = Credential::from_value(sample()).unwrap();
        cred.derived_from = Some("cred-0".to_string());
        assert!(cred.is_derived());
        assert!(!cred.is_selective_disclosure());

        cred.derivation_type = Some(SELECTIVE_DISCLOSURE_DERIVATION.to_string());
        assert!(!cred.is_selective_disclosure());

        cred.proof = Some(Proof {
            proof_purpose: Some("assertionMethod".to_string()),
            ..Proof::default()
        });
        assert!(!cred.is_selective_disclosure());

        cred.proof = Some(Proof {
            proof_purpose: Some("selectiveDisclosure".to_string()),
            ..Proof::default()
        });
        assert!(cred.is_selective_disclosure());

        cred.derivation_type = Some("Redaction".to_string());
        assert!(!cred.is_selective_disclosure());
    }

    #[test]
    fn derived_credential_serializes_as_plain_credential() {
        let mut cred = Credential::from_value(sample()).unwrap();
        cred.derived_from = Some("cred-0".to_string());
        cred.hidden_fields = Some(vec![]);
        cred.derivation_type = Some(SELECTIVE_DISCLOSURE_DERIVATION.to_string());
        let derived = DerivedCredential::try_from(cred).unwrap();
        let value = serde_json::to_value(&derived).unwrap();
        assert_eq!(value["_derivedFrom"], "cred-0");
        assert_eq!(value["_derivationType"], "SelectiveDisclosure");
        let back: DerivedCredential = serde_json::from_value(value).unwrap();
        assert_eq!(back, derived);
    }
}
