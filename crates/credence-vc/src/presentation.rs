//! # Verifiable Presentation
//!
//! A holder-assembled bundle of credentials with an authentication proof.
//! As with [`Credential`], members the verifier requires are `Option` so a
//! malformed presentation still parses and can be reported on.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use credence_core::{parse_optional_date, Timestamp, TimestampError};

use crate::credential::{Credential, TypeValue, W3C_CREDENTIALS_CONTEXT};
use crate::error::VcError;
use crate::proof::Proof;

/// Marker type every presentation must carry.
pub const PRESENTATION_TYPE: &str = "VerifiablePresentation";

/// A verifiable presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    #[serde(rename = "@context", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub types: Option<TypeValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder: Option<String>,

    #[serde(
        rename = "verifiableCredential",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub verifiable_credential: Option<Vec<Credential>>,

    #[serde(
        rename = "expirationDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Presentation {
    /// An unsigned presentation of `credentials` by `holder`.
    pub fn new(id: impl Into<String>, holder: impl Into<String>, credentials: Vec<Credential>) -> Self {
        Self {
            context: Some(Value::Array(vec![Value::String(
                W3C_CREDENTIALS_CONTEXT.to_string(),
            )])),
            id: Some(id.into()),
            types: Some(TypeValue::of(&[PRESENTATION_TYPE])),
            holder: Some(holder.into()),
            verifiable_credential: Some(credentials),
            ..Default::default()
        }
    }

    pub fn from_value(value: Value) -> Result<Self, VcError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_value(&self) -> Result<Value, VcError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Whether `type` includes `marker`.
    pub fn has_type(&self, marker: &str) -> bool {
        self.types.as_ref().is_some_and(|t| t.contains(marker))
    }

    /// The embedded credentials, empty when the member is absent.
    pub fn credentials(&self) -> &[Credential] {
        self.verifiable_credential.as_deref().unwrap_or_default()
    }

    /// The presentation id, or `"<unidentified>"` for diagnostics.
    pub fn display_id(&self) -> &str {
        self.id.as_deref().filter(|s| !s.is_empty()).unwrap_or("<unidentified>")
    }

    /// Parsed `expirationDate`; `None` when absent or empty.
    pub fn expiration(&self) -> Result<Option<Timestamp>, TimestampError> {
        parse_optional_date(self.expiration_date.as_deref())
    }
}
