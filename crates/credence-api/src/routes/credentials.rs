//! # Credential Issuance and Derivation
//!
//! ## Endpoints
//!
//! - `POST /v1/credentials/issue`: sign a credential with the service key.
//! - `POST /v1/credentials/derive`: derive a copy with named claims removed.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use credence_vc::Credential;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, require_object, Validate};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request body for credential issuance.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueCredentialRequest {
    /// Unsigned credential. `issuer`, `id` and `issuanceDate` are filled
    /// in when absent.
    #[schema(value_type = Object)]
    pub credential: Value,
}

impl Validate for IssueCredentialRequest {
    fn validate(&self) -> Result<(), String> {
        require_object(&self.credential, "credential")
    }
}

/// A signed or derived credential.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialResponse {
    #[schema(value_type = Object)]
    pub credential: Value,
}

/// Request body for selective-disclosure derivation.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeriveCredentialRequest {
    #[schema(value_type = Object)]
    pub credential: Value,
    /// Disclosure vocabulary names of the claims to remove.
    #[serde(default)]
    pub hide: Vec<String>,
}

impl Validate for DeriveCredentialRequest {
    fn validate(&self) -> Result<(), String> {
        require_object(&self.credential, "credential")
    }
}

/// Derived credential plus its derivation metadata.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DerivedCredentialResponse {
    #[schema(value_type = Object)]
    pub credential: Value,
    pub derived_from: String,
    pub hidden_fields: Vec<String>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/credentials/issue", post(issue_credential))
        .route("/v1/credentials/derive", post(derive_credential))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn parse_credential(value: Value) -> Result<Credential, AppError> {
    Credential::from_value(value).map_err(|e| AppError::BadRequest(format!("invalid credential: {e}")))
}

/// POST /v1/credentials/issue: Issue a credential.
///
/// Embeds the integrity hash and signs the credential for
/// `assertionMethod` with the service key. The credential must carry a
/// `credentialSubject` and the `VerifiableCredential` type.
#[utoipa::path(
    post,
    path = "/v1/credentials/issue",
    request_body = IssueCredentialRequest,
    responses(
        (status = 200, description = "Signed credential", body = CredentialResponse),
        (status = 400, description = "Malformed credential", body = crate::error::ErrorBody),
        (status = 422, description = "Credential cannot be issued", body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
async fn issue_credential(
    State(state): State<AppState>,
    body: Result<Json<IssueCredentialRequest>, JsonRejection>,
) -> Result<Json<CredentialResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let credential = parse_credential(req.credential)?;
    let issued = state.issuer.issue(credential)?;
    Ok(Json(CredentialResponse {
        credential: issued.to_value()?,
    }))
}

/// POST /v1/credentials/derive: Derive a selective-disclosure copy.
///
/// Unknown names in `hide` are ignored. The result is not independently
/// signed; verifiers accept it with a warning.
#[utoipa::path(
    post,
    path = "/v1/credentials/derive",
    request_body = DeriveCredentialRequest,
    responses(
        (status = 200, description = "Derived credential", body = DerivedCredentialResponse),
        (status = 400, description = "Malformed credential", body = crate::error::ErrorBody),
        (status = 422, description = "Credential cannot be derived", body = crate::error::ErrorBody),
    ),
    tag = "credentials"
)]
async fn derive_credential(
    State(state): State<AppState>,
    body: Result<Json<DeriveCredentialRequest>, JsonRejection>,
) -> Result<Json<DerivedCredentialResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let credential = parse_credential(req.credential)?;
    let derived = state.holder.derive(&credential, &req.hide)?;
    Ok(Json(DerivedCredentialResponse {
        derived_from: derived.derived_from().to_string(),
        hidden_fields: derived.hidden_fields().to_vec(),
        credential: derived.credential().to_value()?,
    }))
}
