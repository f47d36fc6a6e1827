//! # Revocation Registry
//!
//! ## Endpoints
//!
//! - `POST /v1/revocations`: revoke a credential or presentation id. A
//!   second revocation of the same id is a 409 carrying the original record.
//! - `GET /v1/revocations`: all records, oldest first.
//! - `GET /v1/revocations/:id`: status of one id.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use credence_registry::{RevocationRecord, RevocationRequest, RevocationStatus, RevocationStore};

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevokeRequest {
    pub subject_id: String,
    /// Defaults to "unspecified".
    pub reason: Option<String>,
    /// Defaults to "unknown".
    pub revoked_by: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub metadata: Map<String, Value>,
}

impl Validate for RevokeRequest {
    fn validate(&self) -> Result<(), String> {
        if self.subject_id.trim().is_empty() {
            return Err("subjectId must not be empty".to_string());
        }
        Ok(())
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/revocations", post(revoke).get(list_revocations))
        .route("/v1/revocations/:id", get(revocation_status))
}

/// POST /v1/revocations: Revoke an id.
#[utoipa::path(
    post,
    path = "/v1/revocations",
    request_body = RevokeRequest,
    responses(
        (status = 201, description = "Revocation recorded", body = serde_json::Value),
        (status = 409, description = "Already revoked; details carry the original record",
            body = crate::error::ErrorBody),
        (status = 422, description = "Empty subject id", body = crate::error::ErrorBody),
    ),
    tag = "revocations"
)]
async fn revoke(
    State(state): State<AppState>,
    body: Result<Json<RevokeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RevocationRecord>), AppError> {
    let req = extract_validated_json(body)?;
    let mut request = RevocationRequest::new(req.subject_id).metadata(req.metadata);
    if let Some(reason) = req.reason {
        request = request.reason(reason);
    }
    if let Some(revoked_by) = req.revoked_by {
        request = request.revoked_by(revoked_by);
    }
    let record = state.registry.revoke(request)?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /v1/revocations: List revocation records.
#[utoipa::path(
    get,
    path = "/v1/revocations",
    responses(
        (status = 200, description = "Revocation records, oldest first", body = serde_json::Value),
    ),
    tag = "revocations"
)]
async fn list_revocations(State(state): State<AppState>) -> Json<Vec<RevocationRecord>> {
    Json(state.registry.list_revoked())
}

/// GET /v1/revocations/:id: Revocation status of one id.
///
/// Ids never revoked report `revoked: false`; this is not a 404.
#[utoipa::path(
    get,
    path = "/v1/revocations/{id}",
    params(("id" = String, Path, description = "Credential or presentation id")),
    responses(
        (status = 200, description = "Revocation status", body = serde_json::Value),
    ),
    tag = "revocations"
)]
async fn revocation_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<RevocationStatus> {
    Json(state.registry.status_of(&id))
}
