//! # Presentations
//!
//! ## Endpoints
//!
//! - `POST /v1/presentations`: wrap credentials into a presentation signed
//!   by the service key.
//! - `POST /v1/presentations/verify`: run the presentation verifier. The
//!   response is always 200; the verdict is in the report.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use credence_vc::{Credential, PresentOptions};
use credence_verify::{PresentationReport, VerifyOptions};

use crate::error::AppError;
use crate::extractors::{extract_json, extract_validated_json, require_object, Validate};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePresentationRequest {
    /// Credentials to embed, signed or derived.
    #[schema(value_type = Vec<Object>)]
    pub credentials: Vec<Value>,
    /// Presentation id; a fresh `urn:uuid:` when absent.
    pub id: Option<String>,
    /// Verifier-supplied nonce to bind into the proof.
    pub challenge: Option<String>,
    pub domain: Option<String>,
    pub expiration_date: Option<String>,
}

impl Validate for CreatePresentationRequest {
    fn validate(&self) -> Result<(), String> {
        if self.credentials.is_empty() {
            return Err("credentials must not be empty".to_string());
        }
        self.credentials
            .iter()
            .try_for_each(|c| require_object(c, "each credential"))
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PresentationResponse {
    #[schema(value_type = Object)]
    pub presentation: Value,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPresentationRequest {
    /// The presentation to verify. Absent or malformed input fails the
    /// structure check rather than the request.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub presentation: Value,
    /// Expected proof challenge.
    pub challenge: Option<String>,
    /// Expected proof domain.
    pub domain: Option<String>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/presentations", post(create_presentation))
        .route("/v1/presentations/verify", post(verify_presentation))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/presentations: Build and sign a presentation.
#[utoipa::path(
    post,
    path = "/v1/presentations",
    request_body = CreatePresentationRequest,
    responses(
        (status = 201, description = "Signed presentation", body = PresentationResponse),
        (status = 400, description = "Malformed credential", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid request", body = crate::error::ErrorBody),
    ),
    tag = "presentations"
)]
async fn create_presentation(
    State(state): State<AppState>,
    body: Result<Json<CreatePresentationRequest>, JsonRejection>,
) -> Result<(axum::http::StatusCode, Json<PresentationResponse>), AppError> {
    let req = extract_validated_json(body)?;
    let credentials = req
        .credentials
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            Credential::from_value(value)
                .map_err(|e| AppError::BadRequest(format!("credentials[{i}] is invalid: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let presentation = state.holder.present(
        credentials,
        PresentOptions {
            id: req.id,
            challenge: req.challenge,
            domain: req.domain,
            expiration_date: req.expiration_date,
        },
    )?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(PresentationResponse {
            presentation: presentation.to_value()?,
        }),
    ))
}

/// POST /v1/presentations/verify: Verify a presentation.
///
/// Runs the verification pipeline and the revocation policy, attaches the
/// disclosure analysis and records the report in the history.
#[utoipa::path(
    post,
    path = "/v1/presentations/verify",
    request_body = VerifyPresentationRequest,
    responses(
        (status = 200, description = "Verification report", body = serde_json::Value),
        (status = 400, description = "Request body is not JSON", body = crate::error::ErrorBody),
    ),
    tag = "presentations"
)]
async fn verify_presentation(
    State(state): State<AppState>,
    body: Result<Json<VerifyPresentationRequest>, JsonRejection>,
) -> Result<Json<PresentationReport>, AppError> {
    let req = extract_json(body)?;
    let options = VerifyOptions {
        expected_challenge: req.challenge,
        expected_domain: req.domain,
        now: None,
    };
    let verifier = state.verifier.clone();
    let presentation = req.presentation;
    let report = tokio::task::spawn_blocking(move || verifier.verify_json(&presentation, &options))
        .await
        .map_err(|e| AppError::Internal(format!("verification task failed: {e}")))?;
    Ok(Json(report))
}
