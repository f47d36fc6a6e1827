//! # Disclosure Vocabulary
//!
//! `POST /v1/disclosure/pointers` resolves field names to the JSON
//! pointers used during selective-disclosure derivation.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PointersRequest {
    pub fields: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PointersResponse {
    /// Pointers for the known names, in request order.
    pub pointers: Vec<String>,
    /// Requested names outside the vocabulary.
    pub unknown_fields: Vec<String>,
}

/// One vocabulary entry.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VocabularyEntry {
    pub name: String,
    pub pointer: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/disclosure/pointers", post(generate_pointers))
        .route("/v1/disclosure/vocabulary", get(vocabulary))
}

/// POST /v1/disclosure/pointers: Map field names to JSON pointers.
#[utoipa::path(
    post,
    path = "/v1/disclosure/pointers",
    request_body = PointersRequest,
    responses(
        (status = 200, description = "Resolved pointers", body = PointersResponse),
        (status = 400, description = "Malformed request", body = crate::error::ErrorBody),
    ),
    tag = "disclosure"
)]
async fn generate_pointers(
    State(state): State<AppState>,
    body: Result<Json<PointersRequest>, JsonRejection>,
) -> Result<Json<PointersResponse>, AppError> {
    let req = extract_json(body)?;
    let unknown_fields = req
        .fields
        .iter()
        .filter(|name| state.pointers.pointer(name).is_none())
        .cloned()
        .collect();
    Ok(Json(PointersResponse {
        pointers: state.pointers.generate_pointers(&req.fields),
        unknown_fields,
    }))
}

/// GET /v1/disclosure/vocabulary: The configured name to pointer table.
#[utoipa::path(
    get,
    path = "/v1/disclosure/vocabulary",
    responses(
        (status = 200, description = "Vocabulary entries", body = [VocabularyEntry]),
    ),
    tag = "disclosure"
)]
async fn vocabulary(State(state): State<AppState>) -> Json<Vec<VocabularyEntry>> {
    Json(
        state
            .pointers
            .entries()
            .map(|(name, pointer)| VocabularyEntry {
                name: name.to_string(),
                pointer: pointer.to_string(),
            })
            .collect(),
    )
}
