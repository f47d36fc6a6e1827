//! # Verification History
//!
//! Read-only access to the reports recorded by
//! `POST /v1/presentations/verify`.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use credence_verify::PresentationReport;

use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/verifications", get(list_verifications))
        .route("/v1/verifications/:id", get(get_verification))
}

/// GET /v1/verifications: All reports in the order they were recorded.
#[utoipa::path(
    get,
    path = "/v1/verifications",
    responses(
        (status = 200, description = "Verification reports", body = serde_json::Value),
    ),
    tag = "verifications"
)]
async fn list_verifications(State(state): State<AppState>) -> Json<Vec<PresentationReport>> {
    Json(state.verifier.history().list())
}

/// GET /v1/verifications/:id: One report.
#[utoipa::path(
    get,
    path = "/v1/verifications/{id}",
    params(("id" = Uuid, Path, description = "Report id")),
    responses(
        (status = 200, description = "Verification report", body = serde_json::Value),
        (status = 404, description = "No report with this id", body = crate::error::ErrorBody),
    ),
    tag = "verifications"
)]
async fn get_verification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PresentationReport>, AppError> {
    state
        .verifier
        .history()
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("verification {id} not found")))
}
