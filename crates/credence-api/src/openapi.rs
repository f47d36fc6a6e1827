//! # OpenAPI Document
//!
//! Assembles the utoipa-annotated routes into one OpenAPI document served
//! at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "credence",
        version = "0.1.0",
        description = "Verifiable credential issuance, selective disclosure, presentation verification and revocation.",
        license(name = "Apache-2.0")
    ),
    paths(
        crate::routes::credentials::issue_credential,
        crate::routes::credentials::derive_credential,
        crate::routes::disclosure::generate_pointers,
        crate::routes::disclosure::vocabulary,
        crate::routes::presentations::create_presentation,
        crate::routes::presentations::verify_presentation,
        crate::routes::revocations::revoke,
        crate::routes::revocations::list_revocations,
        crate::routes::revocations::revocation_status,
        crate::routes::verifications::list_verifications,
        crate::routes::verifications::get_verification,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::credentials::IssueCredentialRequest,
        crate::routes::credentials::CredentialResponse,
        crate::routes::credentials::DeriveCredentialRequest,
        crate::routes::credentials::DerivedCredentialResponse,
        crate::routes::disclosure::PointersRequest,
        crate::routes::disclosure::PointersResponse,
        crate::routes::disclosure::VocabularyEntry,
        crate::routes::presentations::CreatePresentationRequest,
        crate::routes::presentations::PresentationResponse,
        crate::routes::presentations::VerifyPresentationRequest,
        crate::routes::revocations::RevokeRequest,
    )),
    tags(
        (name = "credentials", description = "Issuance and selective-disclosure derivation"),
        (name = "disclosure", description = "Disclosure vocabulary"),
        (name = "presentations", description = "Presentation building and verification"),
        (name = "revocations", description = "Revocation registry"),
        (name = "verifications", description = "Verification history"),
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
