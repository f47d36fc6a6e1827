//! # credence-api: HTTP Service
//!
//! Axum service exposing issuance, selective disclosure, presentation
//! verification, the revocation registry and the verification history.
//!
//! ## Route Map
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | POST | `/v1/credentials/issue` | Sign a credential with the service key |
//! | POST | `/v1/credentials/derive` | Selective-disclosure derivation |
//! | POST | `/v1/disclosure/pointers` | Field names to JSON pointers |
//! | GET | `/v1/disclosure/vocabulary` | The disclosure vocabulary |
//! | POST | `/v1/presentations` | Build and sign a presentation |
//! | POST | `/v1/presentations/verify` | Verify a presentation |
//! | POST, GET | `/v1/revocations` | Revoke, list revocations |
//! | GET | `/v1/revocations/:id` | Revocation status |
//! | GET | `/v1/verifications`, `/v1/verifications/:id` | Verification history |
//! | GET | `/openapi.json` | OpenAPI document |
//! | GET | `/health/liveness`, `/health/readiness` | Probes, no auth |
//!
//! Everything except the health probes sits behind the bearer token
//! middleware in [`auth`].

pub mod auth;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::middleware::from_fn;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::state::AppState;

/// Assemble the application router.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };

    let api = Router::new()
        .merge(routes::credentials::router())
        .merge(routes::disclosure::router())
        .merge(routes::presentations::router())
        .merge(routes::revocations::router())
        .merge(routes::verifications::router())
        .merge(openapi::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config))
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

async fn liveness() -> &'static str {
    "ok"
}

async fn readiness() -> &'static str {
    "ready"
}
