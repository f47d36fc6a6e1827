//! # Bearer Token Authentication
//!
//! A single static token, configured through `AUTH_TOKEN`, guards every
//! `/v1` route and the OpenAPI document. When no token is configured the
//! middleware lets every request through.
//!
//! Tokens are compared in constant time with `subtle`, and the configured
//! secret is zeroized on drop.

use axum::extract::Request;
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::error::AppError;

/// A bearer secret that never prints and is wiped from memory on drop.
#[derive(Clone)]
pub struct SecretToken(Zeroizing<String>);

impl SecretToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Zeroizing::new(token.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretToken([REDACTED])")
    }
}

/// Authentication settings injected as a request extension.
#[derive(Clone, Debug, Default)]
pub struct AuthConfig {
    /// `None` disables authentication.
    pub token: Option<SecretToken>,
}

fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        // Keep timing independent of where the lengths differ.
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Reject requests without the configured bearer token.
pub async fn auth_middleware(request: Request, next: Next) -> Response {
    let expected = request
        .extensions()
        .get::<AuthConfig>()
        .and_then(|config| config.token.clone());
    let Some(expected) = expected else {
        return next.run(request).await;
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let failure = match auth_header {
        Some(value) => match value.strip_prefix("Bearer ") {
            Some(provided) if constant_time_token_eq(provided, expected.expose()) => None,
            Some(_) => Some("invalid bearer token"),
            None => Some("authorization header must use Bearer scheme"),
        },
        None => Some("missing authorization header"),
    };
    let Some(failure) = failure else {
        return next.run(request).await;
    };
    tracing::warn!(reason = failure, "authentication failed");
    AppError::Unauthorized(failure.to_string()).into_response()
}
