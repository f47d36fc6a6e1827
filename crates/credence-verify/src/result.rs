//! Verification verdicts.

use serde::{Deserialize, Serialize};

use credence_core::Timestamp;

use crate::error::VerificationError;

/// Prefix of the single error reported for an internal failure.
pub const INTERNAL_ERROR_PREFIX: &str = "verification failed: internal error: ";

/// Per-check outcomes. A check is `true` only once it has run and passed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checks {
    pub structure: bool,
    pub revocation: bool,
    pub challenge: bool,
    pub signature: bool,
    pub credentials: bool,
    pub expiration: bool,
}

impl Checks {
    /// Logical AND of all six checks.
    pub fn all(&self) -> bool {
        self.structure
            && self.revocation
            && self.challenge
            && self.signature
            && self.credentials
            && self.expiration
    }
}

/// The verdict for one presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub verified: bool,
    pub presentation_id: Option<String>,
    pub revoked: bool,
    pub checks: Checks,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub checked_at: Timestamp,
}

impl VerificationResult {
    pub(crate) fn new(presentation_id: Option<String>, checked_at: Timestamp) -> Self {
        Self {
            verified: false,
            presentation_id,
            revoked: false,
            checks: Checks::default(),
            errors: Vec::new(),
            warnings: Vec::new(),
            checked_at,
        }
    }

    /// A failed verdict carrying one internal error.
    pub(crate) fn internal_failure(
        presentation_id: Option<String>,
        checked_at: Timestamp,
        message: &str,
    ) -> Self {
        let mut result = Self::new(presentation_id, checked_at);
        result.errors.push(format!("{INTERNAL_ERROR_PREFIX}{message}"));
        result
    }

    pub(crate) fn error(&mut self, error: VerificationError) {
        tracing::debug!(kind = error.kind(), %error, "verification finding");
        self.errors.push(error.to_string());
    }

    pub(crate) fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub(crate) fn aggregate(&mut self) {
        self.verified = self.checks.all();
    }
}
