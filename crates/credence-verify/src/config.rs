//! Pipeline configuration and per-call options.

use chrono::Duration;
use thiserror::Error;

use credence_core::Timestamp;

/// Default proof creation skew: one hour either way.
pub const DEFAULT_PROOF_SKEW_SECS: i64 = 3600;

/// Default window in which an upcoming expiration is warned about.
pub const DEFAULT_EXPIRY_WARNING_DAYS: i64 = 30;

/// Deployment-wide pipeline settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Maximum distance between `proof.created` and the verification time.
    pub proof_skew: Duration,
    /// Credentials expiring within this window produce a warning.
    pub expiry_warning: Duration,
}

/// A window that is negative or does not fit a `chrono::Duration`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineConfigError {
    #[error("proof skew of {0} seconds is out of range")]
    ProofSkew(i64),
    #[error("expiry warning window of {0} days is out of range")]
    ExpiryWarning(i64),
}

impl PipelineConfig {
    pub fn with_proof_skew_secs(mut self, secs: i64) -> Result<Self, PipelineConfigError> {
        self.proof_skew = Duration::try_seconds(secs)
            .filter(|_| secs >= 0)
            .ok_or(PipelineConfigError::ProofSkew(secs))?;
        Ok(self)
    }

    pub fn with_expiry_warning_days(mut self, days: i64) -> Result<Self, PipelineConfigError> {
        self.expiry_warning = Duration::try_days(days)
            .filter(|_| days >= 0)
            .ok_or(PipelineConfigError::ExpiryWarning(days))?;
        Ok(self)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            proof_skew: Duration::seconds(DEFAULT_PROOF_SKEW_SECS),
            expiry_warning: Duration::days(DEFAULT_EXPIRY_WARNING_DAYS),
        }
    }
}

/// Verifier expectations for a single call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Challenge the verifier issued; compared exactly.
    pub expected_challenge: Option<String>,
    /// Domain the presentation must be bound to.
    pub expected_domain: Option<String>,
    /// Verification time; the wall clock when `None`.
    pub now: Option<Timestamp>,
}

impl VerifyOptions {
    pub fn with_challenge(mut self, challenge: impl Into<String>) -> Self {
        self.expected_challenge = Some(challenge.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.expected_domain = Some(domain.into());
        self
    }

    pub fn at(mut self, now: Timestamp) -> Self {
        self.now = Some(now);
        self
    }
}
