//! # credence-verify: Presentation Verification
//!
//! - [`VerificationPipeline`]: the ordered check sequence producing a
//!   [`VerificationResult`]. Never raises.
//! - [`PresentationVerifier`]: the pipeline plus fail-closed per-credential
//!   revocation policy, disclosure analysis, and the append-only
//!   [`VerificationHistory`].
//! - [`VerificationError`]: the finding taxonomy rendered into
//!   `VerificationResult::errors`.

pub mod config;
pub mod disclosure;
pub mod error;
pub mod history;
pub mod pipeline;
pub mod policy;
pub mod result;

pub use config::{
    PipelineConfig, PipelineConfigError, VerifyOptions, DEFAULT_EXPIRY_WARNING_DAYS, DEFAULT_PROOF_SKEW_SECS,
};
pub use disclosure::{analyze_disclosure, CredentialDisclosure, DisclosureReport, PrivacyLevel};
pub use error::{InternalError, VerificationError};
pub use history::VerificationHistory;
pub use pipeline::VerificationPipeline;
pub use policy::{
    PolicyFailure, PresentationReport, PresentationVerifier, RevokedCredential, UndeterminedRevocation,
};
pub use result::{Checks, VerificationResult, INTERNAL_ERROR_PREFIX};
