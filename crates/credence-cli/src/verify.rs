//! # Offline Verification
//!
//! `credence verify` runs the presentation verifier against a local
//! revocation list and prints the report. Exit code 0 means verified, 2
//! means the presentation was rejected.
//!
//! The revocation list is a JSON array whose entries are either bare ids
//! or `{"subjectId", "reason", "revokedBy"}` objects.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;

use credence_registry::{
    InMemoryRevocationRegistry, RegistryRevocationLookup, RevocationRequest, RevocationStore,
};
use credence_vc::Ed25519Suite;
use credence_verify::{PresentationReport, PresentationVerifier, VerificationPipeline, VerifyOptions};

use crate::{read_json, write_output};

/// Exit code for a presentation that did not verify.
pub const EXIT_NOT_VERIFIED: u8 = 2;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Presentation to verify.
    #[arg(value_name = "FILE")]
    pub presentation: PathBuf,
    /// Expected proof challenge.
    #[arg(long)]
    pub challenge: Option<String>,
    /// Expected proof domain.
    #[arg(long)]
    pub domain: Option<String>,
    /// JSON revocation list.
    #[arg(long)]
    pub revoked: Option<PathBuf>,
    /// Write the report here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RevokedEntry {
    Id(String),
    #[serde(rename_all = "camelCase")]
    Record {
        subject_id: String,
        reason: Option<String>,
        revoked_by: Option<String>,
    },
}

impl RevokedEntry {
    fn into_request(self) -> RevocationRequest {
        match self {
            Self::Id(id) => RevocationRequest::new(id),
            Self::Record {
                subject_id,
                reason,
                revoked_by,
            } => {
                let mut request = RevocationRequest::new(subject_id);
                if let Some(reason) = reason {
                    request = request.reason(reason);
                }
                if let Some(revoked_by) = revoked_by {
                    request = request.revoked_by(revoked_by);
                }
                request
            }
        }
    }
}

fn load_registry(path: Option<&std::path::Path>) -> Result<Arc<InMemoryRevocationRegistry>> {
    let registry = Arc::new(InMemoryRevocationRegistry::new());
    let Some(path) = path else {
        return Ok(registry);
    };
    let entries: Vec<RevokedEntry> = serde_json::from_value(read_json(path)?)
        .with_context(|| format!("invalid revocation list: {}", path.display()))?;
    for entry in entries {
        if let Err(e) = registry.revoke(entry.into_request()) {
            tracing::warn!("skipping revocation entry: {e}");
        }
    }
    Ok(registry)
}

/// Verify a presentation file and return the report.
pub fn verify_file(args: &VerifyArgs) -> Result<PresentationReport> {
    let registry = load_registry(args.revoked.as_deref())?;
    let pipeline = VerificationPipeline::new(registry.clone(), Arc::new(Ed25519Suite::verifier()));
    let verifier = PresentationVerifier::new(pipeline, Arc::new(RegistryRevocationLookup::new(registry)));

    let presentation = read_json(&args.presentation)?;
    let options = VerifyOptions {
        expected_challenge: args.challenge.clone(),
        expected_domain: args.domain.clone(),
        now: None,
    };
    Ok(verifier.verify_json(&presentation, &options))
}

pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    let report = verify_file(args)?;
    write_output(&report, args.out.as_deref())?;
    if report.result.verified {
        eprintln!("OK: presentation verified");
        Ok(0)
    } else {
        for error in &report.result.errors {
            eprintln!("FAIL: {error}");
        }
        Ok(EXIT_NOT_VERIFIED)
    }
}
