//! # credence-cli: the `credence` Command-Line Tool
//!
//! ## Subcommands
//!
//! - `credence keygen`: Ed25519 key pair plus its `did:credence:` identifier.
//! - `credence issue`: sign a credential.
//! - `credence derive`: selective-disclosure derivation.
//! - `credence present`: wrap credentials into a signed presentation.
//! - `credence verify`: offline verification against a revocation list.
//! - `credence hash`: the integrity hash of a document.
//! - `credence pointers`: disclosure field names to JSON pointers.
//!
//! Every handler returns the process exit code: 0 on success, 2 when a
//! presentation does not verify. Errors map to 1 in `main`.

pub mod document;
pub mod keys;
pub mod verify;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

/// Read and parse a JSON file.
pub fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse JSON: {}", path.display()))
}

/// Pretty-print `value` to `out`, or to stdout when `out` is `None`.
pub fn write_output<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    match out {
        Some(path) => std::fs::write(path, rendered + "\n")
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{rendered}");
            Ok(())
        }
    }
}
