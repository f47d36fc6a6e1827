//! # Document Subcommands
//!
//! `issue`, `derive`, `present`, `hash` and `pointers`. Documents are read
//! from JSON files and written as pretty JSON to stdout or `--out`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use credence_vc::{
    did_for_key, Credential, Ed25519Suite, Holder, IntegrityHasher, Issuer, PresentOptions,
    SelectivePointerMap,
};

use crate::keys::load_key_pair;
use crate::{read_json, write_output};

#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Issuer seed file (hex).
    #[arg(long)]
    pub key: PathBuf,
    /// Unsigned credential.
    #[arg(value_name = "FILE")]
    pub credential: PathBuf,
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DeriveArgs {
    /// Credential to derive from.
    #[arg(value_name = "FILE")]
    pub credential: PathBuf,
    /// Field names to remove; repeat or separate with commas.
    #[arg(long, value_delimiter = ',')]
    pub hide: Vec<String>,
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct PresentArgs {
    /// Holder seed file (hex).
    #[arg(long)]
    pub key: PathBuf,
    /// Credentials to embed.
    #[arg(value_name = "FILE", required = true)]
    pub credentials: Vec<PathBuf>,
    #[arg(long)]
    pub id: Option<String>,
    #[arg(long)]
    pub challenge: Option<String>,
    #[arg(long)]
    pub domain: Option<String>,
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct HashArgs {
    /// Credential or presentation.
    #[arg(value_name = "FILE")]
    pub document: PathBuf,
}

#[derive(Args, Debug)]
pub struct PointersArgs {
    /// Disclosure field names.
    #[arg(value_name = "NAME")]
    pub names: Vec<String>,
}

fn load_credential(path: &std::path::Path) -> Result<Credential> {
    Credential::from_value(read_json(path)?)
        .with_context(|| format!("not a credential: {}", path.display()))
}

pub fn run_issue(args: &IssueArgs) -> Result<u8> {
    let key_pair = load_key_pair(&args.key)?;
    let did = did_for_key(&key_pair.public_key());
    let issuer = Issuer::new(Arc::new(Ed25519Suite::new(key_pair)), did);

    let issued = issuer
        .issue(load_credential(&args.credential)?)
        .context("issuance failed")?;
    write_output(&issued, args.out.as_deref())?;
    Ok(0)
}

pub fn run_derive(args: &DeriveArgs) -> Result<u8> {
    let credential = load_credential(&args.credential)?;
    let derived = credence_vc::SelectiveDisclosureDeriver::default()
        .derive(&credential, &args.hide)
        .context("derivation failed")?;
    write_output(&derived, args.out.as_deref())?;
    Ok(0)
}

pub fn run_present(args: &PresentArgs) -> Result<u8> {
    let key_pair = load_key_pair(&args.key)?;
    let did = did_for_key(&key_pair.public_key());
    let holder = Holder::new(Arc::new(Ed25519Suite::new(key_pair)), did);

    let credentials = args
        .credentials
        .iter()
        .map(|path| load_credential(path))
        .collect::<Result<Vec<_>>>()?;
    let presentation = holder
        .present(
            credentials,
            PresentOptions {
                id: args.id.clone(),
                challenge: args.challenge.clone(),
                domain: args.domain.clone(),
                expiration_date: None,
            },
        )
        .context("failed to build presentation")?;
    write_output(&presentation, args.out.as_deref())?;
    Ok(0)
}

pub fn run_hash(args: &HashArgs) -> Result<u8> {
    let value = read_json(&args.document)?;
    let hash = IntegrityHasher::hash_value(&value).context("failed to hash document")?;
    println!("{hash}");
    Ok(0)
}

pub fn run_pointers(args: &PointersArgs) -> Result<u8> {
    for pointer in SelectivePointerMap::default().generate_pointers(&args.names) {
        println!("{pointer}");
    }
    Ok(0)
}
