//! # Key Management
//!
//! `credence keygen` writes `<prefix>.key` (hex seed) and `<prefix>.pub`
//! (hex public key). Other subcommands load the seed file with
//! [`load_key_pair`].

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use zeroize::Zeroizing;

use credence_crypto::Ed25519KeyPair;
use credence_vc::{did_for_key, verification_method_for_key};

#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Output directory for the key files.
    #[arg(long, short, default_value = ".")]
    pub output: PathBuf,
    /// File name prefix.
    #[arg(long, default_value = "credence")]
    pub prefix: String,
}

pub fn run_keygen(args: &KeygenArgs) -> Result<u8> {
    std::fs::create_dir_all(&args.output).with_context(|| {
        format!("failed to create output directory: {}", args.output.display())
    })?;

    let key_pair = Ed25519KeyPair::generate();
    let public_key = key_pair.public_key();

    let key_path = args.output.join(format!("{}.key", args.prefix));
    let pub_path = args.output.join(format!("{}.pub", args.prefix));
    if key_path.exists() {
        bail!("refusing to overwrite existing key: {}", key_path.display());
    }

    std::fs::write(&key_path, key_pair.seed_hex().as_bytes())
        .with_context(|| format!("failed to write private key: {}", key_path.display()))?;
    std::fs::write(&pub_path, public_key.to_hex())
        .with_context(|| format!("failed to write public key: {}", pub_path.display()))?;

    println!("OK: generated Ed25519 keypair");
    println!("  Private key: {}", key_path.display());
    println!("  Public key:  {}", pub_path.display());
    println!("  DID:         {}", did_for_key(&public_key));
    println!("  Method:      {}", verification_method_for_key(&public_key));
    Ok(0)
}

/// Load a key pair from a hex seed file.
pub fn load_key_pair(path: &Path) -> Result<Ed25519KeyPair> {
    let seed = Zeroizing::new(
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read private key: {}", path.display()))?,
    );
    Ed25519KeyPair::from_seed_hex(seed.trim())
        .map_err(|e| anyhow::anyhow!("invalid private key {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keygen_writes_loadable_key() {
        let dir = tempfile::tempdir().unwrap();
        let args = KeygenArgs {
            output: dir.path().to_path_buf(),
            prefix: "test".to_string(),
        };
        assert_eq!(run_keygen(&args).unwrap(), 0);

        let key = std::fs::read_to_string(dir.path().join("test.key")).unwrap();
        let public = std::fs::read_to_string(dir.path().join("test.pub")).unwrap();
        assert_eq!(key.len(), 64);
        assert_eq!(public.len(), 64);

        let loaded = load_key_pair(&dir.path().join("test.key")).unwrap();
        assert_eq!(loaded.public_key().to_hex(), public);
    }

    #[test]
    fn keygen_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let args = KeygenArgs {
            output: dir.path().to_path_buf(),
            prefix: "test".to_string(),
        };
        run_keygen(&args).unwrap();
        assert!(run_keygen(&args).is_err());
    }

    #[test]
    fn load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.key");
        std::fs::write(&path, "not-hex").unwrap();
        assert!(load_key_pair(&path).is_err());
    }
}
