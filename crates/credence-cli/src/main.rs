//! # credence CLI entry point
//!
//! Parses arguments with clap derive and dispatches to the subcommand
//! handlers in the library crate.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use credence_cli::document::{
    run_derive, run_hash, run_issue, run_pointers, run_present, DeriveArgs, HashArgs, IssueArgs,
    PointersArgs, PresentArgs,
};
use credence_cli::keys::{run_keygen, KeygenArgs};
use credence_cli::verify::{run_verify, VerifyArgs};

/// Verifiable credentials from the command line.
#[derive(Parser, Debug)]
#[command(name = "credence", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate an Ed25519 key pair.
    Keygen(KeygenArgs),
    /// Sign a credential.
    Issue(IssueArgs),
    /// Derive a credential with claims removed.
    Derive(DeriveArgs),
    /// Build and sign a presentation.
    Present(PresentArgs),
    /// Verify a presentation; exits 2 when it does not verify.
    Verify(VerifyArgs),
    /// Print the integrity hash of a document.
    Hash(HashArgs),
    /// Print the JSON pointers for disclosure field names.
    Pointers(PointersArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Keygen(args) => run_keygen(args),
        Commands::Issue(args) => run_issue(args),
        Commands::Derive(args) => run_derive(args),
        Commands::Present(args) => run_present(args),
        Commands::Verify(args) => run_verify(args),
        Commands::Hash(args) => run_hash(args),
        Commands::Pointers(args) => run_pointers(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
