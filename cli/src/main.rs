// Copyright (c) 2026 certchain contributors. MIT License.
// See LICENSE for details.

//! # certchain
//!
//! Entry point for the `certchain` binary. Parses CLI arguments,
//! initializes logging, opens the ledger, and runs one command against it.
//!
//! Exit codes keep the three verification outcomes apart:
//!
//! - `0`: success (fingerprint verified, chain intact, block issued)
//! - `1`: fingerprint not recorded
//! - `2`: ledger failed validation
//! - `3`: ledger unreadable, corrupt, or not writable; also a missing
//!   ledger for `verify`, `explore` and `validate`, which never create one
//! - `4`: any other failure, including usage errors (e.g. an unreadable
//!   certificate record or a missing argument)

mod cli;
mod logging;

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use certchain_ledger::config::{HASH_FUNCTION, LEDGER_VERSION};
use certchain_ledger::hash::is_hex_digest;
use certchain_ledger::{Block, Chain, ExtractedCertificate, LedgerError, Verification};

use cli::{CertchainCli, Commands, ExploreArgs, PayloadArgs};

const EXIT_NOT_FOUND: u8 = 1;
const EXIT_CHAIN_BROKEN: u8 = 2;
const EXIT_STORAGE: u8 = 3;
const EXIT_FAILURE: u8 = 4;

fn main() -> ExitCode {
    // clap's own `exit` uses 2 for usage errors, which is our chain-broken code.
    let cli = match CertchainCli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(EXIT_FAILURE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    logging::init_logging(&cli.log_level, cli.log_format.into());

    match run(cli) {
        Ok(code) => code,
        Err(err) => match err.downcast_ref::<LedgerError>() {
            Some(ledger_err) => {
                let kind = if ledger_err.is_unavailable() {
                    "ledger unavailable"
                } else {
                    "ledger unusable"
                };
                eprintln!("error: {kind}: {err:#}");
                ExitCode::from(EXIT_STORAGE)
            }
            None => {
                eprintln!("error: {err:#}");
                ExitCode::from(EXIT_FAILURE)
            }
        },
    }
}

fn run(cli: CertchainCli) -> Result<ExitCode> {
    match cli.command {
        Commands::Version => {
            print_version();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Init => init_ledger(&cli.ledger),
        Commands::Issue(args) => issue(&cli.ledger, &args),
        Commands::Verify(args) => verify(&cli.ledger, &args),
        Commands::Explore(args) => explore(&cli.ledger, &args),
        Commands::Validate => validate(&cli.ledger),
    }
}

// `LedgerError` stays the root cause in both openers so `main` can pick the exit code.

/// Opens the ledger, creating it if absent. For commands that write.
fn open_chain(path: &Path) -> Result<Chain> {
    tracing::debug!(path = %path.display(), "opening ledger");
    Chain::open(path).with_context(|| format!("failed to open ledger {}", path.display()))
}

/// Loads an existing ledger. For read-only commands.
fn load_chain(path: &Path) -> Result<Chain> {
    tracing::debug!(path = %path.display(), "loading ledger");
    Chain::load(path).with_context(|| format!("failed to load ledger {}", path.display()))
}

/// Opens (or creates) the ledger and prints a summary.
fn init_ledger(path: &Path) -> Result<ExitCode> {
    let chain = open_chain(path)?;

    println!("Ledger ready.");
    println!("  Path         : {}", chain.path().display());
    println!("  Blocks       : {}", chain.len());
    println!("  Genesis hash : {}", chain.genesis().hash());
    println!("  Tip hash     : {}", chain.latest().hash());

    Ok(ExitCode::SUCCESS)
}

/// Appends a fingerprint as a new block.
fn issue(path: &Path, args: &PayloadArgs) -> Result<ExitCode> {
    let payload = resolve_payload(args)?;
    let mut chain = open_chain(path)?;

    if let Some(existing) = chain.search(&payload) {
        tracing::warn!(
            index = existing.index(),
            "fingerprint already recorded; appending another block"
        );
    }

    let block = chain
        .append(payload)
        .with_context(|| format!("failed to append to ledger {}", path.display()))?;

    println!("Certificate added to ledger.");
    println!("  Block        : #{}", block.index());
    println!("  Fingerprint  : {}", block.data());
    println!("  Block hash   : {}", block.hash());

    Ok(ExitCode::SUCCESS)
}

/// Validates the ledger and looks a fingerprint up in it.
fn verify(path: &Path, args: &PayloadArgs) -> Result<ExitCode> {
    let payload = resolve_payload(args)?;
    let chain = load_chain(path)?;

    match chain.verify(&payload) {
        Verification::Verified(block) => {
            println!("Certificate verified: found in block #{}.", block.index());
            println!("  Recorded at  : {}", block.timestamp());
            println!("  Block hash   : {}", block.hash());
            Ok(ExitCode::SUCCESS)
        }
        Verification::NotFound => {
            println!("Certificate not found in ledger.");
            Ok(ExitCode::from(EXIT_NOT_FOUND))
        }
        Verification::ChainBroken(report) => {
            println!("Ledger integrity check failed; verification refused.");
            println!("  {report}");
            Ok(ExitCode::from(EXIT_CHAIN_BROKEN))
        }
    }
}

/// Prints every block, genesis first.
fn explore(path: &Path, args: &ExploreArgs) -> Result<ExitCode> {
    let chain = load_chain(path)?;

    if args.json {
        let json = serde_json::to_string_pretty(&chain.to_records())
            .context("failed to encode ledger")?;
        println!("{json}");
        return Ok(ExitCode::SUCCESS);
    }

    if chain.len() <= 1 {
        println!("Ledger holds only the genesis block. Issue a certificate to add more.");
    }
    for block in chain.blocks() {
        print_block(block);
    }

    Ok(ExitCode::SUCCESS)
}

/// Recomputes every hash and link.
fn validate(path: &Path) -> Result<ExitCode> {
    let chain = load_chain(path)?;
    let report = chain.validate();

    if report.is_valid() {
        println!("{report}");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("Ledger integrity check failed.");
        println!("  {report}");
        Ok(ExitCode::from(EXIT_CHAIN_BROKEN))
    }
}

fn print_block(block: &Block) {
    let label = if block.is_genesis() { " (genesis)" } else { "" };
    println!("Block #{}{} - {}", block.index(), label, block.timestamp());
    println!("  Previous hash : {}", block.previous_hash());
    println!("  Data          : {}", block.data());
    println!("  Block hash    : {}", block.hash());
}

// ---------------------------------------------------------------------------
// Payload resolution
// ---------------------------------------------------------------------------

fn resolve_payload(args: &PayloadArgs) -> Result<String> {
    if let Some(fingerprint) = &args.fingerprint {
        if !is_hex_digest(fingerprint) {
            tracing::warn!(
                fingerprint = %fingerprint,
                "fingerprint is not a lower-case SHA-256 hex digest; using it verbatim"
            );
        }
        return Ok(fingerprint.clone());
    }

    let path = args
        .record
        .as_deref()
        .context("either a fingerprint or --record is required")?;
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read certificate record {}", path.display()))?;
    let extracted: ExtractedCertificate = serde_json::from_slice(&bytes)
        .with_context(|| format!("invalid certificate record {}", path.display()))?;

    let missing = extracted.record.missing_fields();
    if !missing.is_empty() {
        tracing::warn!(fields = ?missing, "certificate record has unextracted fields");
    }

    if !extracted.hash_matches() {
        tracing::warn!(
            supplied = ?extracted.hash,
            computed = %extracted.record.fingerprint(),
            "record hash does not match its fields; using supplied hash"
        );
    }

    Ok(extracted.payload())
}

/// Prints version information to stdout.
fn print_version() {
    println!("certchain {}", env!("CARGO_PKG_VERSION"));
    println!("ledger    {}", LEDGER_VERSION);
    println!("digest    {}", HASH_FUNCTION);
}
