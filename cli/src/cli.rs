//! # CLI Interface
//!
//! Defines the command-line argument structure for `certchain` using
//! `clap` derive. Subcommands: `init`, `issue`, `verify`, `explore`,
//! `validate`, and `version`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use certchain_ledger::config::DEFAULT_LEDGER_FILE;

/// Certificate fingerprint ledger.
///
/// Records certificate fingerprints in a hash-chained ledger file and
/// verifies later that a fingerprint was recorded and the ledger has not
/// been altered.
#[derive(Parser, Debug)]
#[command(
    name = "certchain",
    about = "Hash-chained ledger for certificate fingerprints",
    version,
    propagate_version = true
)]
pub struct CertchainCli {
    /// Path to the ledger file. Created with a genesis block if missing.
    #[arg(
        long,
        short = 'l',
        global = true,
        env = "CERTCHAIN_LEDGER",
        default_value = DEFAULT_LEDGER_FILE
    )]
    pub ledger: PathBuf,

    /// Default log filter when `RUST_LOG` is not set.
    #[arg(long, global = true, env = "CERTCHAIN_LOG", default_value = "info")]
    pub log_level: String,

    /// Log output format.
    #[arg(
        long,
        global = true,
        env = "CERTCHAIN_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormatArg::Pretty
    )]
    pub log_format: LogFormatArg,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the ledger, creating it if needed, and print its summary.
    Init,
    /// Record a certificate fingerprint in a new block.
    Issue(PayloadArgs),
    /// Check that a fingerprint is recorded in an intact ledger.
    Verify(PayloadArgs),
    /// List every block in the ledger.
    Explore(ExploreArgs),
    /// Recompute every hash and link and report the first violation.
    Validate,
    /// Print version information and exit.
    Version,
}

/// Where the payload comes from: given directly, or derived from a
/// certificate record file.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct PayloadArgs {
    /// Certificate fingerprint (hex digest) to record or look up.
    pub fingerprint: Option<String>,

    /// JSON file with extracted certificate fields. Its `hash` is used when
    /// present; otherwise the fingerprint is computed from the fields.
    #[arg(long, short = 'r')]
    pub record: Option<PathBuf>,
}

/// Arguments for the `explore` subcommand.
#[derive(Args, Debug)]
pub struct ExploreArgs {
    /// Print the blocks as a JSON array instead of a listing.
    #[arg(long)]
    pub json: bool,
}

/// Log format as accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormatArg {
    Pretty,
    Json,
}
