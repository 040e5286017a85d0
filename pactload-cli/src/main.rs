//! pactload: resolve the pacts a provider must be verified against.
//!
//! # Usage
//!
//! ```text
//! pactload broker --provider <name> [--config pactload.yaml] [--host ..] [--port ..]
//!                 [--scheme ..] [--tag <t>]... [--consumer <c>]...
//!                 [--auth-scheme ..] [--username ..] [--password ..] [--token ..]
//!                 [--allow-empty] [--json]
//! pactload folder <dir> --provider <name> [--json]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{broker::BrokerArgs, folder::FolderArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "pactload",
    version,
    about = "Resolve consumer pacts for a provider from a pact broker or a directory",
    long_about = None,
)]
struct Cli {
    /// Log loader decisions (equivalent to RUST_LOG=debug).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load pacts for a provider from a pact broker.
    Broker(BrokerArgs),

    /// Load pacts for a provider from a directory of pact files.
    Folder(FolderArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Broker(args) => args.run(),
        Commands::Folder(args) => args.run(),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
