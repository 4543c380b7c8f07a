//! custos CLI: gate releases on policy and attest the decision.
//!
//! Validate policy files, evaluate a release against them, verify the
//! resulting attestation, and inspect it.

mod commands;
mod config;
mod evidence;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;

use crate::config::Config;

/// custos: release-gating policy evaluation and attestations.
///
/// An organization lists trusted releasers and the build level each can
/// vouch for; projects list the packages they own and where those may be
/// released. custos decides whether a release is allowed and records the
/// decision as an in-toto attestation.
#[derive(Parser)]
#[command(name = "custos", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (repeat for more detail: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output logs as JSON (for machine consumption).
    #[arg(long, global = true)]
    json_logs: bool,

    /// Configuration file (defaults to the XDG config dir).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Load organization and project policies and report problems.
    Validate(commands::validate::ValidateArgs),
    /// Evaluate a release and emit an attestation if it is allowed.
    Evaluate(commands::evaluate::EvaluateArgs),
    /// Verify an attestation against expected values.
    Verify(commands::verify::VerifyArgs),
    /// Display an attestation in human-readable format.
    Inspect(commands::inspect::InspectArgs),
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Validate(args) => commands::validate::execute(&args, &config),
        Commands::Evaluate(args) => commands::evaluate::execute(&args, &config),
        Commands::Verify(args) => commands::verify::execute(&args, &config),
        Commands::Inspect(args) => commands::inspect::execute(&args),
    }
}
