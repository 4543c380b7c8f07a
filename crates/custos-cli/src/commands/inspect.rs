//! The `custos inspect` subcommand.
//!
//! Displays an attestation in human-readable format.

use std::path::PathBuf;

use clap::Args;
use color_eyre::eyre::{Result, WrapErr};
use custos_attest::Verification;
use custos_attest::inspect;

/// Arguments for `custos inspect`.
#[derive(Args)]
pub struct InspectArgs {
    /// Path to the attestation JSON file.
    pub attestation: PathBuf,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the inspect command.
pub fn execute(args: &InspectArgs) -> Result<()> {
    let bytes = std::fs::read(&args.attestation)
        .wrap_err_with(|| format!("failed to read {}", args.attestation.display()))?;
    let verification = Verification::new(&bytes)?;
    let summary = inspect::summarize(verification.attestation());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", inspect::format_summary(&summary));
    }

    Ok(())
}
