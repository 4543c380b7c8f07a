//! The `custos verify` subcommand.
//!
//! Checks an attestation against the values the consumer expects.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process;

use clap::Args;
use color_eyre::eyre::{Result, WrapErr, eyre};
use custos_attest::{CONTEXT_PRINCIPAL, CONTEXT_TYPE_PRINCIPAL, Verification, VerificationOptions};

use crate::config::Config;

/// Arguments for `custos verify`.
#[derive(Args)]
pub struct VerifyArgs {
    /// Path to the attestation JSON file.
    pub attestation: PathBuf,

    /// Expected creator id.
    #[arg(long, value_name = "ID")]
    pub creator_id: Option<String>,

    /// Expected artifact digest as ALG:VALUE (repeatable).
    #[arg(long = "digest", value_name = "ALG:VALUE", required = true)]
    pub digests: Vec<String>,

    /// Expected principal URI.
    #[arg(long, value_name = "URI")]
    pub principal: String,

    /// Expected creator version.
    #[arg(long, value_name = "VERSION")]
    pub creator_version: Option<String>,

    /// Expected policy excerpt NAME for the file at PATH (repeatable).
    #[arg(long = "policy", value_name = "NAME=PATH")]
    pub policies: Vec<String>,
}

/// Execute the verify command.
pub fn execute(args: &VerifyArgs, config: &Config) -> Result<()> {
    let creator_id = config.creator_id(args.creator_id.as_deref())?;
    let digests = super::parse_digests(&args.digests)?;

    let mut options = VerificationOptions::new();
    if let Some(version) = &args.creator_version {
        options = options.is_creator_version(version);
    }
    for flag in &args.policies {
        let (name, path) = flag
            .split_once('=')
            .ok_or_else(|| eyre!("invalid --policy `{flag}`: expected NAME=PATH"))?;
        let excerpt = super::file_excerpt(Path::new(path))?;
        options = options.has_policy(name, excerpt.uri, excerpt.digests);
    }

    let bytes = std::fs::read(&args.attestation)
        .wrap_err_with(|| format!("failed to read {}", args.attestation.display()))?;
    let verification = Verification::new(&bytes)?;

    let context = BTreeMap::from([(CONTEXT_PRINCIPAL.to_owned(), args.principal.clone())]);
    match verification.verify(
        &creator_id,
        &digests,
        CONTEXT_TYPE_PRINCIPAL,
        &context,
        &options,
    ) {
        Ok(()) => {
            tracing::info!(attestation = %args.attestation.display(), "attestation verified");
            println!("Verification PASSED");
            Ok(())
        }
        Err(err) => {
            tracing::warn!(attestation = %args.attestation.display(), error = %err, "verification failed");
            println!("Verification FAILED: {err}");
            process::exit(1);
        }
    }
}
