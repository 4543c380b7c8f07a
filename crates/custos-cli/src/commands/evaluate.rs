//! The `custos evaluate` subcommand.
//!
//! Evaluates a release against the loaded policies and, if it is allowed,
//! emits an attestation recording the decision.

use std::path::PathBuf;
use std::process;

use clap::Args;
use color_eyre::eyre::{Result, WrapErr, eyre};
use custos_attest::{Attestation, CreationOptions};
use custos_intoto::ErrorKind;
use custos_policy::{DirectorySource, Policy, PolicyEvaluationResult, ReleaseVerificationOptions};

use crate::config::Config;
use crate::evidence::EvidenceManifest;

/// Arguments for `custos evaluate`.
#[derive(Args)]
pub struct EvaluateArgs {
    /// Organization policy file.
    #[arg(long, value_name = "PATH")]
    pub org: Option<PathBuf>,

    /// Directory of project policy files (`<id>.json`).
    #[arg(long, value_name = "DIR")]
    pub projects: Option<PathBuf>,

    /// Id of the project policy to evaluate against.
    #[arg(long, value_name = "ID")]
    pub project: String,

    /// URI of the released package.
    #[arg(long, value_name = "URI")]
    pub package: String,

    /// Artifact digest as ALG:VALUE (repeatable).
    #[arg(long = "digest", value_name = "ALG:VALUE", required = true)]
    pub digests: Vec<String>,

    /// Manifest of pre-verified releases.
    #[arg(long, value_name = "PATH")]
    pub evidence: PathBuf,

    /// Creator id recorded in the attestation.
    #[arg(long, value_name = "ID")]
    pub creator_id: Option<String>,

    /// Creator version recorded in the attestation.
    #[arg(long, value_name = "VERSION")]
    pub creator_version: Option<String>,

    /// Write the attestation here instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Execute the evaluate command.
pub fn execute(args: &EvaluateArgs, config: &Config) -> Result<()> {
    let org = config.org_policy(args.org.as_deref())?;
    let projects = config.projects_dir(args.projects.as_deref())?;
    let creator_id = config.creator_id(args.creator_id.as_deref())?;
    let digests = super::parse_digests(&args.digests)?;

    let policy = Policy::from_paths(&org, &projects).wrap_err("failed to load policies")?;
    let evidence = EvidenceManifest::load(&args.evidence)?;

    let result = policy.evaluate(
        &digests,
        &args.package,
        &args.project,
        &ReleaseVerificationOptions::new(&evidence),
    );

    if let PolicyEvaluationResult::Denied(err) = &result {
        if err.kind() != ErrorKind::Verification {
            return Err(eyre!("evaluation failed: {err}"));
        }
        tracing::warn!(
            project = %args.project,
            package = %args.package,
            error = %err,
            "release denied"
        );
        println!("Evaluation DENIED: {err}");
        process::exit(1);
    }

    let mut options = CreationOptions::new()
        .policy("org", super::file_excerpt(&org)?)
        .policy(
            "project",
            super::file_excerpt(&DirectorySource::document_path(&projects, &args.project))?,
        );
    if let Some(version) = args
        .creator_version
        .as_ref()
        .or(config.creator_version.as_ref())
    {
        options = options.creator_version(version);
    }

    let attestation = Attestation::new(&result, &creator_id, &options)?;
    if let Some(decision) = result.decision() {
        tracing::info!(
            project = %args.project,
            package = %args.package,
            releaser = %decision.releaser_id,
            environment = decision.environment.as_deref().unwrap_or("-"),
            "release allowed"
        );
    }

    let json = attestation.to_json_pretty()?;
    if let Some(path) = &args.output {
        std::fs::write(path, format!("{json}\n"))
            .wrap_err_with(|| format!("failed to write {}", path.display()))?;
        eprintln!("Attestation written to {}", path.display());
    } else {
        println!("{json}");
    }

    Ok(())
}
