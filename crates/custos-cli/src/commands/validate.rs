//! The `custos validate` subcommand.
//!
//! Loads the organization policy and every project policy, reporting the
//! first structural problem found.

use std::path::PathBuf;
use std::process;

use clap::Args;
use color_eyre::eyre::Result;
use custos_policy::Policy;

use crate::config::Config;

/// Arguments for `custos validate`.
#[derive(Args)]
pub struct ValidateArgs {
    /// Organization policy file.
    #[arg(long, value_name = "PATH")]
    pub org: Option<PathBuf>,

    /// Directory of project policy files (`<id>.json`).
    #[arg(long, value_name = "DIR")]
    pub projects: Option<PathBuf>,
}

/// Execute the validate command.
pub fn execute(args: &ValidateArgs, config: &Config) -> Result<()> {
    let org = config.org_policy(args.org.as_deref())?;
    let projects = config.projects_dir(args.projects.as_deref())?;

    let policy = match Policy::from_paths(&org, &projects) {
        Ok(policy) => policy,
        Err(err) => {
            tracing::warn!(kind = %err.kind(), error = %err, "policy rejected");
            println!("Policy INVALID: {err}");
            process::exit(1);
        }
    };

    let roots = &policy.organization().roots.release;
    println!("Organization: {} release root(s)", roots.len());
    for root in roots {
        println!("  {} (max SLSA level {})", root.id, root.build.max_slsa_level);
    }

    println!("Projects:");
    for id in policy.project_ids() {
        let project = policy.project(id)?;
        println!(
            "  {id}: principal {}, {} package(s)",
            project.principal.uri,
            project.packages.len()
        );
    }

    println!();
    println!("Policy VALID");
    Ok(())
}
