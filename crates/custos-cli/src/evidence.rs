//! Release evidence manifests.
//!
//! The CLI does not check release signatures itself. It reads a JSON
//! manifest of releases that an upstream step has already verified and
//! answers the policy engine's release questions from it:
//!
//! ```json
//! {
//!   "releases": [
//!     {
//!       "releaserId": "https://github.com/org/releaser",
//!       "packageUri": "pkg:docker/org/app",
//!       "digest": { "sha256": "..." },
//!       "environment": "prod"
//!     }
//!   ]
//! }
//! ```

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use custos_intoto::DigestSet;
use custos_policy::{ReleaseEvidence, ReleaseVerifier, VerifierError};
use serde::Deserialize;

/// A set of pre-verified release claims.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct EvidenceManifest {
    releases: Vec<ReleaseClaim>,
}

/// One release that has already been authenticated upstream.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReleaseClaim {
    releaser_id: String,
    package_uri: String,
    digest: DigestSet,
    #[serde(default)]
    environment: Option<String>,
}

impl EvidenceManifest {
    /// Read a manifest from a JSON file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read(path)
            .wrap_err_with(|| format!("failed to read evidence {}", path.display()))?;
        let manifest: Self = serde_json::from_slice(&content)
            .wrap_err_with(|| format!("invalid evidence manifest {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            releases = manifest.releases.len(),
            "loaded release evidence"
        );
        Ok(manifest)
    }
}

impl ReleaseVerifier for EvidenceManifest {
    fn verify_release(
        &self,
        digests: &DigestSet,
        package_uri: &str,
        environments: &[String],
    ) -> Result<ReleaseEvidence, VerifierError> {
        let claim = self
            .releases
            .iter()
            .filter(|claim| claim.package_uri == package_uri && claim.digest == *digests)
            .find(|claim| {
                environments.is_empty()
                    || claim
                        .environment
                        .as_ref()
                        .is_some_and(|env| environments.contains(env))
            })
            .ok_or_else(|| {
                format!("no release evidence for {package_uri} in the requested environments")
            })?;

        Ok(ReleaseEvidence {
            releaser_id: claim.releaser_id.clone(),
            environment: claim.environment.clone(),
        })
    }
}
