//! Organization policy: the trusted release roots.
//!
//! ```json
//! {
//!   "format": 1,
//!   "roots": {
//!     "release": [
//!       { "id": "https://github.com/org/releaser", "build": { "maxSlsaLevel": 3 } }
//!     ]
//!   }
//! }
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::{MAX_SLSA_LEVEL, SUPPORTED_FORMAT};

const DOCUMENT: &str = "organization policy";

/// The organization-wide policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationPolicy {
    /// Document format version.
    pub format: u32,
    /// Trusted roots.
    pub roots: Roots,
}

/// The kinds of trusted roots an organization declares.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roots {
    /// Identities trusted to release packages.
    pub release: Vec<Root>,
}

/// A trusted releaser and the strongest build level it can vouch for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Root {
    /// Releaser identity, as reported by the release verifier.
    pub id: String,
    /// Build capabilities of this releaser.
    pub build: Build,
}

/// Build capabilities of a release root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    /// Highest SLSA build level this root can attain.
    pub max_slsa_level: u8,
}

impl OrganizationPolicy {
    /// Parse and validate an organization policy document.
    pub fn from_slice(content: &[u8]) -> Result<Self, PolicyError> {
        let policy: Self = serde_json::from_slice(content).map_err(|source| PolicyError::Parse {
            document: DOCUMENT.to_owned(),
            source,
        })?;
        policy.validate()?;
        Ok(policy)
    }

    /// Check structural rules: known format, at least one root, unique
    /// non-empty ids, levels within range.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.format != SUPPORTED_FORMAT {
            return Err(PolicyError::UnsupportedFormat {
                document: DOCUMENT.to_owned(),
                format: self.format,
            });
        }
        if self.roots.release.is_empty() {
            return Err(PolicyError::invalid(DOCUMENT, "no release roots"));
        }

        let mut seen = HashSet::new();
        for root in &self.roots.release {
            if root.id.is_empty() {
                return Err(PolicyError::invalid(DOCUMENT, "release root with empty id"));
            }
            if !seen.insert(root.id.as_str()) {
                return Err(PolicyError::invalid(
                    DOCUMENT,
                    format!("release root `{}` is declared more than once", root.id),
                ));
            }
            if root.build.max_slsa_level > MAX_SLSA_LEVEL {
                return Err(PolicyError::invalid(
                    DOCUMENT,
                    format!(
                        "release root `{}` has maxSlsaLevel {} (must be 0-{MAX_SLSA_LEVEL})",
                        root.id, root.build.max_slsa_level
                    ),
                ));
            }
        }
        Ok(())
    }

    /// The release root with the given id.
    #[must_use]
    pub fn release_root(&self, id: &str) -> Option<&Root> {
        self.roots.release.iter().find(|root| root.id == id)
    }
}
