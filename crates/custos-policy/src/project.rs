//! Project policy: who owns a project and where its packages may go.
//!
//! ```json
//! {
//!   "format": 1,
//!   "principal": { "uri": "https://github.com/org/project" },
//!   "buildRequirements": { "requireSlsaLevel": 3 },
//!   "packages": [
//!     { "uri": "docker.io/org/app", "environment": { "anyOf": ["dev", "prod"] } }
//!   ]
//! }
//! ```
//!
//! `buildRequirements` and `environment` are optional. A package entry
//! without an environment (or with an empty `anyOf`) may be released into
//! any environment, or none.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::{MAX_SLSA_LEVEL, SUPPORTED_FORMAT};

/// A project's release policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPolicy {
    /// Document format version.
    pub format: u32,
    /// The authority that owns this project.
    pub principal: Principal,
    /// Build requirements every release must meet.
    #[serde(default)]
    pub build_requirements: BuildRequirements,
    /// Packages governed by this project.
    pub packages: Vec<Package>,
}

/// The owning authority of a project policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// URI identifying the principal.
    pub uri: String,
}

/// Build requirements of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRequirements {
    /// Minimum SLSA build level; `None` imposes no minimum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_slsa_level: Option<u8>,
}

/// A package governed by a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Package URI, compared by exact string equality.
    pub uri: String,
    /// Environments this package may be released into.
    #[serde(default, skip_serializing_if = "Environment::is_unconstrained")]
    pub environment: Environment,
}

/// An environment allow-list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    /// Allowed environment names; empty means unconstrained.
    #[serde(default)]
    pub any_of: Vec<String>,
}

impl Environment {
    /// Whether any environment (or none) is acceptable.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.any_of.is_empty()
    }

    /// Whether `name` is on the allow-list.
    #[must_use]
    pub fn allows(&self, name: &str) -> bool {
        self.any_of.iter().any(|env| env == name)
    }
}

impl ProjectPolicy {
    /// Parse and validate a project policy document.
    ///
    /// `id` only labels errors.
    pub fn from_slice(id: &str, content: &[u8]) -> Result<Self, PolicyError> {
        let policy: Self = serde_json::from_slice(content).map_err(|source| PolicyError::Parse {
            document: document_label(id),
            source,
        })?;
        policy.validate(id)?;
        Ok(policy)
    }

    /// Check structural rules: known format, non-empty principal, unique
    /// non-empty package URIs, well-formed allow-lists, level in range.
    pub fn validate(&self, id: &str) -> Result<(), PolicyError> {
        let document = document_label(id);
        if self.format != SUPPORTED_FORMAT {
            return Err(PolicyError::UnsupportedFormat {
                document,
                format: self.format,
            });
        }
        if self.principal.uri.is_empty() {
            return Err(PolicyError::invalid(document, "principal uri is empty"));
        }
        if let Some(level) = self.build_requirements.require_slsa_level {
            if level > MAX_SLSA_LEVEL {
                return Err(PolicyError::invalid(
                    document,
                    format!("requireSlsaLevel {level} (must be 0-{MAX_SLSA_LEVEL})"),
                ));
            }
        }

        let mut packages = HashSet::new();
        for package in &self.packages {
            if package.uri.is_empty() {
                return Err(PolicyError::invalid(document, "package with empty uri"));
            }
            if !packages.insert(package.uri.as_str()) {
                return Err(PolicyError::invalid(
                    document,
                    format!("package `{}` is listed more than once", package.uri),
                ));
            }
            let mut environments = HashSet::new();
            for env in &package.environment.any_of {
                if env.is_empty() {
                    return Err(PolicyError::invalid(
                        document,
                        format!("package `{}` allows an empty environment name", package.uri),
                    ));
                }
                if !environments.insert(env.as_str()) {
                    return Err(PolicyError::invalid(
                        document,
                        format!("package `{}` lists environment `{env}` twice", package.uri),
                    ));
                }
            }
        }
        Ok(())
    }

    /// The first package entry whose URI equals `uri`.
    #[must_use]
    pub fn package(&self, uri: &str) -> Option<&Package> {
        self.packages.iter().find(|package| package.uri == uri)
    }
}

fn document_label(id: &str) -> String {
    format!("project policy `{id}`")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(uri: &str, envs: &[&str]) -> Package {
        Package {
            uri: uri.to_owned(),
            environment: Environment {
                any_of: envs.iter().map(|e| (*e).to_owned()).collect(),
            },
        }
    }

    fn project(packages: Vec<Package>) -> ProjectPolicy {
        ProjectPolicy {
            format: 1,
            principal: Principal {
                uri: "principal_uri".to_owned(),
            },
            build_requirements: BuildRequirements {
                require_slsa_level: Some(3),
            },
            packages,
        }
    }

    #[test]
    fn parses_documented_shape() {
        let json = br#"{
            "format": 1,
            "principal": { "uri": "principal_uri" },
            "buildRequirements": { "requireSlsaLevel": 3 },
            "packages": [
                { "uri": "package_uri1", "environment": { "anyOf": ["dev", "prod"] } },
                { "uri": "package_uri2" }
            ]
        }"#;
        let policy = ProjectPolicy::from_slice("p", json).expect("parse");
        assert_eq!(
            policy,
            project(vec![
                package("package_uri1", &["dev", "prod"]),
                package("package_uri2", &[]),
            ])
        );
    }

    #[test]
    fn build_requirements_are_optional() {
        let json = br#"{"format":1,"principal":{"uri":"u"},"packages":[]}"#;
        let policy = ProjectPolicy::from_slice("p", json).expect("parse");
        assert_eq!(policy.build_requirements.require_slsa_level, None);
    }

    #[test]
    fn unconstrained_environment_is_omitted_on_serialize() {
        let json = serde_json::to_value(package("pkg", &[])).expect("serialize");
        assert_eq!(json, serde_json::json!({ "uri": "pkg" }));
    }

    #[test]
    fn package_lookup_matches_exactly() {
        let policy = project(vec![package("pkg/a", &["prod"]), package("pkg/b", &[])]);
        assert_eq!(policy.package("pkg/b").map(|p| p.uri.as_str()), Some("pkg/b"));
        assert!(policy.package("pkg").is_none());
        assert!(policy.package("unknown").is_none());
    }

    #[test]
    fn environment_allow_list() {
        let env = package("pkg", &["dev", "prod"]).environment;
        assert!(env.allows("prod"));
        assert!(!env.allows("staging"));
        assert!(!env.is_unconstrained());
        assert!(Environment::default().is_unconstrained());
    }

    #[test]
    fn empty_principal_rejected() {
        let mut policy = project(vec![]);
        policy.principal.uri.clear();
        let err = policy.validate("p").expect_err("principal");
        assert!(err.to_string().contains("principal uri is empty"));
    }

    #[test]
    fn duplicate_package_rejected() {
        let policy = project(vec![package("pkg", &["dev"]), package("pkg", &["prod"])]);
        let err = policy.validate("p").expect_err("duplicate");
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn duplicate_environment_rejected() {
        let policy = project(vec![package("pkg", &["dev", "dev"])]);
        assert!(policy.validate("p").is_err());
    }

    #[test]
    fn empty_environment_name_rejected() {
        let policy = project(vec![package("pkg", &[""])]);
        assert!(policy.validate("p").is_err());
    }

    #[test]
    fn level_out_of_range_rejected() {
        let mut policy = project(vec![]);
        policy.build_requirements.require_slsa_level = Some(9);
        assert!(matches!(
            policy.validate("p"),
            Err(PolicyError::InvalidPolicy { .. })
        ));
    }

    #[test]
    fn parse_error_names_project() {
        let err = ProjectPolicy::from_slice("policy_id7", b"[]").expect_err("parse");
        assert!(err.to_string().contains("policy_id7"));
    }
}
