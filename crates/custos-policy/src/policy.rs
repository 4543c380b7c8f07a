//! The loaded policy set: one organization policy and its project policies.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::error::PolicyError;
use crate::organization::OrganizationPolicy;
use crate::project::ProjectPolicy;
use crate::source::{DirectorySource, PolicyDocument};

/// An immutable, validated policy set.
///
/// Evaluation only reads from it, so a single `Policy` can serve any number
/// of concurrent evaluations. Reloading means building a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    organization: OrganizationPolicy,
    projects: BTreeMap<String, ProjectPolicy>,
}

impl Policy {
    /// Load an organization policy and the project policies of `source`.
    ///
    /// Every document is parsed and validated; project ids must be unique.
    pub fn new<I>(organization: &[u8], source: I) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = Result<PolicyDocument, PolicyError>>,
    {
        let organization = OrganizationPolicy::from_slice(organization)?;
        debug!(
            roots = organization.roots.release.len(),
            "loaded organization policy"
        );

        let mut projects = BTreeMap::new();
        for document in source {
            let PolicyDocument { id, content } = document?;
            if projects.contains_key(&id) {
                return Err(PolicyError::DuplicateProject(id));
            }
            let project = ProjectPolicy::from_slice(&id, &content)?;
            debug!(
                project = %id,
                principal = %project.principal.uri,
                packages = project.packages.len(),
                "loaded project policy"
            );
            projects.insert(id, project);
        }

        Ok(Self {
            organization,
            projects,
        })
    }

    /// Load the organization policy file and every `*.json` in `projects_dir`.
    pub fn from_paths(organization: &Path, projects_dir: &Path) -> Result<Self, PolicyError> {
        let content = std::fs::read(organization)?;
        Self::new(&content, DirectorySource::open(projects_dir)?)
    }

    /// The organization policy.
    #[must_use]
    pub const fn organization(&self) -> &OrganizationPolicy {
        &self.organization
    }

    /// The project policy loaded under `id`.
    pub fn project(&self, id: &str) -> Result<&ProjectPolicy, PolicyError> {
        self.projects
            .get(id)
            .ok_or_else(|| PolicyError::ProjectNotFound(id.to_owned()))
    }

    /// Ids of all loaded project policies, in order.
    pub fn project_ids(&self) -> impl Iterator<Item = &str> {
        self.projects.keys().map(String::as_str)
    }
}
