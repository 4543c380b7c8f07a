//! Release evaluation against the loaded policy.
//!
//! Evaluation never logs and never retains anything from the call: the
//! outcome, including the reason for a rejection, is carried entirely by
//! the returned [`PolicyEvaluationResult`].

use custos_intoto::{DigestSet, ErrorKind};

use crate::error::PolicyError;
use crate::policy::Policy;
use crate::project::Principal;
use crate::verifier::ReleaseVerificationOptions;

/// The payload of an allowed release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Validated digests of the released artifact.
    pub digests: DigestSet,
    /// Principal of the project that governs the package.
    pub principal: Principal,
    /// Releaser confirmed by the verifier.
    pub releaser_id: String,
    /// Environment confirmed by the verifier, if any.
    pub environment: Option<String>,
}

/// The outcome of evaluating one release candidate.
#[derive(Debug)]
pub enum PolicyEvaluationResult {
    /// The release is permitted.
    Allowed(Decision),
    /// The release is rejected, or the request itself was invalid.
    Denied(PolicyError),
}

impl PolicyEvaluationResult {
    /// The error, if evaluation did not allow the release.
    #[must_use]
    pub const fn error(&self) -> Option<&PolicyError> {
        match self {
            Self::Allowed(_) => None,
            Self::Denied(err) => Some(err),
        }
    }

    /// The decision, if the release is allowed.
    #[must_use]
    pub const fn decision(&self) -> Option<&Decision> {
        match self {
            Self::Allowed(decision) => Some(decision),
            Self::Denied(_) => None,
        }
    }

    /// Whether the release is allowed.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed(_))
    }

    /// Kind of the error, if any.
    #[must_use]
    pub const fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Allowed(_) => None,
            Self::Denied(err) => Some(err.kind()),
        }
    }

    /// Convert into a `Result`.
    pub fn into_result(self) -> Result<Decision, PolicyError> {
        match self {
            Self::Allowed(decision) => Ok(decision),
            Self::Denied(err) => Err(err),
        }
    }
}

impl From<Result<Decision, PolicyError>> for PolicyEvaluationResult {
    fn from(result: Result<Decision, PolicyError>) -> Self {
        match result {
            Ok(decision) => Self::Allowed(decision),
            Err(err) => Self::Denied(err),
        }
    }
}

impl Policy {
    /// Decide whether a release of `package_uri` with `digests` is permitted
    /// by the project policy `project_id`.
    ///
    /// Malformed requests (invalid digests, empty package URI, unknown
    /// project, missing verifier) yield an internal-kind error. Every
    /// legitimate rejection yields a verification-kind error.
    pub fn evaluate(
        &self,
        digests: &DigestSet,
        package_uri: &str,
        project_id: &str,
        options: &ReleaseVerificationOptions<'_>,
    ) -> PolicyEvaluationResult {
        self.try_evaluate(digests, package_uri, project_id, options)
            .into()
    }

    fn try_evaluate(
        &self,
        digests: &DigestSet,
        package_uri: &str,
        project_id: &str,
        options: &ReleaseVerificationOptions<'_>,
    ) -> Result<Decision, PolicyError> {
        digests
            .validate()
            .map_err(|e| PolicyError::InvalidRequest(format!("digests: {e}")))?;
        if package_uri.is_empty() {
            return Err(PolicyError::InvalidRequest("package uri is empty".to_owned()));
        }
        let verifier = options
            .verifier
            .ok_or_else(|| PolicyError::InvalidRequest("no release verifier".to_owned()))?;
        let project = self
            .project(project_id)
            .map_err(|e| PolicyError::InvalidRequest(e.to_string()))?;

        let package = project
            .package(package_uri)
            .ok_or_else(|| PolicyError::PackageNotGoverned {
                package: package_uri.to_owned(),
                project: project_id.to_owned(),
            })?;
        let allowed = &package.environment;

        let evidence = verifier
            .verify_release(digests, package_uri, &allowed.any_of)
            .map_err(|source| PolicyError::ReleaseNotVerified {
                package: package_uri.to_owned(),
                source,
            })?;

        if !allowed.is_unconstrained() {
            let permitted = evidence
                .environment
                .as_deref()
                .is_some_and(|env| allowed.allows(env));
            if !permitted {
                return Err(PolicyError::EnvironmentNotAllowed {
                    package: package_uri.to_owned(),
                    environment: evidence.environment,
                    allowed: allowed.any_of.clone(),
                });
            }
        }

        let root = self
            .organization()
            .release_root(&evidence.releaser_id)
            .ok_or_else(|| PolicyError::UnknownReleaser(evidence.releaser_id.clone()))?;

        if let Some(required) = project.build_requirements.require_slsa_level {
            if required > root.build.max_slsa_level {
                return Err(PolicyError::InsufficientLevel {
                    releaser: root.id.clone(),
                    max: root.build.max_slsa_level,
                    required,
                });
            }
        }

        Ok(Decision {
            digests: digests.clone(),
            principal: project.principal.clone(),
            releaser_id: evidence.releaser_id,
            environment: evidence.environment,
        })
    }
}
