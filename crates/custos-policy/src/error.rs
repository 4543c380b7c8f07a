//! Error types for policy loading and evaluation.

use custos_intoto::ErrorKind;

use crate::verifier::VerifierError;

/// Errors from loading or evaluating release policies.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// A policy document is not valid JSON or does not match the schema.
    #[error("failed to parse {document}: {source}")]
    Parse {
        /// Which document failed (`organization policy` or a project id).
        document: String,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// A policy document declares a format version we do not understand.
    #[error("{document} has unsupported format {format}")]
    UnsupportedFormat {
        /// Which document declared it.
        document: String,
        /// The declared format version.
        format: u32,
    },

    /// A policy document parsed but violates a structural rule.
    #[error("invalid {document}: {reason}")]
    InvalidPolicy {
        /// Which document is invalid.
        document: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Two project policies were supplied under the same id.
    #[error("duplicate project policy id `{0}`")]
    DuplicateProject(String),

    /// No project policy is loaded under the requested id.
    #[error("project policy `{0}` not found")]
    ProjectNotFound(String),

    /// Evaluation was called with inputs that break its contract.
    #[error("invalid evaluation request: {0}")]
    InvalidRequest(String),

    /// The package is not listed in the selected project policy.
    #[error("package `{package}` is not governed by project policy `{project}`")]
    PackageNotGoverned {
        /// The candidate package URI.
        package: String,
        /// The project policy id that was searched.
        project: String,
    },

    /// The authenticity capability could not confirm the release.
    #[error("release of `{package}` could not be verified: {source}")]
    ReleaseNotVerified {
        /// The candidate package URI.
        package: String,
        /// What the capability reported.
        source: VerifierError,
    },

    /// The confirmed environment is missing or not on the allow-list.
    #[error(
        "environment {} is not allowed for `{package}` (allowed: {allowed:?})",
        environment_label(.environment.as_deref())
    )]
    EnvironmentNotAllowed {
        /// The candidate package URI.
        package: String,
        /// The environment the capability reported, if any.
        environment: Option<String>,
        /// The package entry's allow-list.
        allowed: Vec<String>,
    },

    /// The reported releaser is not a release root of the organization.
    #[error("releaser `{0}` is not a trusted release root")]
    UnknownReleaser(String),

    /// The releaser's root cannot attain the level the project requires.
    #[error("releaser `{releaser}` attains at most SLSA level {max}, project requires {required}")]
    InsufficientLevel {
        /// The releaser identity.
        releaser: String,
        /// The root's maximum attainable level.
        max: u8,
        /// The project's required level.
        required: u8,
    },

    /// I/O error while reading policy documents.
    #[error("policy I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PolicyError {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse { .. }
            | Self::UnsupportedFormat { .. }
            | Self::InvalidPolicy { .. }
            | Self::DuplicateProject(_) => ErrorKind::InvalidInput,
            Self::ProjectNotFound(_) => ErrorKind::NotFound,
            Self::InvalidRequest(_) | Self::IoError(_) => ErrorKind::Internal,
            Self::PackageNotGoverned { .. }
            | Self::ReleaseNotVerified { .. }
            | Self::EnvironmentNotAllowed { .. }
            | Self::UnknownReleaser(_)
            | Self::InsufficientLevel { .. } => ErrorKind::Verification,
        }
    }

    /// Whether the policy legitimately rejected the candidate.
    #[must_use]
    pub const fn is_verification(&self) -> bool {
        matches!(self.kind(), ErrorKind::Verification)
    }

    pub(crate) fn invalid(document: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPolicy {
            document: document.into(),
            reason: reason.into(),
        }
    }
}

fn environment_label(environment: Option<&str>) -> String {
    environment.map_or_else(|| "<none>".to_owned(), |e| format!("`{e}`"))
}
