//! The release authenticity capability.
//!
//! custos never inspects build or release evidence itself. Callers plug in
//! a [`ReleaseVerifier`] that confirms a release really happened and
//! reports who released it and into which environment.

use std::fmt;

use custos_intoto::DigestSet;

/// Error type returned by release verifiers.
///
/// Anything a verifier reports, including transport failures and timeouts,
/// is treated as the release not being verified.
pub type VerifierError = Box<dyn std::error::Error + Send + Sync>;

/// What a verifier confirmed about a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseEvidence {
    /// Identity of the releaser that produced the release.
    pub releaser_id: String,
    /// The single environment the release matched, if any applies.
    pub environment: Option<String>,
}

impl ReleaseEvidence {
    /// Evidence for a release into a specific environment.
    #[must_use]
    pub fn new(releaser_id: impl Into<String>, environment: Option<&str>) -> Self {
        Self {
            releaser_id: releaser_id.into(),
            environment: environment.map(str::to_owned),
        }
    }
}

/// Confirms that a release of `package_uri` with `digests` took place.
///
/// `environments` is the package's allow-list; an empty slice means the
/// package is not constrained to particular environments.
pub trait ReleaseVerifier: Send + Sync {
    /// Verify the release and report the releaser and matched environment.
    fn verify_release(
        &self,
        digests: &DigestSet,
        package_uri: &str,
        environments: &[String],
    ) -> Result<ReleaseEvidence, VerifierError>;
}

impl<F> ReleaseVerifier for F
where
    F: Fn(&DigestSet, &str, &[String]) -> Result<ReleaseEvidence, VerifierError> + Send + Sync,
{
    fn verify_release(
        &self,
        digests: &DigestSet,
        package_uri: &str,
        environments: &[String],
    ) -> Result<ReleaseEvidence, VerifierError> {
        self(digests, package_uri, environments)
    }
}

/// Options for verifying releases during evaluation.
#[derive(Clone, Copy, Default)]
pub struct ReleaseVerificationOptions<'a> {
    /// The capability used to confirm releases. Evaluation without one is a
    /// caller error.
    pub verifier: Option<&'a dyn ReleaseVerifier>,
}

impl<'a> ReleaseVerificationOptions<'a> {
    /// Options using `verifier`.
    #[must_use]
    pub fn new(verifier: &'a dyn ReleaseVerifier) -> Self {
        Self {
            verifier: Some(verifier),
        }
    }
}

impl fmt::Debug for ReleaseVerificationOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseVerificationOptions")
            .field("verifier", &self.verifier.map(|_| "<dyn ReleaseVerifier>"))
            .finish()
    }
}
