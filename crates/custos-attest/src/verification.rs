//! Re-verification of a previously assembled attestation.
//!
//! The consumer supplies its own expectations; nothing is trusted from the
//! producer beyond the bytes themselves.

use std::collections::BTreeMap;
use std::io::Read;

use custos_intoto::statement::STATEMENT_TYPE;
use custos_intoto::{DigestSet, PolicyRef};

use crate::attestation::{Attestation, PREDICATE_TYPE};
use crate::error::AttestationError;

/// Optional expectations for [`Verification::verify`].
///
/// Mirrors [`crate::CreationOptions`]: the version overwrites, policies
/// accumulate by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationOptions {
    /// Expected creator version.
    pub creator_version: Option<String>,
    /// Expected named policy excerpts.
    pub policy: BTreeMap<String, PolicyRef>,
}

impl VerificationOptions {
    /// No optional expectations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expect the creator to have this version.
    #[must_use]
    pub fn is_creator_version(mut self, version: impl Into<String>) -> Self {
        self.creator_version = Some(version.into());
        self
    }

    /// Expect a policy excerpt named `name` with this URI and digests.
    #[must_use]
    pub fn has_policy(
        mut self,
        name: impl Into<String>,
        uri: impl Into<String>,
        digests: DigestSet,
    ) -> Self {
        self.policy.insert(name.into(), PolicyRef::new(uri, digests));
        self
    }
}

/// A parsed attestation ready to be checked.
#[derive(Debug, Clone)]
pub struct Verification {
    attestation: Attestation,
}

impl Verification {
    /// Parse attestation bytes.
    ///
    /// Fails with an internal-kind error unless the bytes are a custos
    /// deployment statement with exactly one well-formed subject.
    pub fn new(bytes: &[u8]) -> Result<Self, AttestationError> {
        let attestation = Attestation::from_slice(bytes)?;

        let header = attestation.header();
        if header.statement_type != STATEMENT_TYPE {
            return Err(AttestationError::Malformed(format!(
                "statement type `{}`",
                header.statement_type
            )));
        }
        if header.predicate_type != PREDICATE_TYPE {
            return Err(AttestationError::Malformed(format!(
                "predicate type `{}`",
                header.predicate_type
            )));
        }
        let subject = attestation.subject().ok_or_else(|| {
            AttestationError::Malformed(format!(
                "expected exactly one subject, found {}",
                header.subjects.len()
            ))
        })?;
        subject
            .validate()
            .map_err(|e| AttestationError::Malformed(format!("subject: {e}")))?;

        Ok(Self { attestation })
    }

    /// Read and parse an attestation.
    pub fn from_reader(mut reader: impl Read) -> Result<Self, AttestationError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::new(&bytes)
    }

    /// The parsed attestation.
    #[must_use]
    pub const fn attestation(&self) -> &Attestation {
        &self.attestation
    }

    /// Check the attestation against the caller's expectations.
    ///
    /// Checks run in order (creator, digests, context type, context, then
    /// options) and the first mismatch is returned as a verification-kind
    /// error.
    pub fn verify(
        &self,
        creator_id: &str,
        digests: &DigestSet,
        context_type: &str,
        context: &BTreeMap<String, String>,
        options: &VerificationOptions,
    ) -> Result<(), AttestationError> {
        let predicate = self.attestation.predicate();

        if predicate.creator.id != creator_id {
            return Err(AttestationError::mismatch(
                "creator id",
                creator_id,
                &predicate.creator.id,
            ));
        }

        // `new` guarantees exactly one subject.
        let subject_digests = self.attestation.subject().map(|s| &s.digests);
        if subject_digests != Some(digests) {
            return Err(AttestationError::mismatch(
                "subject digests",
                digests,
                subject_digests,
            ));
        }

        if predicate.context_type != context_type {
            return Err(AttestationError::mismatch(
                "context type",
                context_type,
                &predicate.context_type,
            ));
        }

        if predicate.context != *context {
            return Err(AttestationError::mismatch(
                "context",
                context,
                &predicate.context,
            ));
        }

        if let Some(version) = &options.creator_version {
            if predicate.creator.version.as_ref() != Some(version) {
                return Err(AttestationError::mismatch(
                    "creator version",
                    version,
                    &predicate.creator.version,
                ));
            }
        }

        for (name, expected) in &options.policy {
            let actual = predicate
                .policy
                .get(name)
                .ok_or_else(|| AttestationError::PolicyMissing(name.clone()))?;
            if actual.uri != expected.uri {
                return Err(AttestationError::mismatch(
                    format!("policy `{name}` uri"),
                    &expected.uri,
                    &actual.uri,
                ));
            }
            if actual.digests != expected.digests {
                return Err(AttestationError::mismatch(
                    format!("policy `{name}` digests"),
                    &expected.digests,
                    &actual.digests,
                ));
            }
        }

        Ok(())
    }
}
