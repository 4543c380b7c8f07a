//! Error types for attestation assembly and verification.

use custos_intoto::ErrorKind;

/// Errors from creating, parsing, or verifying attestations.
#[derive(Debug, thiserror::Error)]
pub enum AttestationError {
    /// Assembly was attempted from an evaluation that did not allow the release.
    #[error("cannot attest a rejected evaluation: {0}")]
    RejectedEvaluation(String),

    /// The creator id is empty.
    #[error("creator id is empty")]
    EmptyCreatorId,

    /// The subject built from the evaluation result is invalid.
    #[error("invalid subject: {0}")]
    InvalidSubject(#[from] custos_intoto::IntotoError),

    /// Failed to serialize the attestation.
    #[error("failed to serialize attestation: {0}")]
    SerializeError(serde_json::Error),

    /// The bytes are not a JSON attestation.
    #[error("failed to parse attestation: {0}")]
    ParseError(serde_json::Error),

    /// The document parsed but is not a well-formed custos attestation.
    #[error("malformed attestation: {0}")]
    Malformed(String),

    /// A field does not have the expected value.
    #[error("{field} mismatch: expected {expected}, got {actual}")]
    Mismatch {
        /// The field that was checked.
        field: String,
        /// What the verifier expected.
        expected: String,
        /// What the attestation records.
        actual: String,
    },

    /// An expected named policy excerpt is absent.
    #[error("policy `{0}` is not recorded in the attestation")]
    PolicyMissing(String),

    /// I/O error while reading an attestation.
    #[error("attestation I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AttestationError {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::RejectedEvaluation(_)
            | Self::SerializeError(_)
            | Self::ParseError(_)
            | Self::Malformed(_)
            | Self::IoError(_) => ErrorKind::Internal,
            Self::EmptyCreatorId | Self::InvalidSubject(_) => ErrorKind::InvalidInput,
            Self::Mismatch { .. } | Self::PolicyMissing(_) => ErrorKind::Verification,
        }
    }

    pub(crate) fn mismatch(
        field: impl Into<String>,
        expected: impl std::fmt::Debug,
        actual: impl std::fmt::Debug,
    ) -> Self {
        Self::Mismatch {
            field: field.into(),
            expected: format!("{expected:?}"),
            actual: format!("{actual:?}"),
        }
    }
}
