//! Error kinds shared across the custos crates, and digest/subject errors.

use std::fmt;

/// Coarse classification of every custos error.
///
/// Each crate keeps its own error enum; `kind()` on those enums maps a
/// concrete failure onto one of these so callers can tell a legitimate
/// policy rejection apart from an integration bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller-contract violation or malformed input bytes.
    Internal,
    /// Structurally invalid data reached validation.
    InvalidInput,
    /// The policy (or a re-verification) legitimately rejected the candidate.
    Verification,
    /// A referenced entity does not exist.
    NotFound,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Internal => "internal",
            Self::InvalidInput => "invalid input",
            Self::Verification => "verification",
            Self::NotFound => "not found",
        })
    }
}

/// Validation errors for digest sets and subjects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntotoError {
    /// The digest set has no entries.
    #[error("digest set is empty")]
    EmptyDigestSet,

    /// A digest entry has an empty algorithm name.
    #[error("digest set has an empty algorithm name")]
    EmptyAlgorithm,

    /// A digest entry has an empty value.
    #[error("digest `{algorithm}` has an empty value")]
    EmptyDigestValue {
        /// The algorithm whose value is empty.
        algorithm: String,
    },

    /// A subject carries neither a URI nor any digest.
    #[error("subject has neither a uri nor a digest")]
    EmptySubject,

    /// A `ALG:VALUE` digest argument could not be split.
    #[error("malformed digest `{0}`: expected ALG:VALUE")]
    MalformedDigest(String),
}

impl IntotoError {
    /// All digest and subject validation failures are input errors.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidInput
    }
}
