//! in-toto v1 statement header, subjects, and policy excerpts.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::digest::DigestSet;
use crate::error::IntotoError;

/// The canonical in-toto statement type URI.
pub const STATEMENT_TYPE: &str = "https://in-toto.io/Statement/v1";

/// The statement header shared by every custos attestation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Always [`STATEMENT_TYPE`] for documents we produce.
    #[serde(rename = "_type")]
    pub statement_type: String,
    /// Identifies the predicate schema.
    #[serde(rename = "predicateType")]
    pub predicate_type: String,
    /// The artifacts the statement is about.
    pub subjects: Vec<Subject>,
}

/// A subject of a statement: an in-toto resource descriptor.
///
/// Absent optional fields are omitted from the wire form, never `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    /// URI identifying the artifact globally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Content digests.
    #[serde(default, rename = "digest", skip_serializing_if = "DigestSet::is_empty")]
    pub digests: DigestSet,
    /// Machine-readable name distinguishing descriptors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// MIME type of the artifact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// Free-form metadata for consumers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<serde_json::Map<String, serde_json::Value>>,
}

impl Subject {
    /// A subject identified only by its digests.
    #[must_use]
    pub fn from_digests(digests: DigestSet) -> Self {
        Self {
            digests,
            ..Self::default()
        }
    }

    /// Check the subject identifies something and its digests are well formed.
    pub fn validate(&self) -> Result<(), IntotoError> {
        let has_uri = self.uri.as_deref().is_some_and(|u| !u.is_empty());
        if !has_uri && self.digests.is_empty() {
            return Err(IntotoError::EmptySubject);
        }
        self.digests.validate()
    }
}

/// An excerpt identifying a policy document by location and content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRef {
    /// Where the policy lives.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uri: String,
    /// Digests of the policy content.
    #[serde(default, rename = "digest", skip_serializing_if = "DigestSet::is_empty")]
    pub digests: DigestSet,
}

impl PolicyRef {
    /// Create an excerpt from a URI and digest set.
    #[must_use]
    pub fn new(uri: impl Into<String>, digests: DigestSet) -> Self {
        Self {
            uri: uri.into(),
            digests,
        }
    }
}

/// The current UTC time truncated to whole seconds.
///
/// Attestation timestamps carry no sub-second component so the RFC 3339
/// form is stable across serializers.
#[must_use]
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}
