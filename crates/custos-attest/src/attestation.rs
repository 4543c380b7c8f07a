//! Attestation assembly from an evaluation result.
//!
//! The document is an in-toto v1 statement with a single subject (the
//! released artifact) and a deployment predicate:
//!
//! ```json
//! {
//!   "_type": "https://in-toto.io/Statement/v1",
//!   "predicateType": "https://slsa.dev/deployment/v0.1",
//!   "subjects": [{ "digest": { "sha256": "..." } }],
//!   "predicate": {
//!     "creator": { "id": "...", "version": "..." },
//!     "creationTime": "2025-01-01T00:00:00Z",
//!     "context": { "principal": "..." },
//!     "contextType": "https://slsa.dev/deployment/contextType/PrincipalID",
//!     "policy": { "org": { "uri": "...", "digest": { "sha256": "..." } } }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use custos_intoto::statement::{self, STATEMENT_TYPE};
use custos_intoto::{Header, PolicyRef, Subject};
use custos_policy::{Decision, PolicyEvaluationResult};
use serde::{Deserialize, Serialize};

use crate::error::AttestationError;

/// The deployment predicate type URI.
pub const PREDICATE_TYPE: &str = "https://slsa.dev/deployment/v0.1";

/// Context type recording the principal that owns the decision.
pub const CONTEXT_TYPE_PRINCIPAL: &str = "https://slsa.dev/deployment/contextType/PrincipalID";

/// Context key holding the principal URI.
pub const CONTEXT_PRINCIPAL: &str = "principal";

/// A release attestation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attestation {
    #[serde(flatten)]
    header: Header,
    predicate: Predicate,
}

/// The deployment predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Predicate {
    /// Who produced the attestation.
    pub creator: Creator,
    /// When the attestation was produced.
    pub creation_time: DateTime<Utc>,
    /// Decision context, e.g. the owning principal.
    pub context: BTreeMap<String, String>,
    /// Identifies the shape of `context`.
    pub context_type: String,
    /// Named excerpts of the policies the decision was made under.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub policy: BTreeMap<String, PolicyRef>,
}

/// The tool that produced an attestation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    /// Creator identifier.
    pub id: String,
    /// Creator version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Optional settings for [`Attestation::new`].
///
/// Setting the version twice keeps the last value; policies accumulate by
/// name, with a repeated name replacing the earlier excerpt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreationOptions {
    /// Version of the creator.
    pub creator_version: Option<String>,
    /// Named policy excerpts to record.
    pub policy: BTreeMap<String, PolicyRef>,
}

impl CreationOptions {
    /// No creator version and no policy excerpts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the creator's version.
    #[must_use]
    pub fn creator_version(mut self, version: impl Into<String>) -> Self {
        self.creator_version = Some(version.into());
        self
    }

    /// Record a named policy excerpt.
    #[must_use]
    pub fn policy(mut self, name: impl Into<String>, policy: PolicyRef) -> Self {
        self.policy.insert(name.into(), policy);
        self
    }

    /// Record several named policy excerpts.
    #[must_use]
    pub fn policies<I, S>(mut self, policies: I) -> Self
    where
        I: IntoIterator<Item = (S, PolicyRef)>,
        S: Into<String>,
    {
        self.policy
            .extend(policies.into_iter().map(|(name, policy)| (name.into(), policy)));
        self
    }
}

impl Attestation {
    /// Assemble an attestation for an evaluation result.
    ///
    /// Fails with an internal-kind error unless the evaluation allowed the
    /// release.
    pub fn new(
        result: &PolicyEvaluationResult,
        creator_id: &str,
        options: &CreationOptions,
    ) -> Result<Self, AttestationError> {
        match result {
            PolicyEvaluationResult::Allowed(decision) => {
                Self::from_decision(decision, creator_id, options)
            }
            PolicyEvaluationResult::Denied(err) => {
                Err(AttestationError::RejectedEvaluation(err.to_string()))
            }
        }
    }

    /// Assemble an attestation for an allowed release.
    pub fn from_decision(
        decision: &Decision,
        creator_id: &str,
        options: &CreationOptions,
    ) -> Result<Self, AttestationError> {
        if creator_id.is_empty() {
            return Err(AttestationError::EmptyCreatorId);
        }
        let subject = Subject::from_digests(decision.digests.clone());
        subject.validate()?;

        Ok(Self {
            header: Header {
                statement_type: STATEMENT_TYPE.to_owned(),
                predicate_type: PREDICATE_TYPE.to_owned(),
                subjects: vec![subject],
            },
            predicate: Predicate {
                creator: Creator {
                    id: creator_id.to_owned(),
                    version: options.creator_version.clone(),
                },
                creation_time: statement::now(),
                context: BTreeMap::from([(
                    CONTEXT_PRINCIPAL.to_owned(),
                    decision.principal.uri.clone(),
                )]),
                context_type: CONTEXT_TYPE_PRINCIPAL.to_owned(),
                policy: options.policy.clone(),
            },
        })
    }

    /// Parse an attestation without checking it is a custos document.
    ///
    /// Use [`crate::Verification::new`] for documents from elsewhere.
    pub(crate) fn from_slice(bytes: &[u8]) -> Result<Self, AttestationError> {
        serde_json::from_slice(bytes).map_err(AttestationError::ParseError)
    }

    /// Serialize to JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, AttestationError> {
        serde_json::to_vec(self).map_err(AttestationError::SerializeError)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, AttestationError> {
        serde_json::to_string_pretty(self).map_err(AttestationError::SerializeError)
    }

    /// The statement header.
    #[must_use]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// The deployment predicate.
    #[must_use]
    pub const fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// The single subject, if the document has exactly one.
    #[must_use]
    pub fn subject(&self) -> Option<&Subject> {
        match self.header.subjects.as_slice() {
            [subject] => Some(subject),
            _ => None,
        }
    }

    /// The recorded principal URI, if any.
    #[must_use]
    pub fn principal(&self) -> Option<&str> {
        self.predicate
            .context
            .get(CONTEXT_PRINCIPAL)
            .map(String::as_str)
    }
}
