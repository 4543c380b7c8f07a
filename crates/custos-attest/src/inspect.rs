//! Human-readable attestation display.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;

use crate::attestation::Attestation;

/// Extracted summary of an attestation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationSummary {
    /// The in-toto statement type URI.
    pub statement_type: String,
    /// The predicate type URI.
    pub predicate_type: String,
    /// Creator id.
    pub creator_id: String,
    /// Creator version, if recorded.
    pub creator_version: Option<String>,
    /// RFC 3339 creation time.
    pub creation_time: String,
    /// Digests of the subject.
    pub subject_digests: BTreeMap<String, String>,
    /// Context type URI.
    pub context_type: String,
    /// Decision context.
    pub context: BTreeMap<String, String>,
    /// Named policy excerpts: name to URI.
    pub policies: BTreeMap<String, String>,
}

/// Extract a summary from a parsed attestation.
#[must_use]
pub fn summarize(attestation: &Attestation) -> AttestationSummary {
    let header = attestation.header();
    let predicate = attestation.predicate();

    AttestationSummary {
        statement_type: header.statement_type.clone(),
        predicate_type: header.predicate_type.clone(),
        creator_id: predicate.creator.id.clone(),
        creator_version: predicate.creator.version.clone(),
        creation_time: predicate.creation_time.to_rfc3339(),
        subject_digests: header
            .subjects
            .iter()
            .flat_map(|s| s.digests.iter())
            .map(|(alg, value)| (alg.to_owned(), value.to_owned()))
            .collect(),
        context_type: predicate.context_type.clone(),
        context: predicate.context.clone(),
        policies: predicate
            .policy
            .iter()
            .map(|(name, policy)| (name.clone(), policy.uri.clone()))
            .collect(),
    }
}

/// Format a summary for terminal display.
#[must_use]
pub fn format_summary(summary: &AttestationSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Statement:     {}", summary.statement_type);
    let _ = writeln!(out, "Predicate:     {}", summary.predicate_type);
    let _ = writeln!(
        out,
        "Creator:       {}{}",
        summary.creator_id,
        summary
            .creator_version
            .as_deref()
            .map_or_else(String::new, |v| format!(" ({v})"))
    );
    let _ = writeln!(out, "Created:       {}", summary.creation_time);
    let _ = writeln!(out, "Context type:  {}", summary.context_type);

    let _ = writeln!(out, "Subject:");
    for (alg, value) in &summary.subject_digests {
        let _ = writeln!(out, "  {alg}: {value}");
    }

    let _ = writeln!(out, "Context:");
    for (key, value) in &summary.context {
        let _ = writeln!(out, "  {key}: {value}");
    }

    if summary.policies.is_empty() {
        let _ = writeln!(out, "Policies:      (none)");
    } else {
        let _ = writeln!(out, "Policies:");
        for (name, uri) in &summary.policies {
            let _ = writeln!(out, "  {name}: {uri}");
        }
    }
    out
}
