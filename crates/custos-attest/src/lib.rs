//! Release attestations: assembly and re-verification.
//!
//! `custos-attest` turns an allowed [`custos_policy::PolicyEvaluationResult`]
//! into an in-toto statement recording who decided, for which principal,
//! under which policies, and about which artifact. A consumer later parses
//! the bytes with [`Verification`] and checks them against its own
//! expectations without re-running the evaluation.

pub mod attestation;
pub mod error;
pub mod inspect;
pub mod verification;

// Re-export primary types for convenience.
pub use attestation::{
    Attestation, CONTEXT_PRINCIPAL, CONTEXT_TYPE_PRINCIPAL, CreationOptions, Creator,
    PREDICATE_TYPE, Predicate,
};
pub use error::AttestationError;
pub use verification::{Verification, VerificationOptions};
