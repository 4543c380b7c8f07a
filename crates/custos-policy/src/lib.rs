//! Release policies and their evaluation.
//!
//! `custos-policy` loads an organization policy (trusted release roots and
//! the highest SLSA level each can attain) together with a set of project
//! policies (owning principal, required level, and which packages may be
//! released into which environments), then decides whether a release
//! candidate is permitted.
//!
//! Evaluation runs in four steps:
//! 1. **Package** — the candidate's package must be governed by the project
//! 2. **Authenticity** — a caller-supplied [`ReleaseVerifier`] confirms the release
//! 3. **Environment** — the confirmed environment must be on the allow-list
//! 4. **Level** — the releaser's root must be able to attain the required level

pub mod error;
pub mod evaluate;
pub mod organization;
pub mod policy;
pub mod project;
pub mod source;
pub mod verifier;

// Re-export primary types for convenience.
pub use error::PolicyError;
pub use evaluate::{Decision, PolicyEvaluationResult};
pub use policy::Policy;
pub use source::{DirectorySource, IndexedSource, PolicyDocument};
pub use verifier::{ReleaseEvidence, ReleaseVerificationOptions, ReleaseVerifier, VerifierError};

/// The only policy document format version currently understood.
pub const SUPPORTED_FORMAT: u32 = 1;

/// The highest SLSA build level.
pub const MAX_SLSA_LEVEL: u8 = 4;
