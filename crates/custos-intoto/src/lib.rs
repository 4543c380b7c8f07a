//! in-toto building blocks for custos attestations.
//!
//! `custos-intoto` holds the artifact identity model shared by the policy
//! engine and the attestation layer: digest sets, subjects (resource
//! descriptors), the statement header, and named policy excerpts.
//!
//! See: <https://github.com/in-toto/attestation/blob/main/spec/v1/statement.md>

pub mod digest;
pub mod error;
pub mod statement;

pub use digest::DigestSet;
pub use error::{ErrorKind, IntotoError};
pub use statement::{Header, PolicyRef, Subject};
