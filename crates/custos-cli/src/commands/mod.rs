//! CLI subcommands.

#[expect(
    unreachable_pub,
    reason = "binary crate: pub inside private module is fine"
)]
pub mod evaluate;
#[expect(
    unreachable_pub,
    reason = "binary crate: pub inside private module is fine"
)]
pub mod inspect;
#[expect(
    unreachable_pub,
    reason = "binary crate: pub inside private module is fine"
)]
pub mod validate;
#[expect(
    unreachable_pub,
    reason = "binary crate: pub inside private module is fine"
)]
pub mod verify;

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use custos_intoto::{DigestSet, PolicyRef};

/// Parse repeated `--digest ALG:VALUE` flags.
fn parse_digests(pairs: &[String]) -> Result<DigestSet> {
    DigestSet::from_pairs(pairs).wrap_err("invalid --digest")
}

/// A policy excerpt naming `path` and the SHA-256 of its contents.
fn file_excerpt(path: &Path) -> Result<PolicyRef> {
    let content = std::fs::read(path)
        .wrap_err_with(|| format!("failed to read policy {}", path.display()))?;
    Ok(PolicyRef::new(
        path.display().to_string(),
        DigestSet::sha256_of(&content),
    ))
}
