//! Digest sets: algorithm name to digest value.
//!
//! Equality is set equality over `(algorithm, value)` pairs. The backing
//! map is ordered, so serialization is deterministic regardless of the
//! order entries were inserted in.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::IntotoError;

/// A set of cryptographic digests keyed by algorithm name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DigestSet(BTreeMap<String, String>);

impl DigestSet {
    /// Create an empty digest set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// A digest set holding only the SHA-256 of `data`.
    #[must_use]
    pub fn sha256_of(data: &[u8]) -> Self {
        let mut set = Self::new();
        set.insert("sha256", sha256_bytes(data));
        set
    }

    /// Insert or replace the digest for `algorithm`.
    pub fn insert(&mut self, algorithm: impl Into<String>, value: impl Into<String>) {
        self.0.insert(algorithm.into(), value.into());
    }

    /// The digest recorded for `algorithm`, if any.
    #[must_use]
    pub fn get(&self, algorithm: &str) -> Option<&str> {
        self.0.get(algorithm).map(String::as_str)
    }

    /// Number of algorithms in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(algorithm, value)` pairs in algorithm order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check the set is non-empty and has no empty algorithm or value.
    pub fn validate(&self) -> Result<(), IntotoError> {
        if self.0.is_empty() {
            return Err(IntotoError::EmptyDigestSet);
        }
        for (algorithm, value) in &self.0 {
            if algorithm.is_empty() {
                return Err(IntotoError::EmptyAlgorithm);
            }
            if value.is_empty() {
                return Err(IntotoError::EmptyDigestValue {
                    algorithm: algorithm.clone(),
                });
            }
        }
        Ok(())
    }

    /// Parse `ALG:VALUE` pairs (as given on a command line) into a set.
    ///
    /// Later pairs for the same algorithm replace earlier ones. The result
    /// is validated.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, IntotoError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (algorithm, value) = pair
                .split_once(':')
                .ok_or_else(|| IntotoError::MalformedDigest(pair.to_owned()))?;
            set.insert(algorithm, value);
        }
        set.validate()?;
        Ok(set)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DigestSet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a DigestSet {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Compute the SHA-256 hex digest of a byte slice.
#[must_use]
pub fn sha256_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
