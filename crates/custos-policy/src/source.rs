//! Sources of project policy documents.
//!
//! A source is any iterator of `Result<PolicyDocument, PolicyError>`: it
//! yields each project policy once, in order, and is not restartable. The
//! loader in [`crate::policy`] consumes it and keys documents by id.

use std::path::{Path, PathBuf};
use std::vec;

use crate::error::PolicyError;

/// A raw project policy document and the id it is selected by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDocument {
    /// Identifier used to select this policy at evaluation time.
    pub id: String,
    /// The encoded policy.
    pub content: Vec<u8>,
}

impl PolicyDocument {
    /// Create a document from an id and its bytes.
    #[must_use]
    pub fn new(id: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}

/// Reads every `*.json` file of a directory, in file-name order.
///
/// Each document's id is its file stem, so `projects/web.json` is selected
/// as `web`.
#[derive(Debug)]
pub struct DirectorySource {
    paths: vec::IntoIter<PathBuf>,
}

impl DirectorySource {
    /// List the policy files in `dir`.
    ///
    /// The listing happens here; file contents are read lazily as the
    /// source is iterated.
    pub fn open(dir: &Path) -> Result<Self, PolicyError> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(Self {
            paths: paths.into_iter(),
        })
    }

    /// Path of the document a given id would be read from.
    #[must_use]
    pub fn document_path(dir: &Path, id: &str) -> PathBuf {
        dir.join(format!("{id}.json"))
    }
}

impl Iterator for DirectorySource {
    type Item = Result<PolicyDocument, PolicyError>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.paths.next()?;
        let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
            return Some(Err(PolicyError::InvalidPolicy {
                document: path.display().to_string(),
                reason: "file name is not valid UTF-8".to_owned(),
            }));
        };
        let id = id.to_owned();
        Some(
            std::fs::read(&path)
                .map(|content| PolicyDocument { id, content })
                .map_err(PolicyError::from),
        )
    }
}

/// Serves in-memory documents with positional ids `policy_id0`, `policy_id1`, ...
#[derive(Debug)]
pub struct IndexedSource {
    blobs: std::iter::Enumerate<vec::IntoIter<Vec<u8>>>,
}

impl IndexedSource {
    /// Wrap encoded project policies.
    #[must_use]
    pub fn new(blobs: Vec<Vec<u8>>) -> Self {
        Self {
            blobs: blobs.into_iter().enumerate(),
        }
    }

    /// The id assigned to the document at `index`.
    #[must_use]
    pub fn id_for(index: usize) -> String {
        format!("policy_id{index}")
    }
}

impl Iterator for IndexedSource {
    type Item = Result<PolicyDocument, PolicyError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, content) = self.blobs.next()?;
        Some(Ok(PolicyDocument {
            id: Self::id_for(index),
            content,
        }))
    }
}
