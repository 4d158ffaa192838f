use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure encountered while walking a tree.
#[derive(Debug, Error)]
pub enum WalkError {
    /// The traversal root could not be inspected.
    #[error("failed to inspect '{}': {source}", path.display())]
    Root {
        /// Root path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// A directory could not be listed.
    #[error("failed to read directory '{}': {source}", path.display())]
    ReadDir {
        /// Directory whose contents could not be read.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// An entry could not be inspected.
    #[error("failed to inspect metadata for '{}': {source}", path.display())]
    Metadata {
        /// Path whose metadata could not be read.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// The current directory was needed to absolutize a relative root.
    #[error("failed to resolve current directory: {0}")]
    CurrentDir(#[source] io::Error),
}

impl WalkError {
    /// Path the failure refers to, when there is one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Root { path, .. } | Self::ReadDir { path, .. } | Self::Metadata { path, .. } => {
                Some(path)
            }
            Self::CurrentDir(_) => None,
        }
    }
}
