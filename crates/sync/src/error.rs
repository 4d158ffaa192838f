use std::io;
use std::path::PathBuf;

use thiserror::Error;
use walk::WalkError;

use crate::report::SyncReport;

/// Broad classification of a remote filesystem failure.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RemoteErrorKind {
    /// The path does not exist.
    NotFound,
    /// The server refused access.
    PermissionDenied,
    /// The path exists but has the wrong type for the operation.
    WrongType,
    /// Any other failure.
    Other,
}

/// A failed remote filesystem operation.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("{path}: {message}")]
pub struct RemoteError {
    kind: RemoteErrorKind,
    path: String,
    message: String,
}

impl RemoteError {
    /// Creates an error for `path`.
    #[must_use]
    pub fn new(kind: RemoteErrorKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a missing path.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::NotFound, path, "no such file or directory")
    }

    /// Failure classification.
    #[must_use]
    pub const fn kind(&self) -> RemoteErrorKind {
        self.kind
    }

    /// Remote path the failure refers to.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Server or transport message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the path did not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == RemoteErrorKind::NotFound
    }
}

/// A failure transferring one file or directory.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The file could not be placed because its remote parent directory could
    /// not be created.
    #[error("cannot create remote file '{path}': parent directory '{directory}' could not be created: {source}")]
    RemoteDirCreateHard {
        /// Destination of the file.
        path: String,
        /// Directory whose creation failed.
        directory: String,
        /// The failure writing the file.
        source: RemoteError,
    },
    /// A local file could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    FileRead {
        /// Local path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// A local file or directory could not be written.
    #[error("failed to write '{}': {source}", path.display())]
    FileWrite {
        /// Local path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// A remote operation failed.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),
    /// Streaming bytes from the remote side failed mid-transfer.
    #[error("transfer of '{path}' failed: {source}")]
    TransferIo {
        /// Remote path.
        path: String,
        /// Underlying error.
        source: io::Error,
    },
    /// The local tree could not be walked.
    #[error(transparent)]
    Walk(#[from] WalkError),
    /// A directory was named without recursion.
    #[error("'{path}' is a directory (use -r to copy recursively)")]
    IsDirectory {
        /// The directory.
        path: String,
    },
    /// A remote listing returned a name that is not a single path component.
    #[error("refusing entry {name:?} listed in remote directory '{directory}'")]
    UnsafeName {
        /// Directory whose listing carried the name.
        directory: String,
        /// The name as the server sent it.
        name: String,
    },
    /// The entry is neither a file nor a directory.
    #[error("skipping '{path}': not a regular file or directory")]
    Unsupported {
        /// The entry.
        path: String,
    },
}

/// Batch-level outcome of a failed synchronization.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Some entries failed; the report lists them.
    #[error("{} of {} entries failed to transfer", report.failures().len(), report.attempted())]
    Partial {
        /// Everything that happened, successes included.
        report: SyncReport,
    },
}

impl SyncError {
    /// The report carried by the error.
    #[must_use]
    pub fn report(&self) -> &SyncReport {
        match self {
            Self::Partial { report } => report,
        }
    }
}
