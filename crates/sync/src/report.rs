use std::fmt;

use crate::error::TransferError;

/// One source node and where it lands.
///
/// Local paths are rendered with [`Path::display`](std::path::Path::display);
/// remote paths use `/` separators.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PathMapping {
    source: String,
    destination: String,
    is_directory: bool,
}

impl PathMapping {
    /// Creates a mapping.
    #[must_use]
    pub fn new(source: impl Into<String>, destination: impl Into<String>, is_directory: bool) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            is_directory,
        }
    }

    /// Source path.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Destination path.
    #[must_use]
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Whether the node is a directory.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        self.is_directory
    }
}

impl fmt::Display for PathMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.destination)
    }
}

/// A node that failed to transfer.
#[derive(Debug)]
pub struct SyncFailure {
    source: String,
    error: TransferError,
}

impl SyncFailure {
    pub(crate) fn new(source: impl Into<String>, error: TransferError) -> Self {
        Self {
            source: source.into(),
            error,
        }
    }

    /// Source path of the failed node.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Why it failed.
    #[must_use]
    pub const fn error(&self) -> &TransferError {
        &self.error
    }
}

/// What a synchronization run did.
#[derive(Debug, Default)]
pub struct SyncReport {
    mappings: Vec<PathMapping>,
    directories_created: u64,
    files_transferred: u64,
    bytes_transferred: u64,
    failures: Vec<SyncFailure>,
    aborted: bool,
}

impl SyncReport {
    /// Every mapping generated, in visit order.
    #[must_use]
    pub fn mappings(&self) -> &[PathMapping] {
        &self.mappings
    }

    /// Number of nodes attempted.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.mappings.len()
    }

    /// Directories created at the destination.
    #[must_use]
    pub const fn directories_created(&self) -> u64 {
        self.directories_created
    }

    /// Files written at the destination.
    #[must_use]
    pub const fn files_transferred(&self) -> u64 {
        self.files_transferred
    }

    /// Payload bytes written.
    #[must_use]
    pub const fn bytes_transferred(&self) -> u64 {
        self.bytes_transferred
    }

    /// Failed nodes, in visit order.
    #[must_use]
    pub fn failures(&self) -> &[SyncFailure] {
        &self.failures
    }

    /// Whether the batch stopped at the first failure.
    #[must_use]
    pub const fn aborted(&self) -> bool {
        self.aborted
    }

    /// Whether every node transferred.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn record_mapping(&mut self, mapping: PathMapping) {
        self.mappings.push(mapping);
    }

    pub(crate) fn record_directory(&mut self) {
        self.directories_created += 1;
    }

    pub(crate) fn record_file(&mut self, bytes: u64) {
        self.files_transferred += 1;
        self.bytes_transferred += bytes;
    }

    pub(crate) fn record_failure(&mut self, failure: SyncFailure) {
        self.failures.push(failure);
    }

    pub(crate) fn mark_aborted(&mut self) {
        self.aborted = true;
    }
}
