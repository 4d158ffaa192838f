use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures reading or appending the known-hosts file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store exists but could not be read.
    #[error("failed to read known hosts '{}': {source}", path.display())]
    Read {
        /// Store path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// A parent directory could not be created.
    #[error("failed to create directory '{}': {source}", path.display())]
    CreateDir {
        /// Directory path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// A record could not be appended.
    #[error("failed to write known hosts '{}': {source}", path.display())]
    Write {
        /// Store path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
}

/// Reasons a host key is not trusted.
#[derive(Debug, Error)]
pub enum HostKeyError {
    /// The peer address normalized to nothing.
    #[error("invalid host identifier '{0}'")]
    InvalidHost(String),
    /// A key could not be decoded.
    #[error("malformed host key: {0}")]
    MalformedKey(String),
    /// The host is known under a different key.
    #[error(
        "host key for '{host}' does not match the record in '{}' ({algorithm} {fingerprint}); \
         someone may be intercepting the connection",
        store.display()
    )]
    Mismatch {
        /// Normalized host.
        host: String,
        /// Algorithm of the presented key.
        algorithm: String,
        /// Fingerprint of the presented key.
        fingerprint: String,
        /// Store holding the conflicting record.
        store: PathBuf,
    },
    /// The user did not accept an unknown host.
    #[error("host key for '{host}' was not accepted")]
    Declined {
        /// Normalized host.
        host: String,
    },
    /// The prompt could not be shown or answered.
    #[error("failed to read host key confirmation: {0}")]
    Prompt(#[source] io::Error),
    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
