use std::path::PathBuf;

use thiserror::Error;

/// Credential discovery failures.
///
/// The error is cached and handed to every caller of
/// [`AuthResolver::resolve`](crate::AuthResolver::resolve), so underlying
/// causes are kept as strings.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum AuthError {
    /// The key file could not be read.
    #[error("unable to read private key '{}': {reason}", path.display())]
    KeyFileUnreadable {
        /// Key path.
        path: PathBuf,
        /// Operating system error.
        reason: String,
    },
    /// The file holds a public key.
    #[error("'{}' is a public key; pass the private key file instead", path.display())]
    KeyWrongType {
        /// Key path.
        path: PathBuf,
    },
    /// The private key is encrypted.
    #[error("private key '{}' is protected by a passphrase; load it into ssh-agent instead", path.display())]
    KeyPassphraseRequired {
        /// Key path.
        path: PathBuf,
    },
    /// The file is not a private key in any supported format.
    #[error("unable to parse private key '{}': {reason}", path.display())]
    KeyParseError {
        /// Key path.
        path: PathBuf,
        /// Parser error.
        reason: String,
    },
}

impl AuthError {
    /// Key path the error refers to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::KeyFileUnreadable { path, .. }
            | Self::KeyWrongType { path }
            | Self::KeyPassphraseRequired { path }
            | Self::KeyParseError { path, .. } => path,
        }
    }
}
