use std::io;
use std::time::Duration;

use auth::AuthError;
use known_hosts::HostKeyError;
use thiserror::Error;

/// Failures producing a byte stream to the target.
#[derive(Debug, Error)]
pub enum DialError {
    /// The dial did not complete in time.
    #[error("timed out after {}s dialing '{identity}'", after.as_secs())]
    Timeout {
        /// Target identity.
        identity: String,
        /// Configured limit.
        after: Duration,
    },
    /// A TCP connection could not be opened.
    #[error("failed to connect to '{address}': {source}")]
    Connect {
        /// Address dialed.
        address: String,
        /// Underlying error.
        source: io::Error,
    },
    /// The proxy command is empty.
    #[error("proxy command is empty")]
    EmptyCommand,
    /// A value substituted into the proxy command carries characters the
    /// shell would interpret.
    #[error(
        "refusing to substitute {value:?} for %{placeholder} in the proxy command: \
         only letters, digits, '.', '-', '_' and ':' are allowed"
    )]
    UnsafeSubstitution {
        /// Placeholder letter.
        placeholder: char,
        /// Rejected value.
        value: String,
    },
    /// The proxy command could not be started.
    #[error("failed to start proxy command '{command}': {source}")]
    Spawn {
        /// Command line after substitution.
        command: String,
        /// Underlying error.
        source: io::Error,
    },
}

/// Failures establishing or using a session.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Dialing failed.
    #[error(transparent)]
    Dial(#[from] DialError),
    /// Credentials could not be resolved.
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// The server key was not trusted.
    #[error(transparent)]
    HostKey(#[from] HostKeyError),
    /// Every credential was refused.
    #[error("permission denied for '{user}': no credential was accepted")]
    AuthenticationRejected {
        /// Login user.
        user: String,
    },
    /// The key exchange or transport failed.
    #[error("ssh handshake failed: {0}")]
    Handshake(#[source] russh::Error),
    /// The handshake or authentication did not complete in time.
    #[error("timed out after {}s during {stage}", after.as_secs())]
    Timeout {
        /// Stage that timed out.
        stage: &'static str,
        /// Configured limit.
        after: Duration,
    },
    /// A channel request failed.
    #[error("ssh channel error: {0}")]
    Channel(#[source] russh::Error),
    /// The SFTP subsystem failed to start.
    #[error("sftp subsystem failed: {0}")]
    Sftp(#[from] russh_sftp::client::error::Error),
    /// Local terminal or stream I/O failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}
