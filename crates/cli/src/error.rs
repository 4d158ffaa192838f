use std::io;
use std::path::PathBuf;

use config::ConfigError;
use connect::{ConnectError, DialError};
use known_hosts::HostKeyError;
use operand::OperandError;
use sync::SyncError;
use thiserror::Error;

use crate::exit_code::ExitCode;

/// Failures that end a client run.
#[derive(Debug, Error)]
pub enum CliError {
    /// Operands that do not describe a valid invocation.
    #[error("{0}")]
    Usage(String),
    /// A remote operand could not be parsed.
    #[error(transparent)]
    Operand(#[from] OperandError),
    /// The profile file or a default path failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// `--token-file` could not be read.
    #[error("failed to read token file '{}': {source}", path.display())]
    TokenFile {
        /// Token file path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// A local source does not exist or cannot be inspected.
    #[error("local source '{}' is not accessible: {source}", path.display())]
    LocalSource {
        /// Source as given on the command line.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// The async runtime could not be built.
    #[error("failed to start the async runtime: {0}")]
    Runtime(#[source] io::Error),
    /// Connecting or using the session failed.
    #[error(transparent)]
    Connect(#[from] ConnectError),
    /// Some entries of a copy failed.
    #[error(transparent)]
    Sync(#[from] SyncError),
}

impl CliError {
    /// Exit code reported for this failure.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Usage(_) | Self::Operand(_) => ExitCode::Syntax,
            Self::Config(_) | Self::TokenFile { .. } => ExitCode::Config,
            Self::LocalSource { .. } => ExitCode::FileIo,
            Self::Runtime(_) => ExitCode::StartClient,
            Self::Connect(error) => connect_exit_code(error),
            Self::Sync(_) => ExitCode::PartialTransfer,
        }
    }
}

fn connect_exit_code(error: &ConnectError) -> ExitCode {
    match error {
        ConnectError::Dial(DialError::Timeout { .. }) | ConnectError::Timeout { .. } => {
            ExitCode::Timeout
        }
        ConnectError::Dial(_)
        | ConnectError::Handshake(_)
        | ConnectError::Channel(_)
        | ConnectError::Sftp(_) => ExitCode::StartClient,
        ConnectError::Auth(_) | ConnectError::AuthenticationRejected { .. } => ExitCode::Auth,
        ConnectError::HostKey(HostKeyError::Store(_)) | ConnectError::Io(_) => ExitCode::FileIo,
        ConnectError::HostKey(_) => ExitCode::HostKey,
    }
}
