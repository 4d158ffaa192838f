use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The profile file exists but could not be read.
    #[error("failed to read config '{}': {source}", path.display())]
    Read {
        /// Profile file path.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// The profile file is not a JSON object of profiles.
    #[error("malformed config '{}': {source}", path.display())]
    Parse {
        /// Profile file path.
        path: PathBuf,
        /// Parser error.
        source: serde_json::Error,
    },
    /// A default path needs a directory the platform does not report.
    #[error("cannot determine the {0} directory; pass the path explicitly")]
    MissingDirectory(&'static str),
}
