//! Where single files land.

use std::path::{Path, PathBuf};

use logging::Logger;
use operand::home_relative;
use tracing::debug;

use crate::remote::{self, RemoteFs};

/// Remote destination for a non-recursive upload of a file named
/// `source_name`.
///
/// Trailing slashes are ignored. An empty destination or `~` places the file
/// in the login directory under its own name. An existing remote directory
/// receives the file under its own name. Anything else is the target path.
pub async fn push_destination(fs: &dyn RemoteFs, requested: &str, source_name: &str) -> String {
    let trimmed = requested.trim_end_matches('/');
    if trimmed.is_empty() || trimmed == "~" {
        return source_name.to_owned();
    }
    let path = home_relative(trimmed);
    if fs.is_dir(path).await {
        remote::join(path, source_name)
    } else {
        path.to_owned()
    }
}

/// Destination for a second or later source: beside the first one.
#[must_use]
pub fn sibling_destination(first: &str, source_name: &str) -> String {
    remote::join(remote::dirname(first), source_name)
}

/// Local destination for a single downloaded file.
#[must_use]
pub fn pull_destination(local: &Path, remote_path: &str) -> PathBuf {
    if local.is_dir() {
        local.join(remote::basename(remote_path))
    } else {
        local.to_path_buf()
    }
}

/// Strips the home marker and resolves `path` on the server, keeping the
/// literal path when the server cannot resolve it.
pub async fn resolve_remote_root(fs: &dyn RemoteFs, path: &str, logger: &Logger) -> String {
    let path = home_relative(path);
    match fs.canonicalize(path).await {
        Ok(resolved) => resolved,
        Err(error) => {
            debug!(parent: logger.span(), "keeping literal remote path '{}': {}", path, error);
            path.to_owned()
        }
    }
}
