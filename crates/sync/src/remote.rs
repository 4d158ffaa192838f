//! crates/sync/src/remote.rs
//! Remote filesystem seam and `/`-separated path helpers.

use async_trait::async_trait;
use tokio::io::AsyncRead;
use walk::EntryKind;

use crate::error::RemoteError;

/// A byte stream reading a remote file.
pub type RemoteReader = Box<dyn AsyncRead + Send + Unpin>;

/// A remote directory entry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RemoteEntry {
    /// Name within its directory.
    pub name: String,
    /// Entry type.
    pub kind: EntryKind,
    /// Size in bytes, zero when unknown.
    pub len: u64,
}

/// Attributes of a remote path.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RemoteMetadata {
    /// Entry type.
    pub kind: EntryKind,
    /// Size in bytes, zero when unknown.
    pub len: u64,
}

/// Operations the sync engine needs from the remote side.
///
/// Paths are `/`-separated. A relative path is resolved against the remote
/// login directory and the empty path names that directory.
#[async_trait]
pub trait RemoteFs: Send + Sync {
    /// Creates one directory. Fails when it already exists.
    async fn create_dir(&self, path: &str) -> Result<(), RemoteError>;

    /// Creates or truncates `path` and writes `contents` to it.
    async fn write_file(&self, path: &str, contents: &[u8]) -> Result<(), RemoteError>;

    /// Opens `path` for reading.
    async fn open_read(&self, path: &str) -> Result<RemoteReader, RemoteError>;

    /// Lists a directory, without `.` and `..`, in no particular order.
    async fn read_dir(&self, path: &str) -> Result<Vec<RemoteEntry>, RemoteError>;

    /// Returns attributes of `path`, following symlinks.
    async fn metadata(&self, path: &str) -> Result<RemoteMetadata, RemoteError>;

    /// Resolves `path` to an absolute path.
    async fn canonicalize(&self, path: &str) -> Result<String, RemoteError>;

    /// Whether `path` exists and is a directory.
    async fn is_dir(&self, path: &str) -> bool {
        matches!(
            self.metadata(path).await,
            Ok(RemoteMetadata {
                kind: EntryKind::Directory,
                ..
            })
        )
    }
}

/// Joins two remote path fragments with a single `/`.
#[must_use]
pub fn join(base: &str, name: &str) -> String {
    if base.is_empty() {
        return name.to_owned();
    }
    if name.is_empty() {
        return base.to_owned();
    }
    if base.ends_with('/') {
        format!("{base}{name}")
    } else {
        format!("{base}/{name}")
    }
}

/// Whether a name reported by the server can be used as one local path
/// component.
///
/// Empty names, `.`, `..` and names carrying a separator are refused so a
/// listing cannot steer a download outside its destination.
#[must_use]
pub fn is_plain_name(name: &str) -> bool {
    let forbidden: &[char] = if cfg!(windows) {
        &['/', '\\', '\0', ':']
    } else {
        &['/', '\\', '\0']
    };
    !name.is_empty() && name != "." && name != ".." && !name.contains(forbidden)
}

/// Final segment of a remote path, ignoring trailing slashes.
#[must_use]
pub fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(index) => &trimmed[index + 1..],
        None => trimmed,
    }
}

/// Everything before the final segment, or `""` for a bare name.
#[must_use]
pub fn dirname(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) => "/",
        Some(index) => &trimmed[..index],
        None => "",
    }
}
