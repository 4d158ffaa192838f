//! [`RemoteFs`] over an SFTP session.

use async_trait::async_trait;
use russh_sftp::client::SftpSession;
use russh_sftp::client::error::Error as SftpError;
use russh_sftp::protocol::{FileType, StatusCode};
use tokio::io::AsyncWriteExt;
use walk::EntryKind;

use crate::error::{RemoteError, RemoteErrorKind};
use crate::remote::{RemoteEntry, RemoteFs, RemoteMetadata, RemoteReader};

/// SFTP-backed remote filesystem.
pub struct SftpFs {
    session: SftpSession,
}

impl SftpFs {
    /// Wraps an open SFTP session.
    #[must_use]
    pub fn new(session: SftpSession) -> Self {
        Self { session }
    }

    /// Ends the SFTP session.
    pub async fn close(self) -> Result<(), RemoteError> {
        self.session
            .close()
            .await
            .map_err(|error| remote_error("", &error))
    }
}

/// SFTP resolves relative paths against the login directory; `.` names it.
fn wire_path(path: &str) -> String {
    if path.is_empty() {
        ".".to_owned()
    } else {
        path.to_owned()
    }
}

fn remote_error(path: &str, error: &SftpError) -> RemoteError {
    let kind = match error {
        SftpError::Status(status) => match status.status_code {
            StatusCode::NoSuchFile => RemoteErrorKind::NotFound,
            StatusCode::PermissionDenied => RemoteErrorKind::PermissionDenied,
            _ => RemoteErrorKind::Other,
        },
        _ => RemoteErrorKind::Other,
    };
    RemoteError::new(kind, path, error.to_string())
}

const fn entry_kind(file_type: FileType) -> EntryKind {
    match file_type {
        FileType::Dir => EntryKind::Directory,
        FileType::File => EntryKind::File,
        FileType::Symlink => EntryKind::Symlink,
        FileType::Other => EntryKind::Other,
    }
}

#[async_trait]
impl RemoteFs for SftpFs {
    async fn create_dir(&self, path: &str) -> Result<(), RemoteError> {
        self.session
            .create_dir(wire_path(path))
            .await
            .map_err(|error| remote_error(path, &error))
    }

    async fn write_file(&self, path: &str, contents: &[u8]) -> Result<(), RemoteError> {
        let io_error =
            |error: std::io::Error| RemoteError::new(RemoteErrorKind::Other, path, error.to_string());
        let mut file = self
            .session
            .create(wire_path(path))
            .await
            .map_err(|error| remote_error(path, &error))?;
        file.write_all(contents).await.map_err(io_error)?;
        file.flush().await.map_err(io_error)?;
        file.shutdown().await.map_err(io_error)
    }

    async fn open_read(&self, path: &str) -> Result<RemoteReader, RemoteError> {
        let file = self
            .session
            .open(wire_path(path))
            .await
            .map_err(|error| remote_error(path, &error))?;
        Ok(Box::new(file))
    }

    async fn read_dir(&self, path: &str) -> Result<Vec<RemoteEntry>, RemoteError> {
        let entries = self
            .session
            .read_dir(wire_path(path))
            .await
            .map_err(|error| remote_error(path, &error))?;
        Ok(entries
            .filter(|entry| !matches!(entry.file_name().as_str(), "." | ".."))
            .map(|entry| RemoteEntry {
                name: entry.file_name(),
                kind: entry_kind(entry.file_type()),
                len: entry.metadata().len(),
            })
            .collect())
    }

    async fn metadata(&self, path: &str) -> Result<RemoteMetadata, RemoteError> {
        let attributes = self
            .session
            .metadata(wire_path(path))
            .await
            .map_err(|error| remote_error(path, &error))?;
        Ok(RemoteMetadata {
            kind: entry_kind(attributes.file_type()),
            len: attributes.len(),
        })
    }

    async fn canonicalize(&self, path: &str) -> Result<String, RemoteError> {
        self.session
            .canonicalize(wire_path(path))
            .await
            .map_err(|error| remote_error(path, &error))
    }
}
