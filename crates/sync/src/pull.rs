//! crates/sync/src/pull.rs
//! Remote to local transfers.

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};

use logging::Logger;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use walk::EntryKind;

use crate::destination::pull_destination;
use crate::error::TransferError;
use crate::remote::{self, RemoteEntry, RemoteFs};
use crate::report::{PathMapping, SyncFailure, SyncReport};
use crate::task::FailurePolicy;

/// A remote directory whose children are still to be visited.
struct PendingDirectory {
    remote: String,
    local: PathBuf,
    entries: VecDeque<RemoteEntry>,
}

/// Drives one download batch and accumulates its report.
pub(crate) struct Pull<'a> {
    fs: &'a dyn RemoteFs,
    policy: FailurePolicy,
    logger: &'a Logger,
    report: SyncReport,
}

impl<'a> Pull<'a> {
    pub(crate) fn new(fs: &'a dyn RemoteFs, policy: FailurePolicy, logger: &'a Logger) -> Self {
        Self {
            fs,
            policy,
            logger,
            report: SyncReport::default(),
        }
    }

    pub(crate) fn finish(self) -> SyncReport {
        self.report
    }

    pub(crate) const fn stopped(&self) -> bool {
        self.report.aborted()
    }

    /// Downloads one resolved remote root into `local_root`.
    pub(crate) async fn root(&mut self, remote_root: &str, local_root: &Path, recursive: bool) {
        let metadata = match self.fs.metadata(remote_root).await {
            Ok(metadata) => metadata,
            Err(error) => {
                self.fail(remote_root.to_owned(), error.into());
                return;
            }
        };

        match metadata.kind {
            EntryKind::Directory if recursive => self.tree(remote_root, local_root).await,
            EntryKind::Directory => self.fail(
                remote_root.to_owned(),
                TransferError::IsDirectory {
                    path: remote_root.to_owned(),
                },
            ),
            EntryKind::File => {
                let destination = pull_destination(local_root, remote_root);
                self.file(remote_root, &destination).await;
            }
            EntryKind::Symlink | EntryKind::Other => self.fail(
                remote_root.to_owned(),
                TransferError::Unsupported {
                    path: remote_root.to_owned(),
                },
            ),
        }
    }

    /// Mirrors the remote directory `remote_root` as
    /// `local_root/<name of remote_root>`, depth first in name order.
    async fn tree(&mut self, remote_root: &str, local_root: &Path) {
        let local_base = local_root.join(remote::basename(remote_root));
        debug!(
            parent: self.logger.span(),
            "pulling {} to {}", remote_root, local_base.display()
        );
        self.report.record_mapping(PathMapping::new(
            remote_root,
            local_base.display().to_string(),
            true,
        ));
        if !self.make_local_dir(remote_root, &local_base).await {
            return;
        }

        let mut stack = Vec::new();
        match self.listing(remote_root).await {
            Some(entries) => stack.push(PendingDirectory {
                remote: remote_root.to_owned(),
                local: local_base,
                entries,
            }),
            None => return,
        }

        while let Some(current) = stack.last_mut() {
            let Some(entry) = current.entries.pop_front() else {
                stack.pop();
                continue;
            };
            if !remote::is_plain_name(&entry.name) {
                let error = TransferError::UnsafeName {
                    directory: current.remote.clone(),
                    name: entry.name,
                };
                let source = current.remote.clone();
                self.fail(source, error);
                if self.stopped() {
                    return;
                }
                continue;
            }
            let remote_path = remote::join(&current.remote, &entry.name);
            let local_path = current.local.join(&entry.name);

            let kind = match entry.kind {
                EntryKind::Symlink => match self.fs.metadata(&remote_path).await {
                    Ok(target) if target.kind == EntryKind::File => EntryKind::File,
                    _ => EntryKind::Symlink,
                },
                kind => kind,
            };

            match kind {
                EntryKind::Directory => {
                    self.report.record_mapping(PathMapping::new(
                        &remote_path,
                        local_path.display().to_string(),
                        true,
                    ));
                    if self.make_local_dir(&remote_path, &local_path).await {
                        if let Some(entries) = self.listing(&remote_path).await {
                            stack.push(PendingDirectory {
                                remote: remote_path,
                                local: local_path,
                                entries,
                            });
                        }
                    }
                }
                EntryKind::File => self.file(&remote_path, &local_path).await,
                EntryKind::Symlink | EntryKind::Other => {
                    warn!(
                        parent: self.logger.span(),
                        "skipping '{}': not a regular file or directory", remote_path
                    );
                }
            }
            if self.stopped() {
                return;
            }
        }
    }

    /// Downloads one file to `destination`.
    async fn file(&mut self, remote_path: &str, destination: &Path) {
        self.report.record_mapping(PathMapping::new(
            remote_path,
            destination.display().to_string(),
            false,
        ));
        match self.download(remote_path, destination).await {
            Ok(bytes) => {
                debug!(
                    parent: self.logger.span(),
                    "downloaded {} ({} bytes)", remote_path, bytes
                );
                self.report.record_file(bytes);
            }
            Err(error) => self.fail(remote_path.to_owned(), error),
        }
    }

    async fn download(&self, remote_path: &str, destination: &Path) -> Result<u64, TransferError> {
        let mut reader = self.fs.open_read(remote_path).await?;
        let write_error = |source: io::Error| TransferError::FileWrite {
            path: destination.to_path_buf(),
            source,
        };
        let mut file = tokio::fs::File::create(destination)
            .await
            .map_err(write_error)?;
        let bytes = tokio::io::copy(&mut reader, &mut file)
            .await
            .map_err(|source| TransferError::TransferIo {
                path: remote_path.to_owned(),
                source,
            })?;
        file.flush().await.map_err(write_error)?;
        Ok(bytes)
    }

    /// Creates a local directory; an existing one is fine.
    async fn make_local_dir(&mut self, remote_path: &str, local: &Path) -> bool {
        match tokio::fs::create_dir(local).await {
            Ok(()) => {
                self.report.record_directory();
                true
            }
            Err(_) if local.is_dir() => true,
            Err(source) => {
                self.fail(
                    remote_path.to_owned(),
                    TransferError::FileWrite {
                        path: local.to_path_buf(),
                        source,
                    },
                );
                false
            }
        }
    }

    async fn listing(&mut self, remote_path: &str) -> Option<VecDeque<RemoteEntry>> {
        match self.fs.read_dir(remote_path).await {
            Ok(mut entries) => {
                entries.sort_by(|left, right| left.name.cmp(&right.name));
                Some(entries.into())
            }
            Err(error) => {
                self.fail(remote_path.to_owned(), error.into());
                None
            }
        }
    }

    fn fail(&mut self, source: String, error: TransferError) {
        warn!(parent: self.logger.span(), "{}", error);
        self.report.record_failure(SyncFailure::new(source, error));
        if self.policy == FailurePolicy::Abort {
            self.report.mark_aborted();
        }
    }
}
