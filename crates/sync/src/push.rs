//! crates/sync/src/push.rs
//! Local to remote transfers.

use std::path::{Component, Path};

use logging::Logger;
use tracing::{debug, warn};
use walk::{EntryKind, WalkBuilder};

use crate::destination::resolve_remote_root;
use crate::error::{RemoteError, TransferError};
use crate::remote::{self, RemoteFs};
use crate::report::{PathMapping, SyncFailure, SyncReport};
use crate::task::FailurePolicy;

/// Drives one upload batch and accumulates its report.
pub(crate) struct Push<'a> {
    fs: &'a dyn RemoteFs,
    policy: FailurePolicy,
    logger: &'a Logger,
    report: SyncReport,
    failed_dirs: Vec<String>,
}

impl<'a> Push<'a> {
    pub(crate) fn new(fs: &'a dyn RemoteFs, policy: FailurePolicy, logger: &'a Logger) -> Self {
        Self {
            fs,
            policy,
            logger,
            report: SyncReport::default(),
            failed_dirs: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> SyncReport {
        self.report
    }

    /// Whether the batch has stopped.
    pub(crate) const fn stopped(&self) -> bool {
        self.report.aborted()
    }

    /// Uploads the tree under `local_root` into
    /// `remote_root/<name of local_root>`.
    pub(crate) async fn tree(&mut self, local_root: &Path, remote_root: &str) {
        let base = match base_name(local_root).await {
            Some(base) => base,
            None => {
                let error = std::io::Error::other("source has no final path component");
                self.fail(
                    local_root.display().to_string(),
                    TransferError::FileRead {
                        path: local_root.to_path_buf(),
                        source: error,
                    },
                );
                return;
            }
        };
        let remote_root = resolve_remote_root(self.fs, remote_root, self.logger).await;
        let destination_base = remote::join(&remote_root, &base);
        debug!(
            parent: self.logger.span(),
            "pushing {} to {}", local_root.display(), destination_base
        );

        let walker = match WalkBuilder::new(local_root)
            .logger(self.logger.clone())
            .build()
        {
            Ok(walker) => walker,
            Err(error) => {
                self.fail(local_root.display().to_string(), error.into());
                return;
            }
        };

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    let source = error
                        .path()
                        .unwrap_or(local_root)
                        .display()
                        .to_string();
                    self.fail(source, error.into());
                    if self.stopped() {
                        return;
                    }
                    continue;
                }
            };

            let relative = remote_relative(entry.relative_path());
            let destination = remote::join(&destination_base, &relative);
            let source = entry.full_path().display().to_string();
            match entry.kind() {
                EntryKind::Directory => {
                    self.report
                        .record_mapping(PathMapping::new(&source, &destination, true));
                    self.make_dir(&destination).await;
                }
                EntryKind::File => {
                    self.report
                        .record_mapping(PathMapping::new(&source, &destination, false));
                    if let Err(error) = self.upload(entry.full_path(), &destination).await {
                        self.fail(source, error);
                    }
                }
                EntryKind::Symlink if entry.full_path().is_file() => {
                    self.report
                        .record_mapping(PathMapping::new(&source, &destination, false));
                    if let Err(error) = self.upload(entry.full_path(), &destination).await {
                        self.fail(source, error);
                    }
                }
                EntryKind::Symlink | EntryKind::Other => {
                    warn!(
                        parent: self.logger.span(),
                        "skipping '{}': not a regular file or directory", source
                    );
                }
            }
            if self.stopped() {
                return;
            }
        }
    }

    /// Uploads one file to an already resolved destination.
    pub(crate) async fn file(&mut self, local: &Path, destination: &str) {
        let source = local.display().to_string();
        if local.is_dir() {
            self.fail(source.clone(), TransferError::IsDirectory { path: source });
            return;
        }
        self.report
            .record_mapping(PathMapping::new(&source, destination, false));
        if let Err(error) = self.upload(local, destination).await {
            self.fail(source, error);
        }
    }

    /// Creates a remote directory. Failures are logged and remembered so a
    /// later file failure beneath it can be attributed to it.
    async fn make_dir(&mut self, destination: &str) {
        match self.fs.create_dir(destination).await {
            Ok(()) => {
                debug!(parent: self.logger.span(), "created remote directory {}", destination);
                self.report.record_directory();
            }
            Err(_) if self.fs.is_dir(destination).await => {
                debug!(parent: self.logger.span(), "remote directory {} already exists", destination);
            }
            Err(error) => {
                debug!(
                    parent: self.logger.span(),
                    "could not create remote directory {}: {}", destination, error
                );
                self.failed_dirs.push(destination.to_owned());
            }
        }
    }

    async fn upload(&mut self, local: &Path, destination: &str) -> Result<(), TransferError> {
        let contents = tokio::fs::read(local)
            .await
            .map_err(|source| TransferError::FileRead {
                path: local.to_path_buf(),
                source,
            })?;
        self.fs
            .write_file(destination, &contents)
            .await
            .map_err(|error| self.attribute(destination, error))?;
        debug!(
            parent: self.logger.span(),
            "uploaded {} ({} bytes)", destination, contents.len()
        );
        self.report.record_file(contents.len() as u64);
        Ok(())
    }

    fn attribute(&self, destination: &str, error: RemoteError) -> TransferError {
        let failed_parent = self.failed_dirs.iter().find(|directory| {
            destination
                .strip_prefix(directory.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
        });
        match failed_parent {
            Some(directory) => TransferError::RemoteDirCreateHard {
                path: destination.to_owned(),
                directory: directory.clone(),
                source: error,
            },
            None => TransferError::Remote(error),
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

/// Final component of `path`, resolving `.` and `..` through the filesystem.
pub(crate) async fn base_name(path: &Path) -> Option<String> {
    if let Some(name) = path.file_name() {
        return Some(name.to_string_lossy().into_owned());
    }
    tokio::fs::canonicalize(path)
        .await
        .ok()?
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

/// Renders a walk-relative path with `/` separators.
pub(crate) fn remote_relative(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
