//! crates/sync/src/engine.rs
//! Batch entry points.

use std::path::{Path, PathBuf};

use logging::Logger;
use operand::home_relative;
use tracing::info;

use crate::destination::{push_destination, resolve_remote_root, sibling_destination};
use crate::error::SyncError;
use crate::expand::expand;
use crate::pull::Pull;
use crate::push::{Push, base_name};
use crate::remote::RemoteFs;
use crate::report::SyncReport;
use crate::task::{Direction, FailurePolicy, SyncTask};

/// Runs synchronization batches against one remote filesystem.
pub struct SyncEngine<'a> {
    fs: &'a dyn RemoteFs,
    logger: Logger,
}

impl<'a> SyncEngine<'a> {
    /// Creates an engine over `fs`.
    #[must_use]
    pub fn new(fs: &'a dyn RemoteFs) -> Self {
        Self {
            fs,
            logger: Logger::disabled(),
        }
    }

    /// Attributes transfer events to `logger`.
    #[must_use]
    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Executes `task`.
    ///
    /// Returns the report when every node transferred and
    /// [`SyncError::Partial`] otherwise.
    pub async fn run(&self, task: &SyncTask) -> Result<SyncReport, SyncError> {
        let report = match task.direction() {
            Direction::Push => {
                let mut push = Push::new(self.fs, task.policy(), &self.logger);
                if task.is_recursive() {
                    push.tree(task.local_root(), task.remote_root()).await;
                } else {
                    self.push_single(&mut push, task.local_root(), task.remote_root())
                        .await;
                }
                push.finish()
            }
            Direction::Pull => self.pull(task).await,
        };
        self.conclude(report)
    }

    /// Uploads several local sources to one remote destination.
    ///
    /// Recursive uploads place each source under `destination`. Otherwise
    /// the first source follows the destination policy of
    /// [`push_destination`] and the rest land beside it.
    pub async fn push_sources(
        &self,
        sources: &[PathBuf],
        destination: &str,
        recursive: bool,
        policy: FailurePolicy,
    ) -> Result<SyncReport, SyncError> {
        let mut push = Push::new(self.fs, policy, &self.logger);
        let mut first_destination: Option<String> = None;
        for source in sources {
            if recursive {
                push.tree(source, destination).await;
            } else {
                let Some(name) = base_name(source).await else {
                    push.file(source, home_relative(destination)).await;
                    continue;
                };
                let target = match &first_destination {
                    Some(first) => sibling_destination(first, &name),
                    None => push_destination(self.fs, destination, &name).await,
                };
                push.file(source, &target).await;
                first_destination.get_or_insert(target);
            }
            if push.stopped() {
                break;
            }
        }
        self.conclude(push.finish())
    }

    async fn push_single(&self, push: &mut Push<'_>, source: &Path, destination: &str) {
        match base_name(source).await {
            Some(name) => {
                let target = push_destination(self.fs, destination, &name).await;
                push.file(source, &target).await;
            }
            None => push.file(source, home_relative(destination)).await,
        }
    }

    async fn pull(&self, task: &SyncTask) -> SyncReport {
        let mut pull = Pull::new(self.fs, task.policy(), &self.logger);
        let pattern = home_relative(task.remote_root());
        for root in expand(self.fs, pattern, &self.logger).await {
            let resolved = resolve_remote_root(self.fs, &root, &self.logger).await;
            pull.root(&resolved, task.local_root(), task.is_recursive())
                .await;
            if pull.stopped() {
                break;
            }
        }
        pull.finish()
    }

    fn conclude(&self, report: SyncReport) -> Result<SyncReport, SyncError> {
        info!(
            parent: self.logger.span(),
            "{} file(s), {} bytes, {} director(ies) created, {} failure(s)",
            report.files_transferred(),
            report.bytes_transferred(),
            report.directories_created(),
            report.failures().len()
        );
        if report.is_complete() {
            Ok(report)
        } else {
            Err(SyncError::Partial { report })
        }
    }
}

/// Runs `task` against `fs` with logging disabled.
pub async fn sync(task: &SyncTask, fs: &dyn RemoteFs) -> Result<SyncReport, SyncError> {
    SyncEngine::new(fs).run(task).await
}
