use std::path::{Path, PathBuf};

/// Which way bytes flow.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    /// Local to remote.
    Push,
    /// Remote to local.
    Pull,
}

/// What to do after a node fails.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FailurePolicy {
    /// Record the failure and carry on with the rest of the batch.
    #[default]
    Continue,
    /// Stop at the first failure.
    Abort,
}

/// One synchronization request.
///
/// For a push `local_root` is the source and `remote_root` the destination;
/// for a pull the roles swap.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SyncTask {
    direction: Direction,
    local_root: PathBuf,
    remote_root: String,
    recursive: bool,
    failure_policy: FailurePolicy,
}

impl SyncTask {
    /// Uploads `local_root` to `remote_root`.
    #[must_use]
    pub fn push(local_root: impl Into<PathBuf>, remote_root: impl Into<String>) -> Self {
        Self::new(Direction::Push, local_root.into(), remote_root.into())
    }

    /// Downloads `remote_root` (a path or glob) into `local_root`.
    #[must_use]
    pub fn pull(remote_root: impl Into<String>, local_root: impl Into<PathBuf>) -> Self {
        Self::new(Direction::Pull, local_root.into(), remote_root.into())
    }

    fn new(direction: Direction, local_root: PathBuf, remote_root: String) -> Self {
        Self {
            direction,
            local_root,
            remote_root,
            recursive: false,
            failure_policy: FailurePolicy::default(),
        }
    }

    /// Descends into directories.
    #[must_use]
    pub const fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Sets the failure policy.
    #[must_use]
    pub const fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Transfer direction.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Local side of the transfer.
    #[must_use]
    pub fn local_root(&self) -> &Path {
        &self.local_root
    }

    /// Remote side of the transfer.
    #[must_use]
    pub fn remote_root(&self) -> &str {
        &self.remote_root
    }

    /// Whether directories are descended into.
    #[must_use]
    pub const fn is_recursive(&self) -> bool {
        self.recursive
    }

    /// Configured failure policy.
    #[must_use]
    pub const fn policy(&self) -> FailurePolicy {
        self.failure_policy
    }
}
