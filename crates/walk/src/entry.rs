use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// Kind of filesystem object an entry refers to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryKind {
    /// A directory.
    Directory,
    /// A regular file.
    File,
    /// A symbolic link; never followed by the walker.
    Symlink,
    /// Sockets, fifos and devices.
    Other,
}

impl EntryKind {
    pub(crate) fn of(file_type: fs::FileType) -> Self {
        if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::File
        } else if file_type.is_symlink() {
            Self::Symlink
        } else {
            Self::Other
        }
    }
}

/// One step of a traversal.
#[derive(Clone, Debug)]
pub struct WalkEntry {
    pub(crate) full_path: PathBuf,
    pub(crate) relative_path: PathBuf,
    pub(crate) kind: EntryKind,
    pub(crate) len: u64,
    pub(crate) depth: usize,
}

impl WalkEntry {
    /// Absolute path of the entry.
    #[must_use]
    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    /// Path relative to the traversal root; empty for the root itself.
    #[must_use]
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Kind of the entry, without following symlinks.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Reports whether the entry is a directory.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }

    /// Size in bytes reported by `lstat`.
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.len
    }

    /// Depth below the root (root depth is `0`).
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Indicates whether this entry is the traversal root.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.depth == 0
    }

    /// Final component of the relative path; `None` for the root.
    #[must_use]
    pub fn file_name(&self) -> Option<&OsStr> {
        if self.is_root() {
            None
        } else {
            self.relative_path.file_name()
        }
    }
}
