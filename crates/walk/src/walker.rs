use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use logging::Logger;
use tracing::debug;

use crate::entry::{EntryKind, WalkEntry};
use crate::error::WalkError;

/// Depth-first iterator over a local tree.
pub struct Walker {
    root_entry: Option<WalkEntry>,
    stack: Vec<DirectoryState>,
    pending: Option<WalkError>,
    logger: Logger,
}

impl Walker {
    pub(crate) fn new(root: PathBuf, include_root: bool, logger: Logger) -> Result<Self, WalkError> {
        let root = absolutize(root)?;
        debug!(parent: logger.span(), "walking {}", root.display());

        let metadata = fs::symlink_metadata(&root).map_err(|source| WalkError::Root {
            path: root.clone(),
            source,
        })?;
        let kind = EntryKind::of(metadata.file_type());

        let mut walker = Self {
            root_entry: None,
            stack: Vec::new(),
            pending: None,
            logger,
        };

        if kind == EntryKind::Directory {
            let state = DirectoryState::read(root.clone(), PathBuf::new(), 0)?;
            walker.stack.push(state);
        }

        if include_root {
            walker.root_entry = Some(WalkEntry {
                full_path: root,
                relative_path: PathBuf::new(),
                kind,
                len: metadata.len(),
                depth: 0,
            });
        }

        Ok(walker)
    }

    fn prepare_entry(
        &mut self,
        full_path: PathBuf,
        relative_path: PathBuf,
        depth: usize,
    ) -> Result<WalkEntry, WalkError> {
        let metadata = fs::symlink_metadata(&full_path).map_err(|source| WalkError::Metadata {
            path: full_path.clone(),
            source,
        })?;
        let kind = EntryKind::of(metadata.file_type());

        if kind == EntryKind::Directory {
            match DirectoryState::read(full_path.clone(), relative_path.clone(), depth) {
                Ok(state) => {
                    debug!(
                        parent: self.logger.span(),
                        "entering {} ({} entries)",
                        full_path.display(),
                        state.entries.len()
                    );
                    self.stack.push(state);
                }
                Err(error) => self.pending = Some(error),
            }
        }

        Ok(WalkEntry {
            full_path,
            relative_path,
            kind,
            len: metadata.len(),
            depth,
        })
    }
}

impl Iterator for Walker {
    type Item = Result<WalkEntry, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.root_entry.take() {
            return Some(Ok(root));
        }

        if let Some(error) = self.pending.take() {
            return Some(Err(error));
        }

        loop {
            let state = self.stack.last_mut()?;
            let Some(name) = state.next_name() else {
                self.stack.pop();
                continue;
            };

            let full_path = state.fs_path.join(&name);
            let relative_path = state.relative_prefix.join(&name);
            let depth = state.depth + 1;
            return Some(self.prepare_entry(full_path, relative_path, depth));
        }
    }
}

struct DirectoryState {
    fs_path: PathBuf,
    relative_prefix: PathBuf,
    entries: Vec<OsString>,
    index: usize,
    depth: usize,
}

impl DirectoryState {
    fn read(fs_path: PathBuf, relative_prefix: PathBuf, depth: usize) -> Result<Self, WalkError> {
        let read_error = |source| WalkError::ReadDir {
            path: fs_path.clone(),
            source,
        };
        let mut entries = fs::read_dir(&fs_path)
            .map_err(read_error)?
            .map(|entry| entry.map(|entry| entry.file_name()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_error)?;
        entries.sort();

        Ok(Self {
            fs_path,
            relative_prefix,
            entries,
            index: 0,
            depth,
        })
    }

    fn next_name(&mut self) -> Option<OsString> {
        let name = self.entries.get(self.index)?.clone();
        self.index += 1;
        Some(name)
    }
}

fn absolutize(path: PathBuf) -> Result<PathBuf, WalkError> {
    if path.is_absolute() {
        Ok(path)
    } else {
        let cwd = env::current_dir().map_err(WalkError::CurrentDir)?;
        Ok(cwd.join(path))
    }
}
