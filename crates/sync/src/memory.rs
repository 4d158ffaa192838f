//! In-memory [`RemoteFs`] for exercising the engine without a server.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Cursor;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use walk::EntryKind;

use crate::error::{RemoteError, RemoteErrorKind};
use crate::remote::{RemoteEntry, RemoteFs, RemoteMetadata, RemoteReader};

#[derive(Clone, Debug)]
enum Node {
    Directory,
    File(Vec<u8>),
}

#[derive(Debug, Default)]
struct State {
    nodes: BTreeMap<String, Node>,
    denied: BTreeSet<String>,
    mkdir_calls: Vec<String>,
}

/// A remote filesystem held in memory.
///
/// Paths behave like a POSIX server: relative paths resolve against the home
/// directory, `.` and `..` are collapsed, and a path is writable only when
/// its parent directory exists.
#[derive(Debug)]
pub struct MemoryFs {
    home: String,
    state: Mutex<State>,
}

impl MemoryFs {
    /// Creates a filesystem whose home is `/home/user`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_home("/home/user")
    }

    /// Creates a filesystem with the given absolute home directory.
    #[must_use]
    pub fn with_home(home: &str) -> Self {
        let fs = Self {
            home: normalize("/", home),
            state: Mutex::new(State::default()),
        };
        fs.add_dir(&fs.home.clone());
        fs
    }

    /// Home directory.
    #[must_use]
    pub fn home(&self) -> &str {
        &self.home
    }

    /// Creates `path` and any missing ancestors.
    pub fn add_dir(&self, path: &str) {
        let path = self.resolve(path);
        let mut state = self.lock();
        let mut current = String::new();
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            current.push('/');
            current.push_str(segment);
            state.nodes.entry(current.clone()).or_insert(Node::Directory);
        }
        state.nodes.entry("/".to_owned()).or_insert(Node::Directory);
    }

    /// Creates a file, adding missing ancestors.
    pub fn add_file(&self, path: &str, contents: impl Into<Vec<u8>>) {
        let path = self.resolve(path);
        self.add_dir(parent(&path));
        self.lock().nodes.insert(path, Node::File(contents.into()));
    }

    /// Makes every write at or below `path` fail with permission denied.
    pub fn deny(&self, path: &str) {
        let path = self.resolve(path);
        self.lock().denied.insert(path);
    }

    /// Contents of the file at `path`.
    #[must_use]
    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        match self.lock().nodes.get(&self.resolve(path)) {
            Some(Node::File(contents)) => Some(contents.clone()),
            _ => None,
        }
    }

    /// Whether `path` is a directory.
    #[must_use]
    pub fn has_dir(&self, path: &str) -> bool {
        matches!(self.lock().nodes.get(&self.resolve(path)), Some(Node::Directory))
    }

    /// Every path passed to `create_dir`, resolved, in call order.
    #[must_use]
    pub fn mkdir_calls(&self) -> Vec<String> {
        self.lock().mkdir_calls.clone()
    }

    fn resolve(&self, path: &str) -> String {
        normalize(&self.home, path)
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_writable(state: &State, path: &str) -> Result<(), RemoteError> {
        let denied = state.denied.iter().any(|prefix| {
            path == prefix || path.starts_with(&format!("{}/", prefix.trim_end_matches('/')))
        });
        if denied {
            return Err(RemoteError::new(
                RemoteErrorKind::PermissionDenied,
                path,
                "permission denied",
            ));
        }
        match state.nodes.get(parent(path)) {
            Some(Node::Directory) => Ok(()),
            Some(Node::File(_)) => Err(RemoteError::new(
                RemoteErrorKind::WrongType,
                path,
                "parent is not a directory",
            )),
            None => Err(RemoteError::not_found(path)),
        }
    }
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(home: &str, path: &str) -> String {
    let joined = if path.starts_with('/') {
        path.to_owned()
    } else {
        format!("{home}/{path}")
    };
    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    format!("/{}", segments.join("/"))
}

fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(index) => &path[..index],
    }
}

#[async_trait]
impl RemoteFs for MemoryFs {
    async fn create_dir(&self, path: &str) -> Result<(), RemoteError> {
        let resolved = self.resolve(path);
        let mut state = self.lock();
        state.mkdir_calls.push(resolved.clone());
        Self::check_writable(&state, &resolved)?;
        if state.nodes.contains_key(&resolved) {
            return Err(RemoteError::new(RemoteErrorKind::Other, path, "failure"));
        }
        state.nodes.insert(resolved, Node::Directory);
        Ok(())
    }

    async fn write_file(&self, path: &str, contents: &[u8]) -> Result<(), RemoteError> {
        let resolved = self.resolve(path);
        let mut state = self.lock();
        Self::check_writable(&state, &resolved)?;
        if matches!(state.nodes.get(&resolved), Some(Node::Directory)) {
            return Err(RemoteError::new(RemoteErrorKind::WrongType, path, "is a directory"));
        }
        state.nodes.insert(resolved, Node::File(contents.to_vec()));
        Ok(())
    }

    async fn open_read(&self, path: &str) -> Result<RemoteReader, RemoteError> {
        match self.lock().nodes.get(&self.resolve(path)) {
            Some(Node::File(contents)) => Ok(Box::new(Cursor::new(contents.clone()))),
            Some(Node::Directory) => Err(RemoteError::new(
                RemoteErrorKind::WrongType,
                path,
                "is a directory",
            )),
            None => Err(RemoteError::not_found(path)),
        }
    }

    async fn read_dir(&self, path: &str) -> Result<Vec<RemoteEntry>, RemoteError> {
        let resolved = self.resolve(path);
        let state = self.lock();
        match state.nodes.get(&resolved) {
            Some(Node::Directory) => {}
            Some(Node::File(_)) => {
                return Err(RemoteError::new(
                    RemoteErrorKind::WrongType,
                    path,
                    "not a directory",
                ));
            }
            None => return Err(RemoteError::not_found(path)),
        }
        // Reverse order; callers sort.
        Ok(state
            .nodes
            .iter()
            .rev()
            .filter(|(candidate, _)| candidate.as_str() != resolved && parent(candidate) == resolved)
            .map(|(candidate, node)| {
                let name = candidate.rsplit('/').next().unwrap_or_default().to_owned();
                match node {
                    Node::Directory => RemoteEntry {
                        name,
                        kind: EntryKind::Directory,
                        len: 0,
                    },
                    Node::File(contents) => RemoteEntry {
                        name,
                        kind: EntryKind::File,
                        len: contents.len() as u64,
                    },
                }
            })
            .collect())
    }

    async fn metadata(&self, path: &str) -> Result<RemoteMetadata, RemoteError> {
        match self.lock().nodes.get(&self.resolve(path)) {
            Some(Node::Directory) => Ok(RemoteMetadata {
                kind: EntryKind::Directory,
                len: 0,
            }),
            Some(Node::File(contents)) => Ok(RemoteMetadata {
                kind: EntryKind::File,
                len: contents.len() as u64,
            }),
            None => Err(RemoteError::not_found(path)),
        }
    }

    async fn canonicalize(&self, path: &str) -> Result<String, RemoteError> {
        let resolved = self.resolve(path);
        if self.lock().nodes.contains_key(&resolved) {
            Ok(resolved)
        } else {
            Err(RemoteError::not_found(path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_resolves_relative_paths_against_home() {
        assert_eq!(normalize("/home/user", ""), "/home/user");
        assert_eq!(normalize("/home/user", "docs/./a"), "/home/user/docs/a");
        assert_eq!(normalize("/home/user", "../other"), "/home/other");
        assert_eq!(normalize("/home/user", "/srv//data/"), "/srv/data");
        assert_eq!(normalize("/home/user", "/.."), "/");
    }

    #[test]
    fn parent_of_top_level_is_root() {
        assert_eq!(parent("/srv"), "/");
        assert_eq!(parent("/srv/data"), "/srv");
    }

    #[tokio::test]
    async fn create_dir_requires_parent_and_rejects_existing() {
        let fs = MemoryFs::new();
        fs.create_dir("a").await.expect("create");
        assert!(fs.has_dir("/home/user/a"));
        assert!(fs.create_dir("a").await.is_err());
        let missing = fs.create_dir("x/y").await.expect_err("missing parent");
        assert!(missing.is_not_found());
    }

    #[tokio::test]
    async fn denied_prefix_blocks_writes() {
        let fs = MemoryFs::new();
        fs.add_dir("locked");
        fs.deny("locked");
        let error = fs
            .write_file("locked/a.txt", b"x")
            .await
            .expect_err("denied");
        assert_eq!(error.kind(), RemoteErrorKind::PermissionDenied);
        fs.write_file("lockedness.txt", b"x").await.expect("sibling");
    }
}
