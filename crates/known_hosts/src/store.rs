//! crates/known_hosts/src/store.rs
//! Append-only known-hosts file.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use logging::Logger;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::key::HostKey;
use crate::record::HostRecord;

/// Append-only `host keytype base64` file.
#[derive(Clone, Debug)]
pub struct KnownHostsStore {
    path: PathBuf,
    logger: Logger,
}

impl KnownHostsStore {
    /// Opens the store at `path`. The file is not touched until first use.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            logger: Logger::disabled(),
        }
    }

    /// Attributes store events to `logger`.
    #[must_use]
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Location of the store file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every usable record. A missing file holds no records.
    pub fn load(&self) -> Result<Vec<HostRecord>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(parent: self.logger.span(), "no known hosts at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        Ok(contents.lines().filter_map(HostRecord::parse).collect())
    }

    /// Keys recorded for `host`, in file order.
    pub fn keys_for(&self, host: &str) -> Result<Vec<HostKey>, StoreError> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|record| record.matches_host(host))
            .map(|record| record.key().clone())
            .collect())
    }

    /// Appends `record`, creating the file and its parents when needed.
    pub fn append(&self, record: &HostRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            create_private_dirs(parent).map_err(|source| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let write_error = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let needs_newline = match fs::read(&self.path) {
            Ok(existing) => existing.last().is_some_and(|byte| *byte != b'\n'),
            Err(error) if error.kind() == io::ErrorKind::NotFound => false,
            Err(source) => return Err(write_error(source)),
        };

        let mut file = open_private_append(&self.path).map_err(write_error)?;
        let mut line = String::new();
        if needs_newline {
            line.push('\n');
        }
        line.push_str(&record.to_line());
        line.push('\n');
        file.write_all(line.as_bytes()).map_err(write_error)?;
        file.flush().map_err(write_error)?;

        if needs_newline {
            warn!(parent: self.logger.span(), "{} did not end with a newline", self.path.display());
        }
        debug!(parent: self.logger.span(), "recorded {}", record.to_line());
        Ok(())
    }
}

#[cfg(unix)]
fn create_private_dirs(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dirs(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(unix)]
fn open_private_append(path: &Path) -> io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    OpenOptions::new().create(true).append(true).mode(0o600).open(path)
}

#[cfg(not(unix))]
fn open_private_append(path: &Path) -> io::Result<fs::File> {
    OpenOptions::new().create(true).append(true).open(path)
}
