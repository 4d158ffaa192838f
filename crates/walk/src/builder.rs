use std::path::PathBuf;

use logging::Logger;

use crate::error::WalkError;
use crate::walker::Walker;

/// Configures a traversal rooted at a specific path.
#[derive(Clone, Debug)]
pub struct WalkBuilder {
    root: PathBuf,
    include_root: bool,
    logger: Logger,
}

impl WalkBuilder {
    /// Creates a builder that will traverse `root`.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            include_root: true,
            logger: Logger::disabled(),
        }
    }

    /// Controls whether the root entry is yielded first.
    #[must_use]
    pub const fn include_root(mut self, include: bool) -> Self {
        self.include_root = include;
        self
    }

    /// Attributes traversal events to `logger`.
    #[must_use]
    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Inspects the root and builds a [`Walker`].
    pub fn build(self) -> Result<Walker, WalkError> {
        Walker::new(self.root, self.include_root, self.logger)
    }
}
