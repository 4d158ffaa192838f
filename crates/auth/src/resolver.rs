//! crates/auth/src/resolver.rs
//! Resolve-once credential discovery.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use logging::Logger;
use russh::keys::PrivateKey;
use tokio::sync::OnceCell;
use tracing::{debug, error};

use crate::agent::{self, AgentHandle, AgentSource};
use crate::error::AuthError;
use crate::key::load_private_key;

/// A credential the handshake may offer.
#[derive(Clone)]
pub enum AuthMethod {
    /// A private key loaded from disk.
    PrivateKey(Arc<PrivateKey>),
    /// Identities held by an SSH agent.
    Agent(AgentHandle),
}

impl fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrivateKey(key) => f
                .debug_tuple("PrivateKey")
                .field(&key.algorithm().as_str())
                .finish(),
            Self::Agent(handle) => f.debug_tuple("Agent").field(handle).finish(),
        }
    }
}

type Resolution = Result<Arc<[AuthMethod]>, AuthError>;

/// Discovers credentials once and hands the cached result to every caller.
pub struct AuthResolver {
    key_path: PathBuf,
    agent: AgentSource,
    logger: Logger,
    resolved: OnceCell<Resolution>,
}

impl AuthResolver {
    /// Creates a resolver for the key at `key_path`, consulting the agent
    /// from the environment.
    #[must_use]
    pub fn new(key_path: impl Into<PathBuf>) -> Self {
        Self {
            key_path: key_path.into(),
            agent: AgentSource::default(),
            logger: Logger::disabled(),
            resolved: OnceCell::new(),
        }
    }

    /// Selects where agent identities come from.
    #[must_use]
    pub fn agent(mut self, source: AgentSource) -> Self {
        self.agent = source;
        self
    }

    /// Attributes resolution events to `logger`.
    #[must_use]
    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Key file this resolver loads.
    #[must_use]
    pub fn key_path(&self) -> &Path {
        &self.key_path
    }

    /// Reports whether resolution has already completed.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved.initialized()
    }

    /// Returns the ordered credential methods, discovering them on first use.
    pub async fn resolve(&self) -> Resolution {
        self.resolved
            .get_or_init(|| self.discover())
            .await
            .clone()
    }

    async fn discover(&self) -> Resolution {
        debug!(parent: self.logger.span(), "loading key {}", self.key_path.display());
        let key = load_private_key(&self.key_path).await.map(Arc::new);
        let agent = agent::discover(self.agent, &self.logger).await;
        combine(key, agent, &self.logger).map(Into::into)
    }
}

impl fmt::Debug for AuthResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResolver")
            .field("key_path", &self.key_path)
            .field("agent", &self.agent)
            .field("resolved", &self.is_resolved())
            .finish_non_exhaustive()
    }
}

/// Orders the discovered credentials and applies the key-failure policy.
pub(crate) fn combine(
    key: Result<Arc<PrivateKey>, AuthError>,
    agent: Option<AgentHandle>,
    logger: &Logger,
) -> Result<Vec<AuthMethod>, AuthError> {
    let mut methods = Vec::with_capacity(2);

    match (key, agent.is_some()) {
        (Ok(key), _) => methods.push(AuthMethod::PrivateKey(key)),
        (Err(failure), true) => {
            error!(parent: logger.span(), "{}; continuing with ssh agent", failure);
        }
        (Err(failure), false) => return Err(failure),
    }

    if let Some(agent) = agent {
        methods.push(AuthMethod::Agent(agent));
    }

    Ok(methods)
}
