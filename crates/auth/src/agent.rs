//! crates/auth/src/agent.rs
//! SSH agent discovery.

use std::fmt;
use std::sync::Arc;

use logging::Logger;
use russh::keys::agent::AgentIdentity;
use russh::keys::agent::client::{AgentClient, AgentStream};
use tokio::sync::Mutex;
use tracing::debug;

/// Agent client over whichever transport the platform provides.
pub type DynAgentClient = AgentClient<Box<dyn AgentStream + Send + Unpin + 'static>>;

#[cfg(windows)]
const AGENT_PIPE: &str = r"\\.\pipe\openssh-ssh-agent";

/// Where agent identities come from.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum AgentSource {
    /// `SSH_AUTH_SOCK` on unix, the OpenSSH named pipe on Windows.
    #[default]
    Environment,
    /// Never consult an agent.
    Disabled,
}

/// A connected agent and the identities it advertised.
#[derive(Clone)]
pub struct AgentHandle {
    client: Arc<Mutex<DynAgentClient>>,
    identities: Arc<[AgentIdentity]>,
}

impl AgentHandle {
    /// Shared agent connection used to sign authentication requests.
    #[must_use]
    pub fn client(&self) -> Arc<Mutex<DynAgentClient>> {
        Arc::clone(&self.client)
    }

    /// Identities in the order the agent listed them. Certificates are
    /// included alongside plain keys.
    #[must_use]
    pub fn identities(&self) -> &[AgentIdentity] {
        &self.identities
    }
}

impl fmt::Debug for AgentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentHandle")
            .field("identities", &self.identities.len())
            .finish_non_exhaustive()
    }
}

/// Connects to the agent and lists its identities.
///
/// Any failure yields `None`; an agent with no identities does too.
pub(crate) async fn discover(source: AgentSource, logger: &Logger) -> Option<AgentHandle> {
    if source == AgentSource::Disabled {
        return None;
    }

    let mut client = match connect().await {
        Ok(client) => client,
        Err(error) => {
            debug!(parent: logger.span(), "no ssh agent available: {}", error);
            return None;
        }
    };

    let identities = match client.request_identities().await {
        Ok(identities) => identities,
        Err(error) => {
            debug!(parent: logger.span(), "ssh agent did not list identities: {}", error);
            return None;
        }
    };

    if identities.is_empty() {
        debug!(parent: logger.span(), "ssh agent holds no identities");
        return None;
    }

    debug!(parent: logger.span(), "ssh agent offers {} identities", identities.len());
    Some(AgentHandle {
        client: Arc::new(Mutex::new(client)),
        identities: identities.into(),
    })
}

#[cfg(unix)]
async fn connect() -> Result<DynAgentClient, russh::keys::Error> {
    Ok(AgentClient::connect_env().await?.dynamic())
}

#[cfg(windows)]
async fn connect() -> Result<DynAgentClient, russh::keys::Error> {
    Ok(AgentClient::connect_named_pipe(AGENT_PIPE).await?.dynamic())
}
