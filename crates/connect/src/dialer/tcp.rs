use async_trait::async_trait;
use logging::Logger;
use tokio::net::TcpStream;
use tracing::debug;

use super::{DialRequest, Dialed, Dialer};
use crate::error::DialError;

/// Port appended to identities that do not carry one.
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Connects straight to `identity[:port]` over TCP.
///
/// Used when the overlay exposes targets through a local intercept address.
#[derive(Clone, Debug)]
pub struct TcpDialer {
    port: u16,
    logger: Logger,
}

impl TcpDialer {
    /// Creates a dialer using [`DEFAULT_SSH_PORT`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            port: DEFAULT_SSH_PORT,
            logger: Logger::disabled(),
        }
    }

    /// Port used when the identity does not name one.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Attributes dial events to `logger`.
    #[must_use]
    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Address dialed for `identity`.
    #[must_use]
    pub fn address_for(&self, identity: &str) -> String {
        if identity.starts_with('[') {
            if identity.contains("]:") {
                identity.to_owned()
            } else {
                format!("{identity}:{}", self.port)
            }
        } else if identity.matches(':').count() > 1 {
            format!("[{identity}]:{}", self.port)
        } else if identity.contains(':') {
            identity.to_owned()
        } else {
            format!("{identity}:{}", self.port)
        }
    }
}

impl Default for TcpDialer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Dialer for TcpDialer {
    async fn dial(&self, request: &DialRequest) -> Result<Dialed, DialError> {
        let address = self.address_for(&request.identity);
        if request.bearer_token.is_some() {
            debug!(parent: self.logger.span(), "direct tcp dial ignores the bearer token");
        }

        debug!(parent: self.logger.span(), "connecting to {}", address);
        let stream = TcpStream::connect(&address)
            .await
            .map_err(|source| DialError::Connect {
                address: address.clone(),
                source,
            })?;
        if let Err(error) = stream.set_nodelay(true) {
            debug!(parent: self.logger.span(), "TCP_NODELAY not set: {}", error);
        }

        let peer_address = match stream.peer_addr() {
            Ok(peer) => format!("{} ({peer})", request.identity),
            Err(_) => request.identity.clone(),
        };
        Ok(Dialed {
            stream: Box::new(stream),
            peer_address,
        })
    }
}
