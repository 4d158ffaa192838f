//! crates/connect/src/dialer/mod.rs
//! Overlay dialing seam.

mod proxy;
mod tcp;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::DialError;

pub use proxy::{BEARER_TOKEN_ENV, ProxyCommandDialer};
pub use tcp::{DEFAULT_SSH_PORT, TcpDialer};

/// A duplex byte stream the SSH transport can run over.
pub trait DuplexStream: AsyncRead + AsyncWrite + Unpin + Send + 'static {}

impl<T> DuplexStream for T where T: AsyncRead + AsyncWrite + Unpin + Send + 'static {}

/// What to dial.
#[derive(Clone, Default)]
pub struct DialRequest {
    /// Overlay service name.
    pub service: String,
    /// Target identity within the service.
    pub identity: String,
    /// Opaque credential forwarded to the overlay without interpretation.
    pub bearer_token: Option<String>,
    /// Upper bound for the dial; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl fmt::Debug for DialRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialRequest")
            .field("service", &self.service)
            .field("identity", &self.identity)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// A dialed stream and the peer address reported for it.
pub struct Dialed {
    /// Stream to run SSH over.
    pub stream: Box<dyn DuplexStream>,
    /// Address used for host-key lookups. May carry volatile annotations.
    pub peer_address: String,
}

impl fmt::Debug for Dialed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialed")
            .field("peer_address", &self.peer_address)
            .finish_non_exhaustive()
    }
}

/// Opens duplex streams to overlay targets.
#[async_trait]
pub trait Dialer: Send + Sync {
    /// Dials `request.identity` within `request.service`.
    async fn dial(&self, request: &DialRequest) -> Result<Dialed, DialError>;
}

/// Dials through `dialer`, enforcing `request.timeout`.
pub async fn dial(dialer: &dyn Dialer, request: &DialRequest) -> Result<Dialed, DialError> {
    match request.timeout {
        Some(limit) => tokio::time::timeout(limit, dialer.dial(request))
            .await
            .map_err(|_| DialError::Timeout {
                identity: request.identity.clone(),
                after: limit,
            })?,
        None => dialer.dial(request).await,
    }
}
