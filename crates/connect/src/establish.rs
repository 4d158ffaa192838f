//! crates/connect/src/establish.rs
//! Handshake, host-key verification and authentication over a dialed stream.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use auth::{AuthMethod, AuthResolver};
use known_hosts::HostIdentityVerifier;
use logging::Logger;
use russh::client::{self, Handle};
use russh::keys::agent::AgentIdentity;
use russh::keys::{HashAlg, PrivateKey, PrivateKeyWithHashAlg};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

use crate::dialer::Dialed;
use crate::error::ConnectError;
use crate::handler::{ClientHandler, HandlerError};
use crate::session::Session;

/// Default dial and handshake limit.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Tunables for [`establish`].
#[derive(Clone, Debug)]
pub struct EstablishOptions {
    handshake_timeout: Option<Duration>,
    keepalive_interval: Option<Duration>,
    logger: Logger,
}

impl EstablishOptions {
    /// Defaults: [`DEFAULT_TIMEOUT`] for the handshake, no keepalive.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handshake_timeout: Some(DEFAULT_TIMEOUT),
            keepalive_interval: None,
            logger: Logger::disabled(),
        }
    }

    /// Limit for the key exchange and for authentication; `None` disables it.
    #[must_use]
    pub const fn handshake_timeout(mut self, limit: Option<Duration>) -> Self {
        self.handshake_timeout = limit;
        self
    }

    /// Interval between SSH keepalive requests.
    #[must_use]
    pub const fn keepalive_interval(mut self, interval: Option<Duration>) -> Self {
        self.keepalive_interval = interval;
        self
    }

    /// Attributes handshake events to `logger`.
    #[must_use]
    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Configured handshake limit.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.handshake_timeout
    }
}

impl Default for EstablishOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the SSH handshake over `dialed` and authenticates as `user`.
///
/// Credentials are resolved before any bytes are exchanged, so a broken key
/// file fails fast. The server key goes through `verifier`; a mismatch aborts
/// the handshake before authentication starts.
pub async fn establish(
    dialed: Dialed,
    user: &str,
    auth: &AuthResolver,
    verifier: Arc<HostIdentityVerifier>,
    options: &EstablishOptions,
) -> Result<Session, ConnectError> {
    let methods = auth.resolve().await?;
    establish_with_methods(dialed, user, &methods, verifier, options).await
}

/// Like [`establish`], offering already resolved `methods` in order.
///
/// The first method the server accepts wins. When every method is refused
/// the result is [`ConnectError::AuthenticationRejected`].
pub async fn establish_with_methods(
    dialed: Dialed,
    user: &str,
    methods: &[AuthMethod],
    verifier: Arc<HostIdentityVerifier>,
    options: &EstablishOptions,
) -> Result<Session, ConnectError> {
    let logger = options.logger.clone();
    debug!(parent: logger.span(), "{} authentication method(s) available", methods.len());

    let config = Arc::new(client::Config {
        keepalive_interval: options.keepalive_interval,
        ..client::Config::default()
    });
    let verifying = Arc::new(AtomicBool::new(false));
    let handler = ClientHandler::new(
        dialed.peer_address.clone(),
        verifier,
        Arc::clone(&verifying),
        logger.child("hostkey"),
    );

    info!(parent: logger.span(), "connecting to {}", dialed.peer_address);
    let connect = client::connect_stream(config, dialed.stream, handler);
    let mut handle = match options.handshake_timeout {
        Some(limit) => handshake_with_deadline(connect, limit, &verifying).await?,
        None => connect.await.map_err(handshake_error)?,
    };

    let authenticate = authenticate(&mut handle, user, methods, &logger);
    let accepted = match options.handshake_timeout {
        Some(limit) => tokio::time::timeout(limit, authenticate)
            .await
            .map_err(|_| ConnectError::Timeout {
                stage: "authentication",
                after: limit,
            })??,
        None => authenticate.await?,
    };
    if !accepted {
        return Err(ConnectError::AuthenticationRejected {
            user: user.to_owned(),
        });
    }

    info!(parent: logger.span(), "authenticated as {}", user);
    Ok(Session::new(handle, user.to_owned(), dialed.peer_address, logger))
}

/// Drives the key exchange, holding the clock while the host-key prompt is
/// waiting for an answer.
async fn handshake_with_deadline<F>(
    connect: F,
    limit: Duration,
    verifying: &AtomicBool,
) -> Result<Handle<ClientHandler>, ConnectError>
where
    F: Future<Output = Result<Handle<ClientHandler>, HandlerError>>,
{
    let mut connect = std::pin::pin!(connect);
    let mut deadline = Instant::now() + limit;
    loop {
        tokio::select! {
            outcome = &mut connect => return outcome.map_err(handshake_error),
            () = sleep_until(deadline) => {
                if verifying.load(Ordering::SeqCst) {
                    deadline = Instant::now() + limit;
                } else {
                    return Err(ConnectError::Timeout { stage: "handshake", after: limit });
                }
            }
        }
    }
}

fn handshake_error(error: HandlerError) -> ConnectError {
    match error {
        HandlerError::HostKey(error) => ConnectError::HostKey(error),
        HandlerError::Ssh(error) => ConnectError::Handshake(error),
    }
}

/// Offers each method in order and reports whether one was accepted.
async fn authenticate(
    handle: &mut Handle<ClientHandler>,
    user: &str,
    methods: &[AuthMethod],
    logger: &Logger,
) -> Result<bool, ConnectError> {
    for method in methods {
        match method {
            AuthMethod::PrivateKey(key) => {
                if offer_private_key(handle, user, key).await? {
                    return Ok(true);
                }
                debug!(parent: logger.span(), "server refused the key file");
            }
            AuthMethod::Agent(agent) => {
                let client = agent.client();
                let mut client = client.lock().await;
                for identity in agent.identities() {
                    let outcome = match identity {
                        AgentIdentity::PublicKey { key, comment } => {
                            debug!(parent: logger.span(), "offering agent key {}", comment);
                            let hash = rsa_hash(handle, key.algorithm().is_rsa()).await?;
                            handle
                                .authenticate_publickey_with(user, key.clone(), hash, &mut *client)
                                .await
                        }
                        AgentIdentity::Certificate {
                            certificate,
                            comment,
                        } => {
                            debug!(parent: logger.span(), "offering agent certificate {}", comment);
                            handle
                                .authenticate_certificate_with(
                                    user,
                                    certificate.clone(),
                                    None,
                                    &mut *client,
                                )
                                .await
                        }
                    };
                    match outcome {
                        Ok(result) if result.success() => return Ok(true),
                        Ok(_) => {}
                        Err(error) => {
                            warn!(parent: logger.span(), "agent signing failed: {}", error);
                        }
                    }
                }
            }
        }
    }
    Ok(false)
}

async fn offer_private_key(
    handle: &mut Handle<ClientHandler>,
    user: &str,
    key: &Arc<PrivateKey>,
) -> Result<bool, ConnectError> {
    let hash = rsa_hash(handle, key.algorithm().is_rsa()).await?;
    let result = handle
        .authenticate_publickey(user, PrivateKeyWithHashAlg::new(Arc::clone(key), hash))
        .await
        .map_err(ConnectError::Handshake)?;
    Ok(result.success())
}

async fn rsa_hash(
    handle: &Handle<ClientHandler>,
    is_rsa: bool,
) -> Result<Option<HashAlg>, ConnectError> {
    if !is_rsa {
        return Ok(None);
    }
    let best = handle
        .best_supported_rsa_hash()
        .await
        .map_err(ConnectError::Handshake)?;
    Ok(best.flatten())
}
