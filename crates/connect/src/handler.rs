//! crates/connect/src/handler.rs
//! russh client callbacks.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use known_hosts::{HostIdentityVerifier, HostKey, HostKeyError};
use logging::Logger;
use russh::keys::{HashAlg, PublicKey};
use tracing::debug;

/// Errors raised from inside the handshake callbacks.
#[derive(Debug)]
pub(crate) enum HandlerError {
    Ssh(russh::Error),
    HostKey(HostKeyError),
}

impl From<russh::Error> for HandlerError {
    fn from(error: russh::Error) -> Self {
        Self::Ssh(error)
    }
}

/// Routes the server key through the host identity verifier.
pub(crate) struct ClientHandler {
    peer_address: String,
    verifier: Arc<HostIdentityVerifier>,
    verifying: Arc<AtomicBool>,
    logger: Logger,
}

impl ClientHandler {
    pub(crate) fn new(
        peer_address: String,
        verifier: Arc<HostIdentityVerifier>,
        verifying: Arc<AtomicBool>,
        logger: Logger,
    ) -> Self {
        Self {
            peer_address,
            verifier,
            verifying,
            logger,
        }
    }
}

/// Converts the negotiated key into the store representation.
pub(crate) fn host_key_from(key: &PublicKey) -> Result<HostKey, HostKeyError> {
    let openssh = key
        .to_openssh()
        .map_err(|error| HostKeyError::MalformedKey(error.to_string()))?;
    let fingerprint = key.fingerprint(HashAlg::Sha256).to_string();
    Ok(HostKey::from_openssh(&openssh)?.with_fingerprint(fingerprint))
}

impl russh::client::Handler for ClientHandler {
    type Error = HandlerError;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        let key = host_key_from(server_public_key).map_err(HandlerError::HostKey)?;
        debug!(
            parent: self.logger.span(),
            "server key for {} is {} {}",
            self.peer_address,
            key.algorithm(),
            key.fingerprint()
        );

        let verifier = Arc::clone(&self.verifier);
        let peer_address = self.peer_address.clone();
        self.verifying.store(true, Ordering::SeqCst);
        // The prompt blocks on stdin.
        let outcome =
            tokio::task::spawn_blocking(move || verifier.verify(&peer_address, &key)).await;
        self.verifying.store(false, Ordering::SeqCst);

        match outcome {
            Ok(Ok(verified)) => {
                debug!(parent: self.logger.span(), "host key {:?}", verified);
                Ok(true)
            }
            Ok(Err(error)) => Err(HandlerError::HostKey(error)),
            Err(join) => Err(HandlerError::HostKey(HostKeyError::Prompt(io::Error::other(
                join.to_string(),
            )))),
        }
    }
}
