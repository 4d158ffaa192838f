//! crates/known_hosts/src/verifier.rs
//! Trust-on-first-use decision logic.

use logging::Logger;
use tracing::{debug, error, info};

use crate::error::HostKeyError;
use crate::host::normalize_host;
use crate::key::HostKey;
use crate::prompt::TrustPrompt;
use crate::record::HostRecord;
use crate::store::KnownHostsStore;

/// Outcome of comparing a presented key with the store.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HostKeyState {
    /// Not yet checked.
    Unverified,
    /// A stored key for the host equals the presented key.
    KnownMatch,
    /// The host has stored keys and none equals the presented key.
    KnownMismatch,
    /// The host has no stored keys.
    Unknown,
}

/// How a key came to be trusted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verified {
    /// The key was already recorded.
    Known,
    /// The user accepted the key and it was recorded.
    Accepted,
}

/// Checks server keys against a [`KnownHostsStore`].
pub struct HostIdentityVerifier {
    store: KnownHostsStore,
    prompt: Box<dyn TrustPrompt>,
    logger: Logger,
}

impl HostIdentityVerifier {
    /// Creates a verifier over `store` that asks `prompt` about unknown hosts.
    pub fn new(store: KnownHostsStore, prompt: impl TrustPrompt + 'static) -> Self {
        Self {
            store,
            prompt: Box::new(prompt),
            logger: Logger::disabled(),
        }
    }

    /// Attributes verification events to `logger`.
    #[must_use]
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.store = self.store.with_logger(logger.clone());
        self.logger = logger;
        self
    }

    /// Underlying store.
    #[must_use]
    pub const fn store(&self) -> &KnownHostsStore {
        &self.store
    }

    /// Normalizes `raw_host` and classifies `key` without prompting.
    pub fn classify(
        &self,
        raw_host: &str,
        key: &HostKey,
    ) -> Result<(String, HostKeyState), HostKeyError> {
        let host = normalize_host(raw_host)?;
        let known = self.store.keys_for(&host)?;

        let state = if known.is_empty() {
            HostKeyState::Unknown
        } else if known.iter().any(|stored| stored == key) {
            HostKeyState::KnownMatch
        } else {
            HostKeyState::KnownMismatch
        };
        debug!(parent: self.logger.span(), "host '{}' ({}): {:?}", host, raw_host, state);
        Ok((host, state))
    }

    /// Decides whether `key` may be trusted for `raw_host`.
    ///
    /// Unknown hosts are shown to the prompt and recorded when accepted. A
    /// mismatch fails without prompting.
    pub fn verify(&self, raw_host: &str, key: &HostKey) -> Result<Verified, HostKeyError> {
        let (host, state) = self.classify(raw_host, key)?;

        match state {
            HostKeyState::KnownMatch => Ok(Verified::Known),
            HostKeyState::KnownMismatch => {
                error!(
                    parent: self.logger.span(),
                    "REMOTE HOST IDENTIFICATION HAS CHANGED for '{}'", host
                );
                Err(HostKeyError::Mismatch {
                    host,
                    algorithm: key.algorithm().to_owned(),
                    fingerprint: key.fingerprint(),
                    store: self.store.path().to_path_buf(),
                })
            }
            HostKeyState::Unknown | HostKeyState::Unverified => {
                let accepted = self
                    .prompt
                    .confirm(&host, key)
                    .map_err(HostKeyError::Prompt)?;
                if !accepted {
                    return Err(HostKeyError::Declined { host });
                }

                self.store.append(&HostRecord::new(host.as_str(), key.clone()))?;
                info!(
                    parent: self.logger.span(),
                    "permanently added '{}' ({}) to {}",
                    host,
                    key.algorithm(),
                    self.store.path().display()
                );
                Ok(Verified::Accepted)
            }
        }
    }
}
