//! crates/cli/src/client.rs
//! Runtime, logging and connection setup shared by both binaries.

use std::io::Write;
use std::sync::Arc;

use auth::AuthResolver;
use connect::{
    ConnectError, DialRequest, Dialer, EstablishOptions, ProxyCommandDialer, Session, TcpDialer,
    dial, establish,
};
use known_hosts::{HostIdentityVerifier, KnownHostsStore, StdinPrompt};
use logging::{LogConfig, LogInitError, Logger};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::error::CliError;
use crate::options::Prepared;

pub(crate) fn runtime() -> Result<Runtime, CliError> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
}

/// Installs the subscriber. An already installed one is kept.
pub(crate) fn init_logging<W: Write>(program: &str, debug: bool, stderr: &mut W) {
    match logging::init(&LogConfig::for_terminal(debug)) {
        Ok(()) | Err(LogInitError::AlreadyInstalled) => {}
        Err(error) => {
            let _ = writeln!(stderr, "{program}: warning: {error}");
        }
    }
}

/// Dials the prepared target and authenticates.
pub(crate) async fn connect(prepared: &Prepared, logger: &Logger) -> Result<Session, ConnectError> {
    let settings = &prepared.settings;
    let request = DialRequest {
        service: settings.service().to_owned(),
        identity: prepared.target.host().to_owned(),
        bearer_token: prepared.token.clone(),
        timeout: settings.connect_timeout(),
    };
    let dialer: Box<dyn Dialer> = match settings.proxy_command() {
        Some(template) => Box::new(ProxyCommandDialer::new(template).logger(logger.child("dial"))),
        None => Box::new(TcpDialer::new().logger(logger.child("dial"))),
    };
    debug!(parent: logger.span(), "dialing {:?}", request);
    let dialed = dial(dialer.as_ref(), &request).await?;

    let store = KnownHostsStore::new(settings.known_hosts()).with_logger(logger.child("known_hosts"));
    let verifier =
        Arc::new(HostIdentityVerifier::new(store, StdinPrompt).with_logger(logger.child("hostkey")));
    let auth = AuthResolver::new(settings.ssh_key_path()).logger(logger.child("auth"));
    let options = EstablishOptions::new()
        .handshake_timeout(settings.connect_timeout())
        .logger(logger.child("ssh"));

    establish(dialed, prepared.target.user(), &auth, verifier, &options).await
}
