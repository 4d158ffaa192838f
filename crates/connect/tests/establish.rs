use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use auth::{AgentSource, AuthMethod, AuthResolver};
use connect::{ConnectError, Dialed, EstablishOptions, establish, establish_with_methods};
use known_hosts::{
    HostIdentityVerifier, HostKey, HostKeyError, HostRecord, KnownHostsStore, TrustPrompt,
};
use russh::keys::{HashAlg, PrivateKey, PublicKey};
use russh::server::{self, Auth, Msg};
use russh::{Channel, MethodKind, MethodSet};

const HOST_KEY: &str = include_str!("fixtures/host_ed25519");
const CLIENT_KEY: &str = include_str!("fixtures/client_ed25519");
const OTHER_KEY: &str = include_str!("fixtures/other_ed25519");

fn private_key(text: &str) -> PrivateKey {
    PrivateKey::from_openssh(text).expect("fixture key")
}

fn fingerprint(key: &PublicKey) -> String {
    key.fingerprint(HashAlg::Sha256).to_string()
}

/// What the server observed during authentication.
#[derive(Clone, Default)]
struct ServerLog {
    auth_requests: Arc<AtomicUsize>,
    signed_keys: Arc<Mutex<Vec<String>>>,
}

impl ServerLog {
    fn auth_requests(&self) -> usize {
        self.auth_requests.load(Ordering::SeqCst)
    }

    fn signed_keys(&self) -> Vec<String> {
        self.signed_keys.lock().expect("log lock").clone()
    }
}

/// Accepts exactly one client key.
struct TestServer {
    authorized: Option<PublicKey>,
    log: ServerLog,
}

impl server::Handler for TestServer {
    type Error = russh::Error;

    async fn auth_none(&mut self, _user: &str) -> Result<Auth, Self::Error> {
        self.log.auth_requests.fetch_add(1, Ordering::SeqCst);
        Ok(Auth::reject())
    }

    async fn auth_publickey_offered(
        &mut self,
        _user: &str,
        _public_key: &PublicKey,
    ) -> Result<Auth, Self::Error> {
        self.log.auth_requests.fetch_add(1, Ordering::SeqCst);
        Ok(Auth::Accept)
    }

    async fn auth_publickey(
        &mut self,
        _user: &str,
        public_key: &PublicKey,
    ) -> Result<Auth, Self::Error> {
        self.log
            .signed_keys
            .lock()
            .expect("log lock")
            .push(fingerprint(public_key));
        let accepted = self
            .authorized
            .as_ref()
            .is_some_and(|authorized| authorized.key_data() == public_key.key_data());
        Ok(if accepted {
            Auth::Accept
        } else {
            Auth::reject()
        })
    }

    async fn channel_open_session(
        &mut self,
        _channel: Channel<Msg>,
        _session: &mut server::Session,
    ) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

/// Starts a server on one end of an in-memory pipe and returns the other.
fn serve(authorized: Option<&PrivateKey>) -> (Dialed, ServerLog) {
    let log = ServerLog::default();
    let handler = TestServer {
        authorized: authorized.map(|key| key.public_key().clone()),
        log: log.clone(),
    };
    let config = Arc::new(server::Config {
        keys: vec![private_key(HOST_KEY)],
        methods: MethodSet::from(&[MethodKind::PublicKey][..]),
        auth_rejection_time: Duration::from_millis(5),
        auth_rejection_time_initial: Some(Duration::ZERO),
        ..server::Config::default()
    });
    let (client_end, server_end) = tokio::io::duplex(64 * 1024);
    tokio::spawn(async move {
        if let Ok(running) = server::run_stream(config, server_end, handler).await {
            let _ = running.await;
        }
    });
    let dialed = Dialed {
        stream: Box::new(client_end),
        peer_address: "db01".to_owned(),
    };
    (dialed, log)
}

#[derive(Clone)]
struct CountingPrompt {
    accept: bool,
    asked: Arc<AtomicUsize>,
}

impl CountingPrompt {
    fn new(accept: bool) -> Self {
        Self {
            accept,
            asked: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn times_asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

impl TrustPrompt for CountingPrompt {
    fn confirm(&self, _host: &str, _key: &HostKey) -> io::Result<bool> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        Ok(self.accept)
    }
}

fn host_key() -> HostKey {
    let public = private_key(HOST_KEY).public_key().clone();
    HostKey::from_openssh(&public.to_openssh().expect("encode")).expect("host key")
}

fn options() -> EstablishOptions {
    EstablishOptions::new().handshake_timeout(Some(Duration::from_secs(10)))
}

#[tokio::test]
async fn unknown_host_accepted_at_the_prompt_is_recorded() {
    let temp = tempfile::tempdir().expect("tempdir");
    let key_path = temp.path().join("id_ed25519");
    std::fs::write(&key_path, CLIENT_KEY).expect("key file");
    let store_path = temp.path().join("known_hosts");
    let prompt = CountingPrompt::new(true);
    let verifier = Arc::new(HostIdentityVerifier::new(
        KnownHostsStore::new(&store_path),
        prompt.clone(),
    ));
    let resolver = AuthResolver::new(&key_path).agent(AgentSource::Disabled);

    let (dialed, log) = serve(Some(&private_key(CLIENT_KEY)));
    let session = establish(dialed, "ops", &resolver, verifier, &options())
        .await
        .expect("session");
    assert_eq!(session.user(), "ops");
    assert_eq!(prompt.times_asked(), 1);
    assert_eq!(log.signed_keys().len(), 1);

    let stored = KnownHostsStore::new(&store_path)
        .keys_for("db01")
        .expect("store readable");
    assert_eq!(stored, vec![host_key()]);
    session.close().await.expect("close");
}

#[tokio::test]
async fn known_host_connects_without_prompting() {
    let temp = tempfile::tempdir().expect("tempdir");
    let store = KnownHostsStore::new(temp.path().join("known_hosts"));
    store
        .append(&HostRecord::new("db01", host_key()))
        .expect("seed");
    let prompt = CountingPrompt::new(false);
    let verifier = Arc::new(HostIdentityVerifier::new(store, prompt.clone()));

    let client = private_key(CLIENT_KEY);
    let (dialed, _log) = serve(Some(&client));
    let methods = [AuthMethod::PrivateKey(Arc::new(client))];
    let session = establish_with_methods(dialed, "ops", &methods, verifier, &options())
        .await
        .expect("session");
    assert_eq!(prompt.times_asked(), 0);
    session.close().await.expect("close");
}

#[tokio::test]
async fn host_key_mismatch_stops_before_authentication() {
    let temp = tempfile::tempdir().expect("tempdir");
    let store = KnownHostsStore::new(temp.path().join("known_hosts"));
    store
        .append(&HostRecord::new(
            "db01",
            HostKey::new("ssh-ed25519", vec![9; 32]),
        ))
        .expect("seed");
    let prompt = CountingPrompt::new(true);
    let verifier = Arc::new(HostIdentityVerifier::new(store, prompt.clone()));

    let client = private_key(CLIENT_KEY);
    let (dialed, log) = serve(Some(&client));
    let methods = [AuthMethod::PrivateKey(Arc::new(client))];
    let error = establish_with_methods(dialed, "ops", &methods, verifier, &options())
        .await
        .expect_err("mismatch");

    assert!(
        matches!(error, ConnectError::HostKey(HostKeyError::Mismatch { .. })),
        "unexpected error: {error}"
    );
    assert_eq!(prompt.times_asked(), 0);
    assert_eq!(log.auth_requests(), 0);
    assert!(log.signed_keys().is_empty());
}

#[tokio::test]
async fn declined_host_is_not_recorded() {
    let temp = tempfile::tempdir().expect("tempdir");
    let store_path = temp.path().join("known_hosts");
    let verifier = Arc::new(HostIdentityVerifier::new(
        KnownHostsStore::new(&store_path),
        CountingPrompt::new(false),
    ));

    let client = private_key(CLIENT_KEY);
    let (dialed, log) = serve(Some(&client));
    let methods = [AuthMethod::PrivateKey(Arc::new(client))];
    let error = establish_with_methods(dialed, "ops", &methods, verifier, &options())
        .await
        .expect_err("declined");

    assert!(matches!(
        error,
        ConnectError::HostKey(HostKeyError::Declined { .. })
    ));
    assert_eq!(log.auth_requests(), 0);
    assert!(!store_path.exists());
}

#[tokio::test]
async fn refused_key_falls_through_to_the_next_method() {
    let temp = tempfile::tempdir().expect("tempdir");
    let verifier = Arc::new(HostIdentityVerifier::new(
        KnownHostsStore::new(temp.path().join("known_hosts")),
        CountingPrompt::new(true),
    ));

    let refused = private_key(OTHER_KEY);
    let accepted = private_key(CLIENT_KEY);
    let expected = vec![
        fingerprint(refused.public_key()),
        fingerprint(accepted.public_key()),
    ];
    let (dialed, log) = serve(Some(&accepted));
    let methods = [
        AuthMethod::PrivateKey(Arc::new(refused)),
        AuthMethod::PrivateKey(Arc::new(accepted)),
    ];
    let session = establish_with_methods(dialed, "ops", &methods, verifier, &options())
        .await
        .expect("second method accepted");

    assert_eq!(log.signed_keys(), expected);
    session.close().await.expect("close");
}

#[tokio::test]
async fn every_method_refused_is_reported_as_rejection() {
    let temp = tempfile::tempdir().expect("tempdir");
    let verifier = Arc::new(HostIdentityVerifier::new(
        KnownHostsStore::new(temp.path().join("known_hosts")),
        CountingPrompt::new(true),
    ));

    let (dialed, log) = serve(None);
    let methods = [
        AuthMethod::PrivateKey(Arc::new(private_key(OTHER_KEY))),
        AuthMethod::PrivateKey(Arc::new(private_key(CLIENT_KEY))),
    ];
    let error = establish_with_methods(dialed, "ops", &methods, verifier, &options())
        .await
        .expect_err("rejected");

    match error {
        ConnectError::AuthenticationRejected { user } => assert_eq!(user, "ops"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(log.signed_keys().len(), 2);
}

#[tokio::test]
async fn silent_peer_hits_the_handshake_timeout() {
    let temp = tempfile::tempdir().expect("tempdir");
    let verifier = Arc::new(HostIdentityVerifier::new(
        KnownHostsStore::new(temp.path().join("known_hosts")),
        CountingPrompt::new(true),
    ));
    let (client_end, _silent_end) = tokio::io::duplex(64 * 1024);
    let dialed = Dialed {
        stream: Box::new(client_end),
        peer_address: "db01".to_owned(),
    };
    let methods = [AuthMethod::PrivateKey(Arc::new(private_key(CLIENT_KEY)))];
    let options = EstablishOptions::new().handshake_timeout(Some(Duration::from_millis(100)));

    let error = establish_with_methods(dialed, "ops", &methods, verifier, &options)
        .await
        .expect_err("timeout");
    match error {
        ConnectError::Timeout { stage, after } => {
            assert_eq!(stage, "handshake");
            assert_eq!(after, Duration::from_millis(100));
        }
        other => panic!("unexpected error: {other}"),
    }
}
