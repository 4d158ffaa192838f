use std::fs;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use known_hosts::{
    HostIdentityVerifier, HostKey, HostKeyError, HostKeyState, KnownHostsStore, TrustPrompt,
    Verified,
};

#[derive(Clone)]
struct ScriptedPrompt {
    answer: &'static str,
    asked: Arc<AtomicUsize>,
}

impl ScriptedPrompt {
    fn new(answer: &'static str) -> Self {
        Self {
            answer,
            asked: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn times_asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

impl TrustPrompt for ScriptedPrompt {
    fn confirm(&self, _host: &str, _key: &HostKey) -> io::Result<bool> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        Ok(known_hosts::accepts(self.answer))
    }
}

struct FailingPrompt;

impl TrustPrompt for FailingPrompt {
    fn confirm(&self, _host: &str, _key: &HostKey) -> io::Result<bool> {
        Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"))
    }
}

fn key_one() -> HostKey {
    HostKey::new("ssh-ed25519", vec![1; 32])
}

fn key_two() -> HostKey {
    HostKey::new("ssh-ed25519", vec![2; 32])
}

#[test]
fn accepted_key_is_recorded_and_never_reprompted() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("state").join("known_hosts");
    let prompt = ScriptedPrompt::new("yes");
    let verifier = HostIdentityVerifier::new(KnownHostsStore::new(&path), prompt.clone());

    assert_eq!(
        verifier.verify("DB01 (session 1)", &key_one()).expect("first"),
        Verified::Accepted
    );
    assert_eq!(
        verifier.verify("db01 (session 2)", &key_one()).expect("second"),
        Verified::Known
    );
    assert_eq!(prompt.times_asked(), 1);

    let contents = fs::read_to_string(&path).expect("store written");
    assert_eq!(contents.lines().count(), 1);
    assert!(contents.starts_with("db01 ssh-ed25519 "));
}

#[test]
fn mismatch_fails_without_prompting() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("known_hosts");
    fs::write(&path, format!("db01 {}\n", key_one())).expect("seed");

    let prompt = ScriptedPrompt::new("yes");
    let verifier = HostIdentityVerifier::new(KnownHostsStore::new(&path), prompt.clone());

    let error = verifier.verify("db01", &key_two()).expect_err("mismatch");
    assert!(matches!(error, HostKeyError::Mismatch { ref host, .. } if host == "db01"));
    assert_eq!(prompt.times_asked(), 0);

    let contents = fs::read_to_string(&path).expect("store");
    assert_eq!(contents.lines().count(), 1);
}

#[test]
fn different_key_type_for_known_host_is_a_mismatch() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("known_hosts");
    fs::write(&path, format!("db01 {}\n", key_one())).expect("seed");

    let verifier = HostIdentityVerifier::new(KnownHostsStore::new(&path), ScriptedPrompt::new("y"));
    let rsa = HostKey::new("rsa-sha2-512", vec![1; 32]);
    let (_, state) = verifier.classify("db01", &rsa).expect("classify");
    assert_eq!(state, HostKeyState::KnownMismatch);
}

#[test]
fn declined_key_is_not_written() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("known_hosts");
    let verifier = HostIdentityVerifier::new(KnownHostsStore::new(&path), ScriptedPrompt::new("no"));

    let error = verifier.verify("db01", &key_one()).expect_err("declined");
    assert!(matches!(error, HostKeyError::Declined { .. }));
    assert!(!path.exists());
}

#[test]
fn prompt_failure_is_reported() {
    let temp = tempfile::tempdir().expect("tempdir");
    let verifier =
        HostIdentityVerifier::new(KnownHostsStore::new(temp.path().join("kh")), FailingPrompt);
    let error = verifier.verify("db01", &key_one()).expect_err("prompt error");
    assert!(matches!(error, HostKeyError::Prompt(_)));
}

#[test]
fn any_matching_record_for_host_is_accepted() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("known_hosts");
    fs::write(
        &path,
        format!(
            "# managed by ops\n@revoked db01 {}\nalias,db01 {}\ndb01 {}",
            key_two(),
            key_one(),
            key_two()
        ),
    )
    .expect("seed");

    let verifier = HostIdentityVerifier::new(KnownHostsStore::new(&path), ScriptedPrompt::new("n"));
    assert_eq!(verifier.verify("db01", &key_one()).expect("known"), Verified::Known);
    assert_eq!(verifier.verify("db01:22", &key_two()).expect("known"), Verified::Known);
}

#[test]
fn append_after_unterminated_line_keeps_records_separate() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("known_hosts");
    fs::write(&path, format!("db01 {}", key_one())).expect("seed");

    let verifier = HostIdentityVerifier::new(KnownHostsStore::new(&path), ScriptedPrompt::new("y"));
    verifier.verify("db02", &key_two()).expect("accepted");

    let store = KnownHostsStore::new(&path);
    assert_eq!(store.keys_for("db01").expect("db01"), [key_one()]);
    assert_eq!(store.keys_for("db02").expect("db02"), [key_two()]);
}

#[test]
fn invalid_host_is_rejected_before_lookup() {
    let temp = tempfile::tempdir().expect("tempdir");
    let verifier = HostIdentityVerifier::new(
        KnownHostsStore::new(temp.path().join("kh")),
        ScriptedPrompt::new("y"),
    );
    assert!(matches!(
        verifier.verify("  (router)", &key_one()),
        Err(HostKeyError::InvalidHost(_))
    ));
}

#[cfg(unix)]
#[test]
fn store_is_created_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path().join("zssh");
    let path = dir.join("known_hosts");
    let verifier = HostIdentityVerifier::new(KnownHostsStore::new(&path), ScriptedPrompt::new("y"));
    verifier.verify("db01", &key_one()).expect("accepted");

    let file_mode = fs::metadata(&path).expect("file").permissions().mode() & 0o777;
    let dir_mode = fs::metadata(&dir).expect("dir").permissions().mode() & 0o777;
    assert_eq!(file_mode, 0o600);
    assert_eq!(dir_mode, 0o700);
}
