use std::path::{Path, PathBuf};
use std::sync::Arc;

use logging::Logger;

use super::*;
use crate::key::classify;
use crate::resolver::combine;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn classify_accepts_unencrypted_openssh_key() {
    let text = std::fs::read_to_string(fixture("id_ed25519")).expect("fixture");
    let key = classify(Path::new("id_ed25519"), &text).expect("private key");
    assert!(!key.algorithm().is_rsa());
}

#[test]
fn classify_rejects_public_key() {
    let text = std::fs::read_to_string(fixture("id_ed25519.pub")).expect("fixture");
    let error = classify(Path::new("id_ed25519.pub"), &text).expect_err("public key");
    assert_eq!(
        error,
        AuthError::KeyWrongType {
            path: PathBuf::from("id_ed25519.pub")
        }
    );
}

#[test]
fn classify_rejects_armored_public_keys() {
    for name in ["ecdsa_pkcs8.pub", "id_ed25519_rfc4716.pub"] {
        let text = std::fs::read_to_string(fixture(name)).expect("fixture");
        let error = classify(Path::new(name), &text).expect_err("public key");
        assert_eq!(
            error,
            AuthError::KeyWrongType {
                path: PathBuf::from(name)
            },
            "{name}"
        );
    }
    let rsa = "-----BEGIN RSA PUBLIC KEY-----\nMAoCAwEAAQIDAQAB\n-----END RSA PUBLIC KEY-----\n";
    assert!(matches!(
        classify(Path::new("rsa.pub"), rsa),
        Err(AuthError::KeyWrongType { .. })
    ));
}

#[test]
fn classify_reports_passphrase_protection() {
    let text = std::fs::read_to_string(fixture("id_ed25519_encrypted")).expect("fixture");
    let error = classify(Path::new("enc"), &text).expect_err("encrypted");
    assert!(matches!(error, AuthError::KeyPassphraseRequired { .. }));
}

#[test]
fn classify_reports_garbage_as_parse_error() {
    let error = classify(Path::new("garbage"), "this is not a key\n").expect_err("garbage");
    assert!(matches!(error, AuthError::KeyParseError { .. }));
}

#[test]
fn combine_keeps_key_first_without_agent() {
    let text = std::fs::read_to_string(fixture("id_ed25519")).expect("fixture");
    let key = Arc::new(classify(Path::new("k"), &text).expect("key"));
    let methods = combine(Ok(key), None, &Logger::disabled()).expect("methods");
    assert_eq!(methods.len(), 1);
    assert!(matches!(methods[0], AuthMethod::PrivateKey(_)));
}

#[test]
fn combine_surfaces_key_error_when_nothing_else_exists() {
    let failure = AuthError::KeyFileUnreadable {
        path: PathBuf::from("/missing"),
        reason: "No such file or directory".to_owned(),
    };
    let error = combine(Err(failure.clone()), None, &Logger::disabled()).expect_err("fatal");
    assert_eq!(error, failure);
    assert_eq!(error.path(), Path::new("/missing"));
}

#[test]
fn errors_name_the_key_path() {
    let error = AuthError::KeyPassphraseRequired {
        path: PathBuf::from("/home/ops/.ssh/id_rsa"),
    };
    assert!(error.to_string().contains("/home/ops/.ssh/id_rsa"));
}
