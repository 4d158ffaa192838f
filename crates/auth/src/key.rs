//! crates/auth/src/key.rs
//! Private key file classification.

use std::path::Path;

use russh::keys::{self, PrivateKey, PublicKey};

use crate::error::AuthError;

/// Armor lines that open public keys in PEM or RFC 4716 form.
const PUBLIC_KEY_ARMOR: [&str; 3] = [
    "-----BEGIN PUBLIC KEY-----",
    "-----BEGIN RSA PUBLIC KEY-----",
    "---- BEGIN SSH2 PUBLIC KEY ----",
];

/// Reads and parses the private key at `path`.
///
/// A file holding a public key, in OpenSSH, PEM or RFC 4716 form, is
/// rejected as [`AuthError::KeyWrongType`] before private-key parsing is
/// attempted.
pub async fn load_private_key(path: &Path) -> Result<PrivateKey, AuthError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|error| AuthError::KeyFileUnreadable {
            path: path.to_path_buf(),
            reason: error.to_string(),
        })?;

    let text = String::from_utf8(bytes).map_err(|_| AuthError::KeyParseError {
        path: path.to_path_buf(),
        reason: "file is not valid UTF-8".to_owned(),
    })?;

    classify(path, &text)
}

pub(crate) fn classify(path: &Path, text: &str) -> Result<PrivateKey, AuthError> {
    if PublicKey::from_openssh(text.trim()).is_ok() || is_armored_public_key(text) {
        return Err(AuthError::KeyWrongType {
            path: path.to_path_buf(),
        });
    }

    keys::decode_secret_key(text, None).map_err(|error| match error {
        keys::Error::KeyIsEncrypted => AuthError::KeyPassphraseRequired {
            path: path.to_path_buf(),
        },
        other => AuthError::KeyParseError {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    })
}

fn is_armored_public_key(text: &str) -> bool {
    let first = text.trim_start().lines().next().unwrap_or_default().trim_end();
    PUBLIC_KEY_ARMOR.contains(&first)
}
