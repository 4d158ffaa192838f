use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::HostKeyError;

/// A server public key in SSH wire encoding.
///
/// Equality compares the algorithm and the key blob; the optional display
/// fingerprint is ignored.
#[derive(Clone, Debug)]
pub struct HostKey {
    algorithm: String,
    blob: Vec<u8>,
    fingerprint: Option<String>,
}

impl HostKey {
    /// Creates a key from its algorithm name and wire blob.
    #[must_use]
    pub fn new(algorithm: impl Into<String>, blob: impl Into<Vec<u8>>) -> Self {
        Self {
            algorithm: algorithm.into(),
            blob: blob.into(),
            fingerprint: None,
        }
    }

    /// Parses the `algorithm base64 [comment]` form used by OpenSSH.
    pub fn from_openssh(text: &str) -> Result<Self, HostKeyError> {
        let mut fields = text.split_whitespace();
        let (Some(algorithm), Some(encoded)) = (fields.next(), fields.next()) else {
            return Err(HostKeyError::MalformedKey(format!(
                "expected 'algorithm base64', got '{text}'"
            )));
        };
        let blob = STANDARD
            .decode(encoded)
            .map_err(|error| HostKeyError::MalformedKey(error.to_string()))?;
        Ok(Self::new(algorithm, blob))
    }

    /// Attaches a human-readable fingerprint used in prompts and errors.
    #[must_use]
    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    /// Algorithm name such as `ssh-ed25519`.
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Raw key blob.
    #[must_use]
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    /// Base64 encoding of the blob as stored on disk.
    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.blob)
    }

    /// Fingerprint for display. Falls back to a shortened base64 blob.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        match &self.fingerprint {
            Some(fingerprint) => fingerprint.clone(),
            None => {
                let encoded = self.to_base64();
                let tail = encoded.len().saturating_sub(16);
                format!("...{}", &encoded[tail..])
            }
        }
    }
}

impl PartialEq for HostKey {
    fn eq(&self, other: &Self) -> bool {
        self.algorithm == other.algorithm && self.blob == other.blob
    }
}

impl Eq for HostKey {}

impl fmt::Display for HostKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.algorithm, self.to_base64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_openssh_public_key_text() {
        let key = HostKey::from_openssh("ssh-ed25519 AAECAw== ops@laptop").expect("key");
        assert_eq!(key.algorithm(), "ssh-ed25519");
        assert_eq!(key.blob(), [0, 1, 2, 3]);
        assert_eq!(key.to_string(), "ssh-ed25519 AAECAw==");
    }

    #[test]
    fn rejects_missing_blob_and_bad_base64() {
        assert!(matches!(
            HostKey::from_openssh("ssh-ed25519"),
            Err(HostKeyError::MalformedKey(_))
        ));
        assert!(matches!(
            HostKey::from_openssh("ssh-ed25519 !!!"),
            Err(HostKeyError::MalformedKey(_))
        ));
    }

    #[test]
    fn equality_ignores_fingerprint() {
        let plain = HostKey::new("ssh-rsa", vec![9, 9]);
        let labelled = plain.clone().with_fingerprint("SHA256:abc");
        assert_eq!(plain, labelled);
        assert_eq!(labelled.fingerprint(), "SHA256:abc");
        assert_ne!(plain, HostKey::new("ssh-ed25519", vec![9, 9]));
    }
}
