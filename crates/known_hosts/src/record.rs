use crate::key::HostKey;

/// One line of the known-hosts file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HostRecord {
    hosts: Vec<String>,
    key: HostKey,
}

impl HostRecord {
    /// Creates a record for a single normalized host.
    #[must_use]
    pub fn new(host: impl Into<String>, key: HostKey) -> Self {
        Self {
            hosts: vec![host.into()],
            key,
        }
    }

    /// Parses a store line.
    ///
    /// Returns `None` for blank lines, comments, `@` marker lines, hashed host
    /// fields and anything that does not decode.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('@') {
            return None;
        }

        let (hosts, key) = line.split_once(char::is_whitespace)?;
        if hosts.starts_with("|1|") {
            return None;
        }

        let key = HostKey::from_openssh(key).ok()?;
        let hosts = hosts
            .split(',')
            .filter(|host| !host.is_empty())
            .map(str::to_ascii_lowercase)
            .collect::<Vec<_>>();
        if hosts.is_empty() {
            return None;
        }
        Some(Self { hosts, key })
    }

    /// Host names the record applies to.
    #[must_use]
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Stored key.
    #[must_use]
    pub const fn key(&self) -> &HostKey {
        &self.key
    }

    /// Reports whether `host` is one of the record's names.
    #[must_use]
    pub fn matches_host(&self, host: &str) -> bool {
        self.hosts.iter().any(|name| name.eq_ignore_ascii_case(host))
    }

    /// Line written to the store, without the trailing newline.
    #[must_use]
    pub fn to_line(&self) -> String {
        format!("{} {}", self.hosts.join(","), self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_comma_lists() {
        let record = HostRecord::parse("db01,DB01.lan ssh-ed25519 AAECAw== comment").expect("record");
        assert!(record.matches_host("db01"));
        assert!(record.matches_host("db01.lan"));
        assert!(!record.matches_host("db02"));
        assert_eq!(record.key().algorithm(), "ssh-ed25519");
    }

    #[test]
    fn skips_lines_it_does_not_understand() {
        for line in [
            "",
            "   ",
            "# comment",
            "@cert-authority *.lan ssh-ed25519 AAECAw==",
            "@revoked db01 ssh-ed25519 AAECAw==",
            "|1|c2FsdA==|aGFzaA== ssh-ed25519 AAECAw==",
            "db01",
            "db01 ssh-ed25519",
            "db01 ssh-ed25519 not*base64",
        ] {
            assert!(HostRecord::parse(line).is_none(), "{line:?} should be skipped");
        }
    }

    #[test]
    fn line_form_matches_store_format() {
        let record = HostRecord::new("db01", HostKey::new("ssh-ed25519", vec![0, 1, 2, 3]));
        assert_eq!(record.to_line(), "db01 ssh-ed25519 AAECAw==");
        assert_eq!(HostRecord::parse(&record.to_line()), Some(record));
    }
}
