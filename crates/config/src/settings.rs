//! crates/config/src/settings.rs
//! Layered resolution of the values a client run needs.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::paths::{default_key_path, expand_home, known_hosts_path};
use crate::profile::Profile;

/// Service dialed when neither flag nor profile names one.
pub const DEFAULT_SERVICE: &str = "zssh";

/// Dial and handshake limit applied when nothing else is configured.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Values given on the command line. `None` defers to the profile.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Overrides {
    /// `-i/--ssh-key-path`.
    pub ssh_key_path: Option<PathBuf>,
    /// `-s/--service`.
    pub service: Option<String>,
    /// `--known-hosts`.
    pub known_hosts: Option<PathBuf>,
    /// `--proxy-command`.
    pub proxy_command: Option<String>,
    /// `--connect-timeout`.
    pub connect_timeout_secs: Option<u64>,
    /// `-d/--debug`; only `true` overrides.
    pub debug: bool,
}

/// Fully resolved settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    user: Option<String>,
    ssh_key_path: PathBuf,
    service: String,
    known_hosts: PathBuf,
    proxy_command: Option<String>,
    connect_timeout: Option<Duration>,
    debug: bool,
}

impl Settings {
    /// Layers `overrides` over `profile` over the defaults.
    pub fn resolve(overrides: &Overrides, profile: Option<&Profile>) -> Result<Self, ConfigError> {
        let empty = Profile::default();
        let profile = profile.unwrap_or(&empty);

        let ssh_key_path = match overrides.ssh_key_path.as_ref().or(profile.ssh_key_path.as_ref()) {
            Some(path) => expand_home(path)?,
            None => default_key_path()?,
        };
        let known_hosts = match overrides.known_hosts.as_ref().or(profile.known_hosts.as_ref()) {
            Some(path) => expand_home(path)?,
            None => known_hosts_path()?,
        };
        let service = overrides
            .service
            .clone()
            .or_else(|| profile.service.clone())
            .unwrap_or_else(|| DEFAULT_SERVICE.to_owned());
        let proxy_command = overrides
            .proxy_command
            .clone()
            .or_else(|| profile.proxy_command.clone())
            .filter(|command| !command.trim().is_empty());
        let seconds = overrides
            .connect_timeout_secs
            .or(profile.connect_timeout_secs)
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);

        Ok(Self {
            user: profile.user.clone().filter(|user| !user.is_empty()),
            ssh_key_path,
            service,
            known_hosts,
            proxy_command,
            connect_timeout: (seconds > 0).then(|| Duration::from_secs(seconds)),
            debug: overrides.debug || profile.debug.unwrap_or(false),
        })
    }

    /// Login user from the profile. A `user@` in the operand takes precedence.
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Private key file.
    #[must_use]
    pub fn ssh_key_path(&self) -> &Path {
        &self.ssh_key_path
    }

    /// Overlay service name.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Known-hosts store.
    #[must_use]
    pub fn known_hosts(&self) -> &Path {
        &self.known_hosts
    }

    /// Proxy command template, if any.
    #[must_use]
    pub fn proxy_command(&self) -> Option<&str> {
        self.proxy_command.as_deref()
    }

    /// Dial and handshake limit; `None` waits indefinitely.
    #[must_use]
    pub const fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    /// Whether debug logging is on.
    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }
}
