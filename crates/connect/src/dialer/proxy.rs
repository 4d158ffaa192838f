//! Proxy-command dialing over a child process's stdio.

use std::io;
use std::pin::Pin;
use std::process::Stdio;
use std::task::{Context, Poll};

use async_trait::async_trait;
use logging::Logger;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::debug;

use super::{DialRequest, Dialed, Dialer};
use crate::error::DialError;

/// Environment variable carrying the bearer token to the proxy command.
pub const BEARER_TOKEN_ENV: &str = "ZSSH_BEARER_TOKEN";

/// Runs a command and speaks SSH over its stdin and stdout.
///
/// The command line is a template: `%s` expands to the service, `%i` to the
/// target identity and `%%` to a literal percent sign. It runs under the
/// platform shell with stderr inherited, so tunnel diagnostics reach the
/// terminal. Substituted values are restricted to host-name characters.
#[derive(Clone, Debug)]
pub struct ProxyCommandDialer {
    template: String,
    logger: Logger,
}

impl ProxyCommandDialer {
    /// Creates a dialer for the command template.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            logger: Logger::disabled(),
        }
    }

    /// Attributes dial events to `logger`.
    #[must_use]
    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// The unexpanded command template.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Expands the template for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`DialError::UnsafeSubstitution`] when a substituted service
    /// or identity contains anything but ASCII letters, digits, `.`, `-`,
    /// `_` or `:`.
    pub fn command_line(&self, request: &DialRequest) -> Result<String, DialError> {
        let mut expanded = String::with_capacity(self.template.len());
        let mut chars = self.template.chars();
        while let Some(ch) = chars.next() {
            if ch != '%' {
                expanded.push(ch);
                continue;
            }
            match chars.next() {
                Some('s') => expanded.push_str(substitution('s', &request.service)?),
                Some('i') => expanded.push_str(substitution('i', &request.identity)?),
                Some('%') => expanded.push('%'),
                Some(other) => {
                    expanded.push('%');
                    expanded.push(other);
                }
                None => expanded.push('%'),
            }
        }
        Ok(expanded)
    }

    fn shell(command_line: &str) -> Command {
        #[cfg(windows)]
        {
            let mut command = Command::new("cmd");
            command.arg("/C").arg(command_line);
            command
        }
        #[cfg(not(windows))]
        {
            let mut command = Command::new("sh");
            command.arg("-c").arg(command_line);
            command
        }
    }
}

#[async_trait]
impl Dialer for ProxyCommandDialer {
    async fn dial(&self, request: &DialRequest) -> Result<Dialed, DialError> {
        let command_line = self.command_line(request)?;
        if command_line.trim().is_empty() {
            return Err(DialError::EmptyCommand);
        }

        let mut command = Self::shell(&command_line);
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        match &request.bearer_token {
            Some(token) => {
                command.env(BEARER_TOKEN_ENV, token);
            }
            None => {
                command.env_remove(BEARER_TOKEN_ENV);
            }
        }

        debug!(parent: self.logger.span(), "starting proxy command: {}", command_line);
        let spawn_error = |source| DialError::Spawn {
            command: command_line.clone(),
            source,
        };
        let mut child = command.spawn().map_err(spawn_error)?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| spawn_error(io::Error::other("proxy stdin was not captured")))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| spawn_error(io::Error::other("proxy stdout was not captured")))?;

        let peer_address = match child.id() {
            Some(pid) => format!("{} (proxy pid {pid})", request.identity),
            None => request.identity.clone(),
        };
        Ok(Dialed {
            stream: Box::new(ProxyStream {
                _child: child,
                stdin,
                stdout,
            }),
            peer_address,
        })
    }
}

fn substitution(placeholder: char, value: &str) -> Result<&str, DialError> {
    let safe = value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_' | ':'));
    if safe {
        Ok(value)
    } else {
        Err(DialError::UnsafeSubstitution {
            placeholder,
            value: value.to_owned(),
        })
    }
}

/// Duplex stream over a proxy child's stdout (read) and stdin (write).
///
/// The child is killed when the stream is dropped.
struct ProxyStream {
    _child: Child,
    stdin: ChildStdin,
    stdout: ChildStdout,
}

impl AsyncRead for ProxyStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.stdout).poll_read(cx, buf)
    }
}

impl AsyncWrite for ProxyStream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.stdin).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.stdin).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.stdin).poll_shutdown(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> DialRequest {
        DialRequest {
            service: "zssh".to_owned(),
            identity: "db01".to_owned(),
            ..DialRequest::default()
        }
    }

    #[test]
    fn expands_service_and_identity() {
        let dialer = ProxyCommandDialer::new("tunnel --service %s --identity %i");
        assert_eq!(
            dialer.command_line(&request()).expect("expands"),
            "tunnel --service zssh --identity db01"
        );
    }

    #[test]
    fn keeps_unknown_and_escaped_percents() {
        let dialer = ProxyCommandDialer::new("echo 100%% %x %");
        assert_eq!(
            dialer.command_line(&request()).expect("expands"),
            "echo 100% %x %"
        );
    }

    #[test]
    fn ipv6_identities_are_substituted() {
        let dialer = ProxyCommandDialer::new("nc %i 22");
        let request = DialRequest {
            identity: "2001:db8::1".to_owned(),
            ..request()
        };
        assert_eq!(
            dialer.command_line(&request).expect("expands"),
            "nc 2001:db8::1 22"
        );
    }

    #[test]
    fn shell_metacharacters_in_substitutions_are_refused() {
        let dialer = ProxyCommandDialer::new("tunnel %s %i");
        for identity in ["x;touch /tmp/p", "$(id)", "a b", "`id`", "a|b", "a\nb", "a&b"] {
            let request = DialRequest {
                identity: identity.to_owned(),
                ..request()
            };
            match dialer.command_line(&request) {
                Err(DialError::UnsafeSubstitution { placeholder, value }) => {
                    assert_eq!(placeholder, 'i');
                    assert_eq!(value, identity);
                }
                other => panic!("{identity:?} expanded to {other:?}"),
            }
        }

        let request = DialRequest {
            service: "svc>out".to_owned(),
            ..request()
        };
        assert!(matches!(
            dialer.command_line(&request),
            Err(DialError::UnsafeSubstitution { placeholder: 's', .. })
        ));
    }

    #[test]
    fn unreferenced_values_are_not_checked() {
        let dialer = ProxyCommandDialer::new("tunnel --service %s");
        let request = DialRequest {
            identity: "x;y".to_owned(),
            ..request()
        };
        assert_eq!(
            dialer.command_line(&request).expect("identity unused"),
            "tunnel --service zssh"
        );
    }

    #[tokio::test]
    async fn dial_refuses_unsafe_identity_before_spawning() {
        let marker = tempfile::tempdir().expect("tempdir");
        let touched = marker.path().join("touched");
        let dialer = ProxyCommandDialer::new("true %i");
        let request = DialRequest {
            identity: format!("x;touch {}", touched.display()),
            ..request()
        };
        let error = dialer.dial(&request).await.expect_err("unsafe identity");
        assert!(matches!(error, DialError::UnsafeSubstitution { .. }));
        assert!(!touched.exists());
    }

    #[tokio::test]
    async fn rejects_blank_command() {
        let dialer = ProxyCommandDialer::new("   ");
        let error = dialer.dial(&request()).await.expect_err("blank command");
        assert!(matches!(error, DialError::EmptyCommand));
    }
}
