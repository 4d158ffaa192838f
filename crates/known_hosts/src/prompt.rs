use std::io::{self, BufRead, Write};

use crate::key::HostKey;

/// Asks the user whether an unknown host key should be trusted.
///
/// Implementations may block; callers on an async runtime run them on a
/// blocking thread.
pub trait TrustPrompt: Send + Sync {
    /// Returns `Ok(true)` when the user accepts `key` for `host`.
    fn confirm(&self, host: &str, key: &HostKey) -> io::Result<bool>;
}

/// Prompts on stderr and reads the answer from stdin.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdinPrompt;

impl TrustPrompt for StdinPrompt {
    fn confirm(&self, host: &str, key: &HostKey) -> io::Result<bool> {
        let mut stderr = io::stderr().lock();
        writeln!(stderr, "The authenticity of host '{host}' can't be established.")?;
        writeln!(
            stderr,
            "{} key fingerprint is {}.",
            key.algorithm(),
            key.fingerprint()
        )?;
        write!(stderr, "Are you sure you want to continue connecting (yes/no)? ")?;
        stderr.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(accepts(&answer))
    }
}

/// Reports whether a typed answer accepts the key.
///
/// Only answers beginning with `y` or `Y` accept.
#[must_use]
pub fn accepts(answer: &str) -> bool {
    answer.starts_with(['y', 'Y'])
}
