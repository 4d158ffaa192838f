//! crates/operand/src/target.rs
//! `[user@]host[:path]` parsing.

use std::fmt;

use crate::error::OperandError;
use crate::user::current_user;

/// A parsed `[user@]host[:path]` operand.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RemoteTarget {
    user: String,
    host: String,
    path: String,
}

impl RemoteTarget {
    /// Creates a target from its components.
    #[must_use]
    pub fn new(user: impl Into<String>, host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            host: host.into(),
            path: path.into(),
        }
    }

    /// Login user.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Target identity, without brackets for IPv6 literals.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Remote path; empty when the operand carried none.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Replaces the login user.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }
}

impl fmt::Display for RemoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "{}@[{}]", self.user, self.host)?;
        } else {
            write!(f, "{}@{}", self.user, self.host)?;
        }
        if !self.path.is_empty() {
            write!(f, ":{}", self.path)?;
        }
        Ok(())
    }
}

/// Parses `text`, defaulting the user to the account running the process.
///
/// # Errors
///
/// Returns [`OperandError::UnknownUser`] when the operand has no user and
/// the local account name cannot be determined, plus every error
/// [`parse_target_as`] reports.
pub fn parse_target(text: &str) -> Result<RemoteTarget, OperandError> {
    if text.is_empty() {
        return Err(OperandError::Empty);
    }
    let (user, rest) = extract_user(text);
    let user = match user {
        Some(user) => user.to_owned(),
        None => current_user().ok_or(OperandError::UnknownUser)?,
    };
    finish(text, user, rest)
}

/// Parses `text`, using `default_user` when the operand has no `user@`.
pub fn parse_target_as(text: &str, default_user: &str) -> Result<RemoteTarget, OperandError> {
    let (user, rest) = extract_user(text);
    let user = user.unwrap_or(default_user).to_owned();
    finish(text, user, rest)
}

fn finish(text: &str, user: String, rest: &str) -> Result<RemoteTarget, OperandError> {
    if text.is_empty() {
        return Err(OperandError::Empty);
    }
    if user.is_empty() {
        return Err(OperandError::EmptyUser(text.to_owned()));
    }

    let (host, path) = extract_host_and_path(text, rest)?;
    if host.is_empty() {
        return Err(OperandError::MissingHost(text.to_owned()));
    }

    Ok(RemoteTarget::new(user, host, path))
}

/// User named explicitly by `text`, if it has a `user@` part.
#[must_use]
pub fn explicit_user(text: &str) -> Option<&str> {
    extract_user(text).0
}

/// Splits off the user at the last `@` before the host.
///
/// Only the text before the first `:` is searched, so paths may contain `@`
/// and `[`. A `[` opening the host, at the start or right after `@`, ends the
/// search early because bracketed hosts carry colons of their own.
fn extract_user(text: &str) -> (Option<&str>, &str) {
    let colon = text.find(':').unwrap_or(text.len());
    let search_end = match text[..colon].find('[') {
        Some(open) if open == 0 || text[..open].ends_with('@') => open,
        _ => colon,
    };

    match text[..search_end].rfind('@') {
        Some(at) => (Some(&text[..at]), &text[at + 1..]),
        None => (None, text),
    }
}

fn extract_host_and_path<'a>(
    original: &str,
    rest: &'a str,
) -> Result<(&'a str, &'a str), OperandError> {
    if let Some(bracketed) = rest.strip_prefix('[') {
        let close = bracketed
            .find(']')
            .ok_or_else(|| OperandError::InvalidBrackets(original.to_owned()))?;
        let host = &bracketed[..close];
        let after = &bracketed[close + 1..];
        if after.is_empty() {
            return Ok((host, ""));
        }
        return after
            .strip_prefix(':')
            .map(|path| (host, path))
            .ok_or_else(|| OperandError::InvalidBrackets(original.to_owned()));
    }

    Ok(rest.split_once(':').unwrap_or((rest, "")))
}
