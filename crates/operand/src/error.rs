use thiserror::Error;

/// Errors produced while parsing a remote operand.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum OperandError {
    /// The operand string was empty.
    #[error("remote operand is empty")]
    Empty,
    /// No host precedes the `:` separator.
    #[error("remote operand '{0}' does not name a host")]
    MissingHost(String),
    /// An `@` was present with nothing before it.
    #[error("remote operand '{0}' has an empty user name")]
    EmptyUser(String),
    /// A bracketed IPv6 host was not closed or was followed by junk.
    #[error("remote operand '{0}' has a malformed bracketed host")]
    InvalidBrackets(String),
    /// The operand omitted the user and the local account name is unknown.
    #[error("could not determine the current user name; pass user@host")]
    UnknownUser,
}
