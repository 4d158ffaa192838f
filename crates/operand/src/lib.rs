#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `operand` turns the `[user@]host[:path]` strings accepted by `zssh` and
//! `zscp` into a [`RemoteTarget`]. It also decides whether a `zscp` argument
//! names a remote location at all, and normalizes the home-relative remote
//! paths (`~`, `~/rest`) the copy engine hands to SFTP.
//!
//! # Design
//!
//! - [`is_remote`] classifies an argument. A `:` makes it remote unless the
//!   colon belongs to a drive letter (`C:`), follows a path separator, or sits
//!   inside a Windows extended prefix (`\\?\`, `\\.\`).
//! - [`parse_target`] splits the user from the host at the last `@` before
//!   the host, honours bracketed IPv6 literals and treats everything after
//!   the host's `:` as the path, which may itself contain `:` and `@`.
//! - The user defaults to the account running the process. Windows account
//!   names of the form `DOMAIN\user` are reduced to `user`.
//!
//! # Invariants
//!
//! - A parsed host is never empty.
//! - `parse_target("host")` yields an empty path and [`is_remote`] reports
//!   `false` for the same string.
//!
//! # Errors
//!
//! [`OperandError`] reports empty operands, malformed brackets, missing hosts
//! and the inability to determine the local user name.
//!
//! # Examples
//!
//! ```
//! use operand::{is_remote, parse_target_as};
//!
//! let target = parse_target_as("alice@db01:/var/backups", "nobody").unwrap();
//! assert_eq!(target.user(), "alice");
//! assert_eq!(target.host(), "db01");
//! assert_eq!(target.path(), "/var/backups");
//!
//! assert!(is_remote("db01:notes.txt".as_ref()));
//! assert!(!is_remote("C:\\notes.txt".as_ref()));
//! ```

mod error;
mod remote;
mod target;
mod user;

#[cfg(test)]
mod tests;

pub use error::OperandError;
pub use remote::{home_relative, is_remote};
pub use target::{RemoteTarget, explicit_user, parse_target, parse_target_as};
pub use user::{current_user, strip_domain};
