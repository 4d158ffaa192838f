#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `known_hosts` decides whether the public key a server presents during the
//! SSH handshake can be trusted. Keys are checked against an OpenSSH-style
//! `known_hosts` file. A host seen for the first time is shown to the user,
//! and the key is recorded only after they accept it.
//!
//! # Design
//!
//! - [`normalize_host`] turns the peer address reported by the overlay dialer
//!   into a stable lookup key. Overlay addresses carry session and router
//!   annotations after the logical name; those are cut off.
//! - [`KnownHostsStore`] reads and appends `host keytype base64` lines. It
//!   never rewrites an existing line.
//! - [`TrustPrompt`] is the interactive seam. [`StdinPrompt`] reads one line
//!   from standard input; tests supply their own implementations.
//! - [`HostIdentityVerifier`] combines the three and classifies every check as
//!   one of the [`HostKeyState`] values.
//!
//! # Invariants
//!
//! - A host with stored keys, none of which equals the presented key, is a
//!   hard failure. The prompt is not consulted in that case.
//! - Nothing is written unless the prompt accepted an unknown host.
//! - The store file is created with mode `0600` and its parent directories
//!   with `0700` on unix.
//!
//! # Errors
//!
//! [`HostKeyError`] covers invalid host identifiers, key mismatches, declined
//! prompts, prompt I/O failures and store failures ([`StoreError`]).
//!
//! # Examples
//!
//! ```
//! use known_hosts::normalize_host;
//!
//! assert_eq!(normalize_host(" DB01.Example (router r3) ").unwrap(), "db01.example");
//! assert_eq!(normalize_host("[jump]:2222").unwrap(), "jump");
//! ```

mod error;
mod host;
mod key;
mod prompt;
mod record;
mod store;
mod verifier;

pub use error::{HostKeyError, StoreError};
pub use host::normalize_host;
pub use key::HostKey;
pub use prompt::{StdinPrompt, TrustPrompt, accepts};
pub use record::HostRecord;
pub use store::KnownHostsStore;
pub use verifier::{HostIdentityVerifier, HostKeyState, Verified};
