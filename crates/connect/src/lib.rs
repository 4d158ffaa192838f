#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `connect` turns a target identity into an authenticated SSH [`Session`].
//! It owns three steps:
//!
//! 1. Dialing. A [`Dialer`] produces a duplex byte stream to the target. The
//!    overlay network itself is external: [`TcpDialer`] connects directly to
//!    an intercept address, [`ProxyCommandDialer`] runs the overlay's tunnel
//!    client and speaks over its stdin and stdout.
//! 2. Handshake. [`establish`] runs the SSH key exchange over that stream and
//!    routes the server key through a
//!    [`HostIdentityVerifier`](known_hosts::HostIdentityVerifier).
//! 3. Authentication. The methods resolved by an
//!    [`AuthResolver`](auth::AuthResolver) are tried in order; every agent
//!    identity is tried in turn.
//!
//! # Design
//!
//! Dial and handshake each run under an optional timeout. The handshake clock
//! is held while the host-key prompt waits for the user, so a slow answer is
//! not reported as a timeout.
//!
//! [`Session::exec`] demultiplexes the channel into two pump tasks, one per
//! output stream. It returns only after the demultiplexer and both pumps
//! have finished, so no output is lost when the remote exit status arrives
//! before the last data packet is written locally.
//!
//! # Errors
//!
//! [`DialError`] covers dialing. [`ConnectError`] wraps it together with
//! host-key, credential, handshake, channel and SFTP failures.

mod dialer;
mod error;
mod establish;
mod handler;
mod session;
mod terminal;

pub use dialer::{
    BEARER_TOKEN_ENV, DEFAULT_SSH_PORT, DialRequest, Dialed, Dialer, DuplexStream,
    ProxyCommandDialer, TcpDialer, dial,
};
pub use error::{ConnectError, DialError};
pub use establish::{DEFAULT_TIMEOUT, EstablishOptions, establish, establish_with_methods};
pub use session::{PtyRequest, Session};
pub use terminal::{RawModeGuard, terminal_size};
