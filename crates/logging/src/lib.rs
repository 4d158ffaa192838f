#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` owns the diagnostic plumbing shared by the `zssh` and `zscp`
//! clients. It installs a single [`tracing`] subscriber for the process and
//! hands out [`Logger`] values that components receive at construction time.
//!
//! # Design
//!
//! - [`LogConfig`] captures the two knobs the command line exposes: the
//!   `--debug` switch and whether ANSI colours are allowed on stderr.
//! - [`init`] builds a `tracing_subscriber` registry with an
//!   [`EnvFilter`](tracing_subscriber::EnvFilter) and a compact `fmt` layer
//!   writing to stderr. The `ZSSH_LOG` environment variable overrides the
//!   default directives.
//! - [`Logger`] wraps a named [`tracing::Span`]. Components emit their events
//!   with `parent: logger.span()` instead of relying on ambient span context, so
//!   an auth resolver and a sync engine running in the same task still produce
//!   attributable output.
//!
//! # Invariants
//!
//! - [`init`] may be called more than once; only the first call installs a
//!   subscriber and later calls report [`LogInitError::AlreadyInstalled`].
//! - A [`Logger`] built with [`Logger::disabled`] never emits span context,
//!   which keeps unit tests quiet without a subscriber.
//!
//! # Examples
//!
//! ```
//! use logging::{LogConfig, Logger};
//!
//! let config = LogConfig::new(true, false);
//! assert_eq!(config.default_directives(), "debug,russh=info,russh_sftp=info");
//!
//! let logger = Logger::new("sync");
//! tracing::debug!(parent: logger.span(), "made directory: {}", "/srv/data");
//! ```

mod config;
mod logger;
mod subscriber;

pub use config::{LOG_ENV, LogConfig};
pub use logger::Logger;
pub use subscriber::{LogInitError, init};
